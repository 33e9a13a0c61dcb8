//! Arena-backed family tree storage and traversal iterators.

use std::collections::VecDeque;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::member::Member;

/// Tree node in the arena-based family structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Family member held by this node
    pub member: Member,
    /// Index of the parent node in the arena, None for the root and detached nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in birth order
    pub children: Vec<Index>,
}

/// Arena-based tree structure.
///
/// Uses a generational arena so node handles stay valid across insertions and
/// parent back-references never own their target. Nodes may live in the arena
/// without being reachable from the root (created but not yet attached, or
/// detached again).
#[derive(Debug)]
pub struct TreeArena {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Creates a tree whose root holds `member`.
    pub fn with_root(member: Member) -> Self {
        let mut tree = Self::new();
        let root = tree.insert_node(member);
        tree.root = Some(root);
        tree
    }

    /// Stores a detached node and returns its handle.
    #[instrument(level = "trace", skip(self), fields(name = %member.name))]
    pub fn insert_node(&mut self, member: Member) -> Index {
        self.arena.insert(TreeNode {
            member,
            parent: None,
            children: Vec::new(),
        })
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    /// Number of nodes stored, attached or not.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Appends `child` as the youngest child of `parent` and points its
    /// back-reference at `parent`.
    ///
    /// No cycle or duplicate-attachment check is made; callers attach children
    /// in birth order.
    #[instrument(level = "debug", skip(self))]
    pub fn add_child(&mut self, parent: Index, child: Index) -> DomainResult<()> {
        if !self.arena.contains(child) {
            return Err(DomainError::NodeNotFound(child));
        }
        let parent_node = self
            .arena
            .get_mut(parent)
            .ok_or(DomainError::NodeNotFound(parent))?;
        parent_node.children.push(child);
        if let Some(child_node) = self.arena.get_mut(child) {
            child_node.parent = Some(parent);
        }
        Ok(())
    }

    /// Detaches `child` from `parent`.
    ///
    /// Returns false when `child` is not a direct child of `parent`.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_child(&mut self, parent: Index, child: Index) -> bool {
        let Some(parent_node) = self.arena.get_mut(parent) else {
            return false;
        };
        let Some(pos) = parent_node.children.iter().position(|&c| c == child) else {
            return false;
        };
        parent_node.children.remove(pos);
        if let Some(child_node) = self.arena.get_mut(child) {
            child_node.parent = None;
        }
        true
    }

    /// Number of parent hops from `idx` up to its topmost ancestor.
    ///
    /// The root has depth 0. Returns None for unknown handles.
    #[instrument(level = "trace", skip(self))]
    pub fn depth(&self, idx: Index) -> Option<usize> {
        let mut current = self.get_node(idx)?;
        let mut depth = 0;
        while let Some(parent) = current.parent {
            current = self.get_node(parent)?;
            depth += 1;
        }
        Some(depth)
    }

    /// Depth-first pre-order traversal from the root.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Breadth-first (level order) traversal from the root.
    pub fn iter_breadth_first(&self) -> BreadthFirstIterator<'_> {
        BreadthFirstIterator::new(self)
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let stack = arena.root().into_iter().collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct BreadthFirstIterator<'a> {
    arena: &'a TreeArena,
    queue: VecDeque<Index>,
}

impl<'a> BreadthFirstIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let queue = arena.root().into_iter().collect();
        Self { arena, queue }
    }
}

impl<'a> Iterator for BreadthFirstIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.queue.pop_front() {
            if let Some(node) = self.arena.get_node(current_idx) {
                self.queue.extend(node.children.iter());
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn member(name: &str) -> Member {
        Member::new(name, NaiveDate::from_ymd_opt(1950, 1, 1).unwrap(), true)
    }

    //      root
    //      /  \
    // child1 child2
    //    |
    // grandchild1
    fn sample() -> (TreeArena, [Index; 4]) {
        let mut tree = TreeArena::with_root(member("root"));
        let root = tree.root().unwrap();
        let child1 = tree.insert_node(member("child1"));
        let child2 = tree.insert_node(member("child2"));
        let grandchild1 = tree.insert_node(member("grandchild1"));
        tree.add_child(root, child1).unwrap();
        tree.add_child(root, child2).unwrap();
        tree.add_child(child1, grandchild1).unwrap();
        (tree, [root, child1, child2, grandchild1])
    }

    fn names<'a>(iter: impl Iterator<Item = (Index, &'a TreeNode)>) -> Vec<String> {
        iter.map(|(_, n)| n.member.name.clone()).collect()
    }

    #[test]
    fn test_add_child_sets_back_reference_and_order() {
        let (tree, [root, child1, child2, _]) = sample();
        let root_node = tree.get_node(root).unwrap();
        assert_eq!(root_node.children, vec![child1, child2]);
        assert_eq!(tree.get_node(child2).unwrap().parent, Some(root));
        assert_eq!(root_node.parent, None);
    }

    #[test]
    fn test_depth() {
        let (tree, [root, child1, child2, grandchild1]) = sample();
        assert_eq!(tree.depth(root), Some(0));
        assert_eq!(tree.depth(child1), Some(1));
        assert_eq!(tree.depth(child2), Some(1));
        assert_eq!(tree.depth(grandchild1), Some(2));
    }

    #[test]
    fn test_remove_child_is_not_recursive() {
        let (mut tree, [root, child1, _, grandchild1]) = sample();
        assert!(!tree.remove_child(root, grandchild1));
        assert_eq!(tree.get_node(grandchild1).unwrap().parent, Some(child1));

        assert!(tree.remove_child(child1, grandchild1));
        assert_eq!(tree.get_node(grandchild1).unwrap().parent, None);
        assert!(tree.get_node(child1).unwrap().children.is_empty());
        assert_eq!(tree.depth(grandchild1), Some(0));
    }

    #[test]
    fn test_add_child_with_unknown_handle_fails() {
        let (mut tree, [root, ..]) = sample();
        let stale = tree.insert_node(member("stale"));
        tree.arena.remove(stale);
        assert!(matches!(
            tree.add_child(root, stale),
            Err(DomainError::NodeNotFound(_))
        ));
        assert!(matches!(
            tree.add_child(stale, root),
            Err(DomainError::NodeNotFound(_))
        ));
        assert!(tree.get_node(root).unwrap().children.len() == 2);
    }

    #[test]
    fn test_iterators_visit_in_expected_order() {
        let (tree, _) = sample();
        assert_eq!(names(tree.iter()), ["root", "child1", "grandchild1", "child2"]);
        assert_eq!(
            names(tree.iter_breadth_first()),
            ["root", "child1", "child2", "grandchild1"]
        );
    }

    #[test]
    fn test_iterators_on_empty_tree() {
        let tree = TreeArena::new();
        assert_eq!(tree.iter().count(), 0);
        assert_eq!(tree.iter_breadth_first().count(), 0);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_detached_nodes_are_not_traversed() {
        let (mut tree, _) = sample();
        let _ = tree.insert_node(member("orphan"));
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.iter().count(), 4);
    }
}
