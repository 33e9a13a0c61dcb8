//! Succession queries over a royal family tree.

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::{TreeArena, TreeNode};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::member::Member;
use crate::domain::render;

/// Owns the family tree rooted at the monarch and answers lookup,
/// enumeration and line-of-succession queries.
///
/// The root is fixed at construction. `TreeManager::default()` is the empty
/// tree; every query on it yields no results.
#[derive(Debug, Default)]
pub struct TreeManager {
    tree: TreeArena,
}

impl TreeManager {
    pub fn new(monarch: Member) -> Self {
        Self {
            tree: TreeArena::with_root(monarch),
        }
    }

    pub fn root(&self) -> Option<Index> {
        self.tree.root()
    }

    pub fn tree(&self) -> &TreeArena {
        &self.tree
    }

    pub fn node(&self, idx: Index) -> Option<&TreeNode> {
        self.tree.get_node(idx)
    }

    pub fn member(&self, idx: Index) -> Option<&Member> {
        self.tree.get_node(idx).map(|node| &node.member)
    }

    pub fn depth(&self, idx: Index) -> Option<usize> {
        self.tree.depth(idx)
    }

    /// Creates a node that is not yet part of the tree.
    pub fn create_node(&mut self, member: Member) -> Index {
        self.tree.insert_node(member)
    }

    /// Attaches `child` below `parent`.
    ///
    /// The monarch never gets a parent, and a member cannot be attached below
    /// itself or one of its own descendants.
    #[instrument(level = "debug", skip(self))]
    pub fn add_child(&mut self, parent: Index, child: Index) -> DomainResult<()> {
        if Some(child) == self.tree.root() {
            let name = self.member(child).map(|m| m.name.clone()).unwrap_or_default();
            return Err(DomainError::CannotAttachMonarch(name));
        }
        if self.is_ancestor_or_self(child, parent) {
            let name_of = |idx| self.member(idx).map(|m| m.name.clone()).unwrap_or_default();
            return Err(DomainError::CycleDetected {
                parent: name_of(parent),
                child: name_of(child),
            });
        }
        self.tree.add_child(parent, child)
    }

    fn is_ancestor_or_self(&self, ancestor: Index, idx: Index) -> bool {
        let mut current = Some(idx);
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            current = self.tree.get_node(cur).and_then(|node| node.parent);
        }
        false
    }

    pub fn remove_child(&mut self, parent: Index, child: Index) -> bool {
        self.tree.remove_child(parent, child)
    }

    /// First node named `name` in level order, compared case-insensitively.
    #[instrument(level = "debug", skip(self))]
    pub fn search_breadth_first(&self, name: &str) -> Option<Index> {
        self.tree
            .iter_breadth_first()
            .find(|(_, node)| node.member.has_name(name))
            .map(|(idx, _)| idx)
    }

    /// First node named `name` in depth-first pre-order, compared case-insensitively.
    #[instrument(level = "debug", skip(self))]
    pub fn search_depth_first(&self, name: &str) -> Option<Index> {
        self.tree.root().and_then(|root| self.search_from(root, name))
    }

    fn search_from(&self, idx: Index, name: &str) -> Option<Index> {
        let node = self.tree.get_node(idx)?;
        if node.member.has_name(name) {
            return Some(idx);
        }
        node.children
            .iter()
            .find_map(|&child| self.search_from(child, name))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn all_nodes_breadth_first(&self) -> Vec<Index> {
        self.tree.iter_breadth_first().map(|(idx, _)| idx).collect()
    }

    #[instrument(level = "debug", skip(self))]
    pub fn all_nodes_depth_first(&self) -> Vec<Index> {
        self.tree.iter().map(|(idx, _)| idx).collect()
    }

    /// Living descendants of the monarch in primogeniture order.
    ///
    /// Pre-order depth-first: a member precedes their descendants and siblings
    /// follow birth order. A deceased member is skipped but their living
    /// descendants keep their place.
    #[instrument(level = "debug", skip(self))]
    pub fn line_of_succession(&self) -> Vec<Index> {
        let root = self.tree.root();
        self.tree
            .iter()
            .filter(|&(idx, node)| Some(idx) != root && node.member.is_alive)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// 1-based place of `name` in the line of succession.
    ///
    /// None for unknown names, deceased members and the monarch.
    #[instrument(level = "debug", skip(self))]
    pub fn succession_position(&self, name: &str) -> Option<usize> {
        let idx = self.search_breadth_first(name)?;
        let position = self.succession_position_of(idx);
        debug!(?position, "succession position for {}", name);
        position
    }

    /// 1-based place of the node `idx` in the line of succession.
    pub fn succession_position_of(&self, idx: Index) -> Option<usize> {
        if !self.member(idx)?.is_alive {
            return None;
        }
        self.line_of_succession()
            .iter()
            .position(|&heir| heir == idx)
            .map(|pos| pos + 1)
    }

    /// Indented dump of the whole tree, one member per line.
    pub fn render_tree_text(&self) -> String {
        render::render_tree_text(&self.tree)
    }

    /// Appends `member` as the youngest child of the first member named
    /// `parent_name` in level order.
    #[instrument(level = "debug", skip(self, member), fields(name = %member.name))]
    pub fn add_member(&mut self, parent_name: &str, member: Member) -> DomainResult<Index> {
        let parent = self
            .search_breadth_first(parent_name)
            .ok_or_else(|| DomainError::MemberNotFound(parent_name.to_string()))?;
        let child = self.tree.insert_node(member);
        self.tree.add_child(parent, child)?;
        Ok(child)
    }

    /// Detaches the first member named `name` in level order from their parent.
    ///
    /// The detached subtree stays addressable through the returned handle and
    /// can be attached again with [`TreeManager::add_child`].
    #[instrument(level = "debug", skip(self))]
    pub fn remove_member(&mut self, name: &str) -> DomainResult<Index> {
        let idx = self
            .search_breadth_first(name)
            .ok_or_else(|| DomainError::MemberNotFound(name.to_string()))?;
        if Some(idx) == self.tree.root() {
            return Err(DomainError::CannotRemoveMonarch(name.to_string()));
        }
        if let Some(parent) = self.tree.get_node(idx).and_then(|node| node.parent) {
            self.tree.remove_child(parent, idx);
        }
        Ok(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn member(name: &str, alive: bool) -> Member {
        Member::new(name, NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(), alive)
    }

    // King
    // ├── A
    // │   ├── A1
    // │   └── A2 (dead)
    // └── B (dead)
    //     └── B1
    fn scenario() -> TreeManager {
        let mut manager = TreeManager::new(member("King", true));
        manager.add_member("King", member("A", true)).unwrap();
        manager.add_member("A", member("A1", true)).unwrap();
        manager.add_member("A", member("A2", false)).unwrap();
        manager.add_member("King", member("B", false)).unwrap();
        manager.add_member("B", member("B1", true)).unwrap();
        manager
    }

    fn names(manager: &TreeManager, nodes: &[Index]) -> Vec<String> {
        nodes
            .iter()
            .map(|&idx| manager.member(idx).unwrap().name.clone())
            .collect()
    }

    #[test]
    fn test_line_of_succession() {
        let manager = scenario();
        let line = manager.line_of_succession();
        assert_eq!(names(&manager, &line), ["A", "A1", "B1"]);
    }

    #[test]
    fn test_succession_position() {
        let manager = scenario();
        assert_eq!(manager.succession_position("A"), Some(1));
        assert_eq!(manager.succession_position("a1"), Some(2));
        assert_eq!(manager.succession_position("B1"), Some(3));
        assert_eq!(manager.succession_position("B"), None);
        assert_eq!(manager.succession_position("King"), None);
        assert_eq!(manager.succession_position("Nobody"), None);
    }

    #[test]
    fn test_add_member_to_unknown_parent_fails() {
        let mut manager = scenario();
        let err = manager.add_member("Nobody", member("C", true)).unwrap_err();
        assert!(matches!(err, DomainError::MemberNotFound(name) if name == "Nobody"));
    }

    #[test]
    fn test_remove_member_detaches_subtree() {
        let mut manager = scenario();
        let a = manager.remove_member("a").unwrap();
        assert_eq!(manager.node(a).unwrap().parent, None);
        assert_eq!(manager.search_depth_first("A1"), None);
        assert_eq!(names(&manager, &manager.line_of_succession()), ["B1"]);

        let root = manager.root().unwrap();
        manager.add_child(root, a).unwrap();
        assert_eq!(names(&manager, &manager.line_of_succession()), ["B1", "A", "A1"]);
    }

    #[test]
    fn test_remove_monarch_fails() {
        let mut manager = scenario();
        assert!(matches!(
            manager.remove_member("KING"),
            Err(DomainError::CannotRemoveMonarch(_))
        ));
    }

    #[test]
    fn test_add_child_rejects_monarch() {
        let mut manager = scenario();
        let root = manager.root().unwrap();
        let a = manager.search_breadth_first("A").unwrap();
        assert!(matches!(
            manager.add_child(a, root),
            Err(DomainError::CannotAttachMonarch(name)) if name == "King"
        ));

        let stray = manager.create_node(member("Stray", true));
        assert!(matches!(
            manager.add_child(stray, root),
            Err(DomainError::CannotAttachMonarch(_))
        ));
        assert_eq!(manager.node(root).unwrap().parent, None);
        assert_eq!(manager.depth(root), Some(0));
        assert_eq!(manager.all_nodes_depth_first().len(), 6);
    }

    #[test]
    fn test_add_child_below_own_descendant_fails() {
        let mut manager = scenario();
        let a = manager.search_breadth_first("A").unwrap();
        let a1 = manager.search_breadth_first("A1").unwrap();
        assert!(matches!(
            manager.add_child(a1, a),
            Err(DomainError::CycleDetected { .. })
        ));
        assert!(matches!(
            manager.add_child(a, a),
            Err(DomainError::CycleDetected { .. })
        ));
        assert_eq!(names(&manager, &manager.line_of_succession()), ["A", "A1", "B1"]);
    }

    #[test]
    fn test_succession_position_of_duplicate_names() {
        let mut manager = scenario();
        // a second "A1" deeper in the tree, below B1
        let deep = manager.add_member("B1", member("A1", true)).unwrap();
        assert_eq!(manager.succession_position("A1"), Some(2));
        assert_eq!(manager.succession_position_of(deep), Some(4));
        assert_eq!(manager.succession_position_of(manager.root().unwrap()), None);
    }

    #[test]
    fn test_empty_tree_queries() {
        let manager = TreeManager::default();
        assert_eq!(manager.root(), None);
        assert_eq!(manager.search_breadth_first("King"), None);
        assert_eq!(manager.search_depth_first("King"), None);
        assert!(manager.all_nodes_breadth_first().is_empty());
        assert!(manager.all_nodes_depth_first().is_empty());
        assert!(manager.line_of_succession().is_empty());
        assert_eq!(manager.succession_position("King"), None);
        assert_eq!(manager.render_tree_text(), "");
    }
}
