//! Family definition files: TOML descriptions of a royal house.
//!
//! ```toml
//! [monarch]
//! name = "King"
//! born = "1950-01-01"
//!
//! [[monarch.children]]
//! name = "Heir"
//! born = "1975-01-01"
//! title = "Prince"
//! ```
//!
//! Children are listed in birth order; that order becomes the order of
//! succession among siblings.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use generational_arena::Index;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Member, TreeManager};

const HOUSE_OF_WINDSOR: &str = include_str!("../../resources/house_of_windsor.toml");
const BUILTIN_PATH: &str = "<builtin:house_of_windsor>";

/// One member entry with nested children.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MemberDefinition {
    pub name: String,
    pub born: NaiveDate,
    #[serde(default = "default_alive")]
    pub alive: bool,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub died: Option<NaiveDate>,
    #[serde(default)]
    pub children: Vec<MemberDefinition>,
}

fn default_alive() -> bool {
    true
}

impl MemberDefinition {
    pub fn to_member(&self) -> Member {
        let member = Member::new(self.name.clone(), self.born, self.alive).with_title(self.title.clone());
        match self.died {
            Some(died) => member.with_date_of_death(died),
            None => member,
        }
    }
}

/// A royal house rooted at its monarch.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FamilyDefinition {
    pub monarch: MemberDefinition,
}

impl FamilyDefinition {
    /// Parse a family definition; `path` is only used for error reporting.
    pub fn parse(content: &str, path: &Path) -> ApplicationResult<Self> {
        toml::from_str(content).map_err(|e| ApplicationError::FamilyFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> ApplicationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::FamilyFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content, path)
    }

    /// The House of Windsor as of the accession of Charles III.
    pub fn house_of_windsor() -> ApplicationResult<Self> {
        Self::parse(HOUSE_OF_WINDSOR, &PathBuf::from(BUILTIN_PATH))
    }

    /// Builds the tree iteratively, attaching siblings in file order.
    #[instrument(level = "debug", skip(self), fields(monarch = %self.monarch.name))]
    pub fn build(&self) -> ApplicationResult<TreeManager> {
        let mut manager = TreeManager::new(self.monarch.to_member());
        // Pushed in reverse so that pops attach the eldest child first
        let mut stack: Vec<(&MemberDefinition, Index)> = Vec::new();
        if let Some(root) = manager.root() {
            stack.extend(self.monarch.children.iter().rev().map(|c| (c, root)));
        }

        while let Some((definition, parent)) = stack.pop() {
            let idx = manager.create_node(definition.to_member());
            manager.add_child(parent, idx)?;
            stack.extend(definition.children.iter().rev().map(|c| (c, idx)));
        }

        debug!("built family tree with {} members", manager.tree().len());
        Ok(manager)
    }
}

/// Loads `path` if given, otherwise the built-in House of Windsor.
pub fn load_family(path: Option<&Path>) -> ApplicationResult<TreeManager> {
    let definition = match path {
        Some(path) => FamilyDefinition::load(path)?,
        None => FamilyDefinition::house_of_windsor()?,
    };
    definition.build()
}
