//! Application layer: loading family definitions into a tree
//!
//! This layer turns external input into domain values.

pub mod error;
pub mod family;

pub use error::{ApplicationError, ApplicationResult};
pub use family::{FamilyDefinition, MemberDefinition};
