//! Domain-level errors (no external dependencies)

use generational_arena::Index;
use thiserror::Error;

/// Domain errors represent misuse of the family tree.
///
/// Ordinary query misses (unknown name, failed detach, empty tree) are plain
/// return values and never surface here.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("node not found in tree: {0:?}")]
    NodeNotFound(Index),

    #[error("member not found: {0}")]
    MemberNotFound(String),

    #[error("cannot remove the monarch: {0}")]
    CannotRemoveMonarch(String),

    #[error("cannot attach the monarch below another member: {0}")]
    CannotAttachMonarch(String),

    #[error("attaching {child} below {parent} would create a cycle")]
    CycleDetected { parent: String, child: String },
}

/// Result type for tree operations.
pub type DomainResult<T> = Result<T, DomainError>;
