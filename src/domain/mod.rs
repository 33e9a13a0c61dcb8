//! Domain layer: family members, the arena tree and succession queries
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod error;
pub mod manager;
pub mod member;
pub mod render;

pub use arena::{TreeArena, TreeNode};
pub use error::{DomainError, DomainResult};
pub use generational_arena::Index;
pub use manager::TreeManager;
pub use member::{AgePolicy, Clock, FixedClock, Member, SystemClock};
pub use render::TreeNodeConvert;
