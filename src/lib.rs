//! Royal succession trees.
//!
//! A [`domain::TreeManager`] owns a family tree rooted at the monarch and
//! answers breadth/depth-first lookups, full enumerations, the primogeniture
//! line of succession and a member's place in it.
//!
//! ```
//! use chrono::NaiveDate;
//! use lineage::domain::{Member, TreeManager};
//!
//! let born = |y| NaiveDate::from_ymd_opt(y, 1, 1).unwrap();
//! let mut tree = TreeManager::new(Member::new("King", born(1950), true));
//! tree.add_member("King", Member::new("A", born(1975), true)).unwrap();
//! tree.add_member("King", Member::new("B", born(1977), false)).unwrap();
//! tree.add_member("B", Member::new("B1", born(2005), true)).unwrap();
//!
//! assert_eq!(tree.succession_position("b1"), Some(2));
//! assert_eq!(tree.succession_position("B"), None);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
