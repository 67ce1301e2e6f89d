//! Reconciling extracted metadata with an existing metadata document.
//!
//! - `check` - consistency report and the merge gate
//! - `merge` - combining the two snapshots

mod check;
mod merge;

pub use check::{
    check_consistency, ready_to_merge, ConsistencyCheck, ConsistencyCheckKind, ConsistencyReport,
};
pub use merge::merge;
