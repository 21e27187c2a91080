//! Branch-and-bound search over LP relaxations.

mod node;
mod tree;

pub use node::{BranchConstraint, BranchDirection, NodeRecord, NodeStatus};
pub use tree::BranchAndBound;
