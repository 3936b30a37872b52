//! Shared fixtures for the integration tests and benchmarks: an independent
//! message encoder and the `TreeNode` example schema.

#![allow(clippy::missing_panics_doc, clippy::must_use_candidate)]

pub mod encoder;
pub mod tree;

pub use encoder::MessageBuilder;
pub use tree::{Layout, TREE_NODE_SIZE, TreeNode, TreeSpec};
