pub mod assembler;
pub mod render;

pub use assembler::{AssembleError, ThreadAssembler};
pub use render::render_tree;

// Re-export key types from threadscope-types
pub use threadscope_types::{AssembleMode, AssembledThread, NodeRef, Post, ThreadNode};
