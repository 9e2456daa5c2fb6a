//! Output document tree
//!
//!     The converter builds an [`OutputTree`] (arena of [`OutputNode`]s) during phase one.
//!     Phase two ([`render`]) serializes it bottom-up into the final HTML string.
//!
//!     .
//!     ├── tree.rs     # arena, ids, attach/detach with cycle rejection
//!     ├── nodes.rs    # closed set of node kinds and their markup
//!     └── render.rs   # iterative post-order serialization

pub mod nodes;
pub mod render;
pub mod tree;

pub use nodes::{Kind, NodeKind, RenderEnv, Rendered, Style, UNRESOLVED};
pub use render::render;
pub use tree::{NodeId, OutputNode, OutputTree, Slot, TreeError};
