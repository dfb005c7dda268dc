pub mod batch;
pub mod node;

pub use batch::Batch;
pub use node::{Node, NodeType};
