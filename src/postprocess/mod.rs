//! 译文写出前的可选后处理

pub mod type_links;

pub use type_links::{Replacement, TypeLinker};
