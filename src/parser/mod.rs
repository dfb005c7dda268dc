//! Markdown 解析
//!
//! 把原始文本切成顶层块级节点，分段器只读取节点类型和源文本片段。

pub mod markdown;

pub use markdown::parse_markdown;
