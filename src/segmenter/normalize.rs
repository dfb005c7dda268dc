//! 节点文本规范化

use crate::models::{Node, NodeType};

/// 节点进入批次前的规范化
///
/// 列表保持原样（结构依赖换行）；其他类型把换行折叠为单个空格，
/// 否则翻译器会把换行当成段落分隔。
pub fn normalize(node: &Node) -> String {
    match node.node_type {
        NodeType::List => node.raw.clone(),
        _ => collapse_newlines(&node.raw),
    }
}

/// 把 `\r\n` 和 `\n` 都替换为一个空格
pub fn collapse_newlines(text: &str) -> String {
    text.replace("\r\n", " ").replace('\n', " ")
}

/// 节点是否以 HTML 开头
pub fn starts_with_html(node: &Node) -> bool {
    node.raw.starts_with('<')
}
