use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// 块级节点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// 段落
    Paragraph,
    /// 标题
    Header,
    /// 引用块
    BlockQuote,
    /// 列表
    List,
    /// 表格
    Table,
    /// 代码块
    CodeBlock,
    /// HTML 块
    Html,
    /// 分隔线
    ThematicBreak,
    /// 脚注定义
    FootnoteDefinition,
    /// 其他
    Other,
}

impl NodeType {
    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            NodeType::Paragraph => "Paragraph",
            NodeType::Header => "Header",
            NodeType::BlockQuote => "BlockQuote",
            NodeType::List => "List",
            NodeType::Table => "Table",
            NodeType::CodeBlock => "CodeBlock",
            NodeType::Html => "Html",
            NodeType::ThematicBreak => "HorizontalRule",
            NodeType::FootnoteDefinition => "FootnoteDefinition",
            NodeType::Other => "Other",
        }
    }

    /// 默认需要翻译的类型
    pub fn default_translatable() -> Vec<NodeType> {
        vec![
            NodeType::Paragraph,
            NodeType::BlockQuote,
            NodeType::Header,
            NodeType::List,
        ]
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NodeType {
    type Err = ConfigError;

    /// 忽略大小写，同时接受几个常见别名
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paragraph" => Ok(NodeType::Paragraph),
            "header" | "heading" => Ok(NodeType::Header),
            "blockquote" => Ok(NodeType::BlockQuote),
            "list" => Ok(NodeType::List),
            "table" => Ok(NodeType::Table),
            "codeblock" => Ok(NodeType::CodeBlock),
            "html" => Ok(NodeType::Html),
            "horizontalrule" | "thematicbreak" => Ok(NodeType::ThematicBreak),
            "footnotedefinition" => Ok(NodeType::FootnoteDefinition),
            "other" => Ok(NodeType::Other),
            _ => Err(ConfigError::UnknownNodeType(s.to_string())),
        }
    }
}

/// 解析器产出的块级节点，只读
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub node_type: NodeType,
    /// 源文本片段，保留内部换行，不含结尾换行
    pub raw: String,
}

impl Node {
    pub fn new(node_type: NodeType, raw: impl Into<String>) -> Self {
        Self {
            node_type,
            raw: raw.into(),
        }
    }
}
