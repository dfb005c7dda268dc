use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::{Node, NodeType};

/// 解析 Markdown 文本为顶层节点序列
///
/// 只关心深度为 0 的块：每个顶层 `Start` 事件的偏移范围覆盖整个块，
/// 直接截取源文本作为节点的 `raw`。
///
/// 不产生事件的源文本（链接引用定义 `[d]: https://…` 等）从块之间的空隙里找回，
/// 作为 `Other` 节点按原位置插入。
pub fn parse_markdown(text: &str) -> AppResult<Vec<Node>> {
    let options = Options::ENABLE_TABLES | Options::ENABLE_FOOTNOTES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(text, options).into_offset_iter();

    let mut nodes = Vec::new();
    let mut depth: usize = 0;
    // 上一个顶层块的结束偏移
    let mut last_end: usize = 0;

    for (event, range) in parser {
        match event {
            Event::Start(tag) => {
                if depth == 0 {
                    let start = block_start(text, &tag, range.start);
                    push_gap(text, last_end, start, &mut nodes)?;
                    let raw = slice_raw(text, start, range.end)?;
                    nodes.push(Node::new(node_type_of(&tag), raw));
                    last_end = range.end;
                }
                depth += 1;
            }
            Event::End(tag_end) => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    AppError::Parse(format!(
                        "在偏移 {} 处遇到未配对的结束标记 {:?}",
                        range.start, tag_end
                    ))
                })?;
            }
            Event::Rule if depth == 0 => {
                push_gap(text, last_end, range.start, &mut nodes)?;
                let raw = slice_raw(text, range.start, range.end)?;
                nodes.push(Node::new(NodeType::ThematicBreak, raw));
                last_end = range.end;
            }
            other if depth == 0 => {
                debug!("顶层出现非块事件: {:?}", other);
                push_gap(text, last_end, range.start, &mut nodes)?;
                let raw = slice_raw(text, range.start, range.end)?;
                nodes.push(Node::new(NodeType::Other, raw));
                last_end = range.end;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(AppError::Parse(format!("文档结束时仍有 {} 个未闭合的块", depth)));
    }
    push_gap(text, last_end, text.len(), &mut nodes)?;

    debug!("解析完成，共 {} 个顶层节点", nodes.len());
    Ok(nodes)
}

/// 缩进代码块的偏移从缩进之后开始，回退到行首以保留第一行的缩进
fn block_start(text: &str, tag: &Tag<'_>, start: usize) -> usize {
    if !matches!(tag, Tag::CodeBlock(CodeBlockKind::Indented)) {
        return start;
    }
    let line_start = text[..start].rfind('\n').map_or(0, |i| i + 1);
    if text[line_start..start].chars().all(|c| c == ' ' || c == '\t') {
        line_start
    } else {
        start
    }
}

/// 把两个块之间的非空白文本作为 `Other` 节点补回
///
/// 每个以 `[` 开头的行开始一个新节点，保证多条引用定义不会被折叠到同一行。
fn push_gap(text: &str, start: usize, end: usize, nodes: &mut Vec<Node>) -> AppResult<()> {
    if start >= end {
        return Ok(());
    }
    let gap = text
        .get(start..end)
        .ok_or_else(|| AppError::Parse(format!("无效的源文本范围 {}..{}", start, end)))?;

    let mut pieces: Vec<Vec<&str>> = Vec::new();
    for line in gap.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            pieces.push(Vec::new());
            continue;
        }
        let starts_definition = line.trim_start().starts_with('[');
        match pieces.last_mut() {
            Some(current) if !current.is_empty() && !starts_definition => current.push(line),
            _ => pieces.push(vec![line]),
        }
    }

    for piece in pieces.into_iter().filter(|p| !p.is_empty()) {
        let raw = piece.join("\n");
        debug!("找回块之间的源文本: {}", raw);
        nodes.push(Node::new(NodeType::Other, raw));
    }
    Ok(())
}

fn node_type_of(tag: &Tag<'_>) -> NodeType {
    match tag {
        Tag::Paragraph => NodeType::Paragraph,
        Tag::Heading { .. } => NodeType::Header,
        Tag::BlockQuote(_) => NodeType::BlockQuote,
        Tag::List(_) => NodeType::List,
        Tag::Table(_) => NodeType::Table,
        Tag::CodeBlock(_) => NodeType::CodeBlock,
        Tag::HtmlBlock => NodeType::Html,
        Tag::FootnoteDefinition(_) => NodeType::FootnoteDefinition,
        _ => NodeType::Other,
    }
}

/// 截取源文本，去掉结尾换行
fn slice_raw(text: &str, start: usize, end: usize) -> AppResult<String> {
    let raw = text
        .get(start..end)
        .ok_or_else(|| AppError::Parse(format!("无效的源文本范围 {}..{}", start, end)))?;
    Ok(raw.trim_end_matches(['\n', '\r']).to_string())
}
