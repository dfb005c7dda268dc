//! 分段器
//!
//! 把有序节点序列切成有序批次序列：尽量把可翻译节点合并成大批次
//! 以减少翻译请求次数，同时遵守长度上限和 HTML 边界规则。
//!
//! 实现为一个只有一个状态变量（当前打开的批次）的状态机，单遍扫描。

use std::collections::HashSet;

use tracing::debug;

use crate::models::{Batch, Node, NodeType};
use crate::segmenter::normalize::{normalize, starts_with_html};

/// 批次内节点之间的分隔符（空行）
pub const BATCH_SEPARATOR: &str = "\n\n";

/// 默认的单批次字符上限
pub const DEFAULT_MAX_BATCH_LENGTH: usize = 2000;

/// 分段器
#[derive(Debug, Clone)]
pub struct Segmenter {
    translatable: HashSet<NodeType>,
    max_batch_length: usize,
}

/// 当前打开的批次
///
/// `chars` 缓存 `batch.data` 的字符数，避免每次合并都重新计数。
struct OpenBatch {
    batch: Batch,
    chars: usize,
}

/// 状态机状态
enum SegmentState {
    /// 初始哨兵：尚未收到任何节点
    Empty,
    /// 有一个打开的批次
    Open(OpenBatch),
}

impl Segmenter {
    /// 创建新的分段器
    pub fn new(translatable: impl IntoIterator<Item = NodeType>, max_batch_length: usize) -> Self {
        Self {
            translatable: translatable.into_iter().collect(),
            max_batch_length,
        }
    }

    pub fn max_batch_length(&self) -> usize {
        self.max_batch_length
    }

    pub fn is_translatable(&self, node_type: NodeType) -> bool {
        self.translatable.contains(&node_type)
    }

    /// 对节点序列分段
    pub fn segment(&self, nodes: &[Node]) -> Vec<Batch> {
        let mut batches = Vec::new();
        let mut state = SegmentState::Empty;

        for node in nodes {
            state = self.step(state, node, &mut batches);
        }
        close(state, &mut batches);

        debug!("分段完成: {} 个节点 → {} 个批次", nodes.len(), batches.len());
        batches
    }

    /// 状态转移：消费一个节点，必要时把关闭的批次推入 `out`
    fn step(&self, state: SegmentState, node: &Node, out: &mut Vec<Batch>) -> SegmentState {
        let text = normalize(node);
        let text_chars = text.chars().count();

        if !self.is_translatable(node.node_type) {
            close(state, out);
            return SegmentState::Open(OpenBatch {
                batch: Batch::passthrough(text),
                chars: text_chars,
            });
        }

        match state {
            SegmentState::Open(mut open)
                if open.batch.need_translate
                    && self.fits(open.chars, text_chars)
                    && !starts_with_html(node) =>
            {
                open.batch.data.push_str(BATCH_SEPARATOR);
                open.batch.data.push_str(&text);
                open.chars += BATCH_SEPARATOR.len() + text_chars;
                SegmentState::Open(open)
            }
            other => {
                close(other, out);
                SegmentState::Open(OpenBatch {
                    batch: Batch::translatable(text),
                    chars: text_chars,
                })
            }
        }
    }

    /// 合并后的长度必须严格小于上限
    fn fits(&self, current_chars: usize, text_chars: usize) -> bool {
        current_chars + BATCH_SEPARATOR.len() + text_chars < self.max_batch_length
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(NodeType::default_translatable(), DEFAULT_MAX_BATCH_LENGTH)
    }
}

/// 关闭当前批次；哨兵状态不产生任何输出
fn close(state: SegmentState, out: &mut Vec<Batch>) {
    if let SegmentState::Open(open) = state {
        out.push(open.batch);
    }
}
