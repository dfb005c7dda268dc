//! 分段层
//!
//! - `normalize` - 节点文本规范化
//! - `segment` - 节点 → 批次的分组状态机

pub mod normalize;
pub mod segment;

pub use normalize::normalize;
pub use segment::{Segmenter, BATCH_SEPARATOR, DEFAULT_MAX_BATCH_LENGTH};
