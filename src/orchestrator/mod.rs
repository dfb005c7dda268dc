//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用
//! - 管理应用生命周期（初始化、运行、清理）
//! - 管理浏览器资源（Browser、JsExecutor）
//! - 串起 解析 → 分段 → 处理 → 写出
//!
//! ### `batch_processor` - 批次处理器
//! - 严格按顺序处理批次
//! - 翻译前暂停，失败回退原文
//! - 输出逐批结果统计
//!
//! ## 层次关系
//!
//! ```text
//! app (一个文档)
//!     ↓
//! segmenter (Vec<Node> → Vec<Batch>)
//!     ↓
//! batch_processor (Vec<Batch> → String)
//!     ↓
//! services (能力层：deepl / llm / identity)
//!     ↓
//! infrastructure (基础设施：JsExecutor)
//! ```

pub mod app;
pub mod batch_processor;

// 重新导出主要类型
pub use app::{App, RunSummary};
pub use batch_processor::{BatchOutcome, BatchProcessor, ProcessReport};
