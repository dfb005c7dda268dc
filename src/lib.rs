//! # md_translate
//!
//! 把 Markdown 文档按块分批送去翻译，再按原顺序拼回去的 Rust 应用程序
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `browser/` - 启动或连接浏览器
//! - `infrastructure/` - `JsExecutor`，唯一的 page owner
//!
//! ### ② 业务能力层（Services）
//! - `services/` - `Translator` trait 及其实现（DeepL 网页 / LLM / 原样返回）
//!
//! ### ③ 文档层（Document）
//! - `parser/` - Markdown → 顶层节点
//! - `segmenter/` - 节点 → 批次（规范化 + 分组状态机）
//! - `postprocess/` - 可选的类型链接替换
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 串行处理批次，失败回退原文
//! - `orchestrator/app` - 读取 → 解析 → 分段 → 处理 → 写出
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod parser;
pub mod postprocess;
pub mod segmenter;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use config::{Config, TranslatorKind};
pub use error::{AppError, AppResult};
pub use models::{Batch, Node, NodeType};
pub use orchestrator::{App, BatchOutcome, BatchProcessor, ProcessReport, RunSummary};
pub use parser::parse_markdown;
pub use segmenter::Segmenter;
pub use services::Translator;
