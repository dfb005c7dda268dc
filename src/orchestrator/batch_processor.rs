//! 批次处理器 - 编排层
//!
//! ## 职责
//!
//! 按顺序把每个批次变成最终文本：
//!
//! 1. **需要翻译**：先暂停一段时间（避免被翻译服务当成机器人），再调用翻译器
//!    - 成功：写入译文
//!    - 失败：写入原文，继续下一个批次
//! 2. **不需要翻译**：原样写入
//!
//! 每个批次的输出后面跟一个空行，顺序与输入完全一致。
//!
//! ## 设计特点
//!
//! - **严格串行**：同一时间只有一个翻译请求，翻译页面是共享的有状态资源
//! - **失败隔离**：单个批次失败不影响其他批次，整个运行一定完成
//! - **非阻塞等待**：暂停使用 `tokio::time::sleep`

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::models::Batch;
use crate::segmenter::BATCH_SEPARATOR;
use crate::services::Translator;
use crate::utils::logging::truncate_text;

/// 单个批次的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// 翻译成功
    Translated,
    /// 无需翻译，原样保留
    Skipped,
    /// 翻译失败，已回退为原文
    Failed,
}

/// 整次运行的结果
#[derive(Debug, Clone, Default)]
pub struct ProcessReport {
    /// 拼接好的输出文档
    pub text: String,
    /// 按批次顺序的处理结果
    pub outcomes: Vec<BatchOutcome>,
}

impl ProcessReport {
    pub fn translated(&self) -> usize {
        self.count(BatchOutcome::Translated)
    }

    pub fn failed(&self) -> usize {
        self.count(BatchOutcome::Failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(BatchOutcome::Skipped)
    }

    fn count(&self, outcome: BatchOutcome) -> usize {
        self.outcomes.iter().filter(|o| **o == outcome).count()
    }
}

/// 批次处理器
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    pause: Duration,
}

impl BatchProcessor {
    /// # 参数
    /// - `pause`: 每次翻译请求前的等待时间
    pub fn new(pause: Duration) -> Self {
        Self { pause }
    }

    /// 依次处理所有批次
    pub async fn process(&self, translator: &dyn Translator, batches: &[Batch]) -> ProcessReport {
        let total = batches.len();
        let mut report = ProcessReport {
            text: String::with_capacity(batches.iter().map(|b| b.data.len() + 2).sum()),
            outcomes: Vec::with_capacity(total),
        };

        for (idx, batch) in batches.iter().enumerate() {
            let index = idx + 1;
            let outcome = self
                .process_one(translator, batch, index, total, &mut report.text)
                .await;
            report.text.push_str(BATCH_SEPARATOR);
            report.outcomes.push(outcome);
        }

        report
    }

    async fn process_one(
        &self,
        translator: &dyn Translator,
        batch: &Batch,
        index: usize,
        total: usize,
        out: &mut String,
    ) -> BatchOutcome {
        if !batch.need_translate {
            info!("[{}/{}] ⏭️ 跳过: {}", index, total, truncate_text(&batch.data, 40));
            out.push_str(&batch.data);
            return BatchOutcome::Skipped;
        }

        if !self.pause.is_zero() {
            debug!("[{}/{}] 等待 {} ms", index, total, self.pause.as_millis());
            sleep(self.pause).await;
        }

        match translator.translate(&batch.data).await {
            Ok(translated) => {
                info!(
                    "[{}/{}] ✓ 已翻译 ({}): {}",
                    index,
                    total,
                    translator.name(),
                    truncate_text(&translated, 60)
                );
                out.push_str(&translated);
                BatchOutcome::Translated
            }
            Err(e) => {
                warn!("[{}/{}] ❌ 翻译失败，保留原文: {:#}", index, total, e);
                out.push_str(&batch.data);
                BatchOutcome::Failed
            }
        }
    }
}
