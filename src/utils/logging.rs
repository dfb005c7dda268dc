/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// 初始化日志
///
/// 默认级别 `info`，可通过 `RUST_LOG` 覆盖。重复调用不会 panic。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - Markdown 分批翻译");
    info!(
        "🌐 翻译器: {:?} ({} → {})",
        config.translator, config.source_lang, config.target_lang
    );
    info!(
        "📏 单批次上限: {} 字符 | ⏱️ 请求间隔: {} ms",
        config.max_batch_length, config.pause_ms
    );
    info!("{}", "=".repeat(60));
}

/// 记录分段结果
///
/// # 参数
/// - `nodes`: 节点总数
/// - `batches`: 批次总数
/// - `translatable`: 需要翻译的批次数
pub fn log_segmented(nodes: usize, batches: usize, translatable: usize) {
    info!("✓ 解析得到 {} 个节点", nodes);
    info!(
        "📦 分为 {} 个批次，其中 {} 个需要翻译\n",
        batches, translatable
    );
}

/// 打印最终统计信息
///
/// # 参数
/// - `translated`: 翻译成功数量
/// - `failed`: 翻译失败数量
/// - `skipped`: 原样保留数量
/// - `output_path`: 输出文件路径
pub fn print_final_stats(translated: usize, failed: usize, skipped: usize, output_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 已翻译: {}/{}", translated, translated + failed);
    info!("❌ 失败: {}", failed);
    info!("⏭️ 原样保留: {}", skipped);
    info!("{}", "=".repeat(60));
    info!("\n译文已保存至: {}", output_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
