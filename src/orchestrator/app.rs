//! 应用 - 编排层
//!
//! ## 核心流程
//!
//! 读取输入 → 解析 → 分段 → 逐批翻译 → （可选）类型链接替换 → 写出译文
//!
//! ## 资源管理
//!
//! App 是唯一持有 Browser 的地方：启动的无头浏览器在 `shutdown` 时关闭，
//! 连接的外部浏览器保持打开。

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::Browser;
use tracing::{debug, info, warn};

use crate::browser;
use crate::config::{Config, TranslatorKind};
use crate::error::{AppError, AppResult, ConfigError};
use crate::infrastructure::JsExecutor;
use crate::models::Node;
use crate::orchestrator::batch_processor::{BatchProcessor, ProcessReport};
use crate::parser::parse_markdown;
use crate::postprocess::TypeLinker;
use crate::segmenter::Segmenter;
use crate::services::{DeeplSettings, DeeplTranslator, IdentityTranslator, LlmTranslator, Translator};
use crate::utils::logging;

/// 浏览器句柄及其来源
struct BrowserHandle {
    browser: Browser,
    /// 由本进程启动（需要关闭）还是连接到外部浏览器
    launched: bool,
}

/// 一次运行的结果
#[derive(Debug)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub report: ProcessReport,
}

/// 应用主结构
pub struct App {
    config: Config,
    input_path: PathBuf,
    segmenter: Segmenter,
    processor: BatchProcessor,
    translator: Box<dyn Translator>,
    type_linker: Option<TypeLinker>,
    browser: Option<BrowserHandle>,
}

impl App {
    /// 初始化应用，按配置创建翻译器
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::log_startup(&config);

        let (translator, browser): (Box<dyn Translator>, Option<BrowserHandle>) =
            match config.translator {
                TranslatorKind::Deepl => {
                    let (handle, executor) = open_translator_page(&config).await?;
                    let settings = DeeplSettings::from_config(&config);
                    (
                        Box::new(DeeplTranslator::new(executor, settings)) as Box<dyn Translator>,
                        Some(handle),
                    )
                }
                TranslatorKind::Llm => (Box::new(LlmTranslator::new(&config)) as Box<dyn Translator>, None),
                TranslatorKind::Identity => (Box::new(IdentityTranslator) as Box<dyn Translator>, None),
            };

        let mut app = Self::with_translator(config, translator)?;
        app.browser = browser;
        Ok(app)
    }

    /// 使用指定翻译器创建应用（不启动浏览器）
    pub fn with_translator(config: Config, translator: Box<dyn Translator>) -> Result<Self> {
        let input_path = config
            .input_path
            .clone()
            .ok_or(AppError::Config(ConfigError::MissingInput))?;

        let type_linker = if config.type_links {
            let linker = match &config.type_links_file {
                Some(path) => TypeLinker::from_file(Path::new(path))?,
                None => TypeLinker::builtin()?,
            };
            Some(linker)
        } else {
            None
        };

        Ok(Self {
            segmenter: Segmenter::new(config.translate_types.iter().copied(), config.max_batch_length),
            processor: BatchProcessor::new(Duration::from_millis(config.pause_ms)),
            input_path,
            translator,
            type_linker,
            browser: None,
            config,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunSummary> {
        let source = read_input(&self.input_path).await?;
        let nodes: Vec<Node> = parse_markdown(&source)
            .with_context(|| format!("无法解析 {}", self.input_path.display()))?;

        let batches = self.segmenter.segment(&nodes);
        let translatable = batches.iter().filter(|b| b.need_translate).count();
        logging::log_segmented(nodes.len(), batches.len(), translatable);

        if batches.is_empty() {
            warn!("⚠️ 文档为空，仍会写出空的译文文件");
        }

        let report = self.processor.process(self.translator.as_ref(), &batches).await;

        let document = match &self.type_linker {
            Some(linker) => {
                debug!("应用类型链接替换，共 {} 条规则", linker.len());
                linker.apply(&report.text)
            }
            None => report.text.clone(),
        };

        let output_path = self.config.resolve_output_path(&self.input_path);
        write_output(&output_path, &document).await?;

        logging::print_final_stats(
            report.translated(),
            report.failed(),
            report.skipped(),
            &output_path.display().to_string(),
        );

        Ok(RunSummary {
            output_path,
            report,
        })
    }

    /// 释放资源：关闭本进程启动的浏览器
    pub async fn shutdown(self) -> Result<()> {
        if let Some(mut handle) = self.browser {
            if handle.launched {
                info!("关闭无头浏览器");
                handle.browser.close().await?;
                handle.browser.wait().await?;
            }
        }
        Ok(())
    }
}

/// 启动或连接浏览器，得到持有翻译页的执行器
async fn open_translator_page(config: &Config) -> AppResult<(BrowserHandle, JsExecutor)> {
    let (browser, page, launched) = match config.browser_debug_port {
        Some(port) => {
            let (browser, page) =
                browser::connect_to_browser_and_page(port, &config.translator_url).await?;
            (browser, page, false)
        }
        None => {
            let (browser, page) = browser::launch_headless_browser(
                &config.translator_url,
                config.chrome_executable.as_deref(),
            )
            .await?;
            (browser, page, true)
        }
    };

    Ok((BrowserHandle { browser, launched }, JsExecutor::new(page)))
}

async fn read_input(path: &Path) -> AppResult<String> {
    info!("📄 读取: {}", path.display());
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))
}

async fn write_output(path: &Path, content: &str) -> AppResult<()> {
    tokio::fs::write(path, content)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_is_config_error() {
        let err = App::with_translator(Config::default(), Box::new(IdentityTranslator))
            .err()
            .unwrap();
        let app_err = err.downcast_ref::<AppError>().unwrap();
        assert!(matches!(
            app_err,
            AppError::Config(ConfigError::MissingInput)
        ));
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let config = Config {
            input_path: Some(PathBuf::from("definitely/not/here.md")),
            translator: TranslatorKind::Identity,
            ..Default::default()
        };
        let app = App::with_translator(config, Box::new(IdentityTranslator)).unwrap();

        let err = app.run().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::FileRead { .. })
        ));
    }
}
