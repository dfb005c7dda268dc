//! DeepL 网页翻译 - 业务能力层
//!
//! 通过浏览器页面驱动 DeepL 网页版：选语言 → 填原文 → 等译文出现 → 读取。
//! 整个进程只有一个页面，调用方保证同一时间只有一个请求。

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::time::{sleep, timeout};
use tracing::debug;

use crate::config::Config;
use crate::infrastructure::JsExecutor;
use crate::services::translator::Translator;

const SOURCE_LANG_BUTTON: &str = "button[data-testid=translator-source-lang-btn]";
const TARGET_LANG_BUTTON: &str = "button[data-testid=translator-target-lang-btn]";
const SOURCE_EDITOR: &str = "div[aria-labelledby=translation-source-heading]";
const RESULT_READY: &str = "div[aria-labelledby=translation-results-heading] span";
const RESULT_TEXTAREA: &str = "d-textarea[aria-labelledby=translation-results-heading]";

/// DeepL 页面参数
#[derive(Debug, Clone)]
pub struct DeeplSettings {
    pub url: String,
    pub source_lang: String,
    pub target_lang: String,
    /// 等待译文出现的最长时间
    pub result_timeout: Duration,
    /// 轮询译文的间隔
    pub poll_interval: Duration,
}

impl DeeplSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            url: config.translator_url.clone(),
            source_lang: config.source_lang.clone(),
            target_lang: config.target_lang.clone(),
            result_timeout: Duration::from_secs(config.result_timeout_secs),
            poll_interval: Duration::from_millis(300),
        }
    }
}

/// DeepL 网页翻译器
pub struct DeeplTranslator {
    executor: JsExecutor,
    settings: DeeplSettings,
}

impl DeeplTranslator {
    pub fn new(executor: JsExecutor, settings: DeeplSettings) -> Self {
        Self { executor, settings }
    }

    /// 重新打开翻译页并选择语言
    ///
    /// 每次请求都从干净的页面开始，避免上一次的原文残留。
    async fn prepare_page(&self) -> Result<()> {
        self.executor.goto(&self.settings.url).await?;

        self.executor.click(SOURCE_LANG_BUTTON).await?;
        self.executor
            .click(&lang_option_selector(&self.settings.source_lang))
            .await?;
        self.executor.click(TARGET_LANG_BUTTON).await?;
        self.executor
            .click(&lang_option_selector(&self.settings.target_lang))
            .await?;
        Ok(())
    }

    async fn fill_source(&self, text: &str) -> Result<()> {
        let read_back: i64 = self.executor.eval_as(fill_source_js(text)?).await?;
        if read_back < 0 {
            return Err(anyhow!("未找到原文输入框: {}", SOURCE_EDITOR));
        }
        debug!(
            "原文已填入: 写入 {} 字符，读回 {} 字符",
            text.chars().count(),
            read_back
        );
        Ok(())
    }

    /// 轮询直到译文出现或超时
    async fn wait_for_result(&self) -> Result<String> {
        let poll = async {
            loop {
                let text: String = self.executor.eval_as(read_result_js()).await?;
                if !text.trim().is_empty() {
                    return Ok::<String, anyhow::Error>(text);
                }
                sleep(self.settings.poll_interval).await;
            }
        };

        timeout(self.settings.result_timeout, poll)
            .await
            .map_err(|_| {
                anyhow!(
                    "等待译文超时 ({} 秒)",
                    self.settings.result_timeout.as_secs()
                )
            })?
    }
}

#[async_trait]
impl Translator for DeeplTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        debug!("DeepL 翻译，原文长度: {} 字符", text.chars().count());

        self.prepare_page().await?;
        self.fill_source(text).await?;
        let raw = self.wait_for_result().await?;

        Ok(tidy_result(&raw))
    }

    fn name(&self) -> &str {
        "deepl"
    }
}

fn lang_option_selector(lang: &str) -> String {
    format!("button[data-testid=translator-lang-option-{}]", lang)
}

/// 把原文写进可编辑区域并触发 input 事件，返回读回的字符数（未找到输入框时为 -1）
fn fill_source_js(text: &str) -> Result<String> {
    Ok(format!(
        r#"
        (() => {{
            const el = document.querySelector({selector});
            if (!el) return -1;
            el.focus();
            el.textContent = {text};
            el.dispatchEvent(new InputEvent('input', {{ bubbles: true }}));
            return [...el.textContent].length;
        }})()
        "#,
        selector = serde_json::to_string(SOURCE_EDITOR)?,
        text = serde_json::to_string(text)?,
    ))
}

/// 译文尚未就绪时返回空字符串
fn read_result_js() -> String {
    format!(
        r#"
        (() => {{
            if (!document.querySelector({ready})) return "";
            const out = document.querySelector({textarea});
            return out ? out.innerText : "";
        }})()
        "#,
        ready = serde_json::Value::from(RESULT_READY),
        textarea = serde_json::Value::from(RESULT_TEXTAREA),
    )
}

/// 网页版会在结果开头多插一个空行，只折叠第一处
fn tidy_result(raw: &str) -> String {
    raw.replacen("\n\n", "\n", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_option_selector() {
        assert_eq!(
            lang_option_selector("ru"),
            "button[data-testid=translator-lang-option-ru]"
        );
    }

    #[test]
    fn test_fill_source_js_escapes_text() {
        let js = fill_source_js("He said \"hi\"\n</script>").unwrap();
        assert!(js.contains(r#""He said \"hi\"\n</script>""#));
        assert!(js.contains(r#""div[aria-labelledby=translation-source-heading]""#));
        assert!(js.contains("return -1;"));
        assert!(js.contains("return [...el.textContent].length;"));
    }

    #[test]
    fn test_read_result_js_quotes_selectors() {
        let js = read_result_js();
        assert!(js.contains(r#""d-textarea[aria-labelledby=translation-results-heading]""#));
    }

    #[test]
    fn test_tidy_result_collapses_first_blank_line_only() {
        assert_eq!(tidy_result("a\n\nb\n\nc"), "a\nb\n\nc");
        assert_eq!(tidy_result("single"), "single");
    }

    #[test]
    fn test_settings_from_config() {
        let config = Config {
            result_timeout_secs: 7,
            ..Default::default()
        };
        let settings = DeeplSettings::from_config(&config);
        assert_eq!(settings.result_timeout, Duration::from_secs(7));
        assert_eq!(settings.source_lang, "en");
        assert_eq!(settings.target_lang, "ru");
    }
}
