//! 程序配置
//!
//! 加载顺序：默认值 → 配置文件（`md_translate.toml` 或 `CONFIG_FILE`）→ 环境变量。

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use crate::error::{AppError, AppResult, ConfigError};
use crate::models::NodeType;
use crate::segmenter::DEFAULT_MAX_BATCH_LENGTH;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "md_translate.toml";

/// 翻译器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslatorKind {
    /// DeepL 网页（浏览器驱动）
    Deepl,
    /// OpenAI 兼容的 LLM
    Llm,
    /// 原样返回，用于试运行
    Identity,
}

impl FromStr for TranslatorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deepl" => Ok(TranslatorKind::Deepl),
            "llm" | "openai" => Ok(TranslatorKind::Llm),
            "identity" | "none" => Ok(TranslatorKind::Identity),
            _ => Err(ConfigError::UnknownTranslator(s.to_string())),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 输入 Markdown 文件
    pub input_path: Option<PathBuf>,
    /// 输出文件，未设置时由输入路径推导
    pub output_path: Option<PathBuf>,
    /// 输出文件名前缀
    pub output_prefix: String,
    /// 单批次字符上限
    pub max_batch_length: usize,
    /// 需要翻译的节点类型
    pub translate_types: Vec<NodeType>,
    /// 每次翻译前的暂停（毫秒）
    pub pause_ms: u64,
    pub translator: TranslatorKind,
    pub source_lang: String,
    pub target_lang: String,
    // --- 浏览器配置 ---
    /// 翻译页面地址
    pub translator_url: String,
    /// 等待翻译结果的超时（秒）
    pub result_timeout_secs: u64,
    /// 设置后连接已有浏览器，否则启动无头浏览器
    pub browser_debug_port: Option<u16>,
    pub chrome_executable: Option<String>,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- 类型链接后处理 ---
    pub type_links: bool,
    pub type_links_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: None,
            output_path: None,
            output_prefix: "ru".to_string(),
            max_batch_length: DEFAULT_MAX_BATCH_LENGTH,
            translate_types: NodeType::default_translatable(),
            pause_ms: 5000,
            translator: TranslatorKind::Deepl,
            source_lang: "en".to_string(),
            target_lang: "ru".to_string(),
            translator_url: "https://www.deepl.com/en/translator".to_string(),
            result_timeout_secs: 60,
            browser_debug_port: None,
            chrome_executable: None,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            type_links: false,
            type_links_file: None,
        }
    }
}

/// 配置文件内容，所有字段可选
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    output_prefix: Option<String>,
    max_batch_length: Option<usize>,
    translate_types: Option<Vec<String>>,
    pause_ms: Option<u64>,
    translator: Option<String>,
    source_lang: Option<String>,
    target_lang: Option<String>,
    translator_url: Option<String>,
    result_timeout_secs: Option<u64>,
    browser_debug_port: Option<u16>,
    chrome_executable: Option<String>,
    llm_api_key: Option<String>,
    llm_api_base_url: Option<String>,
    llm_model_name: Option<String>,
    type_links: Option<bool>,
    type_links_file: Option<String>,
}

impl Config {
    /// 完整加载：默认值 → 配置文件 → 环境变量
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        let (path, required) = match std::env::var("CONFIG_FILE") {
            Ok(p) => (PathBuf::from(p), true),
            Err(_) => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        if path.exists() {
            config.apply_file(&path)?;
        } else if required {
            return Err(ConfigError::InvalidFile {
                path: path.display().to_string(),
                message: "文件不存在".to_string(),
            }
            .into());
        }

        config.apply_env()?;
        Ok(config)
    }

    /// 默认值叠加环境变量
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// 叠加配置文件
    pub fn apply_file(&mut self, path: &Path) -> AppResult<()> {
        debug!("加载配置文件: {}", path.display());
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        self.apply_toml(&content).map_err(|e| match e {
            AppError::Config(ConfigError::InvalidFile { message, .. }) => {
                ConfigError::InvalidFile {
                    path: path.display().to_string(),
                    message,
                }
                .into()
            }
            other => other,
        })
    }

    /// 叠加 TOML 文本
    pub fn apply_toml(&mut self, content: &str) -> AppResult<()> {
        let file: FileConfig = toml::from_str(content).map_err(|e| ConfigError::InvalidFile {
            path: String::new(),
            message: e.to_string(),
        })?;

        if let Some(v) = file.output_prefix {
            self.output_prefix = v;
        }
        if let Some(v) = file.max_batch_length {
            self.max_batch_length = v;
        }
        if let Some(v) = file.translate_types {
            self.translate_types = v
                .iter()
                .map(|s| s.parse::<NodeType>())
                .collect::<Result<_, _>>()?;
        }
        if let Some(v) = file.pause_ms {
            self.pause_ms = v;
        }
        if let Some(v) = file.translator {
            self.translator = v.parse()?;
        }
        if let Some(v) = file.source_lang {
            self.source_lang = v;
        }
        if let Some(v) = file.target_lang {
            self.target_lang = v;
        }
        if let Some(v) = file.translator_url {
            self.translator_url = v;
        }
        if let Some(v) = file.result_timeout_secs {
            self.result_timeout_secs = v;
        }
        if file.browser_debug_port.is_some() {
            self.browser_debug_port = file.browser_debug_port;
        }
        if file.chrome_executable.is_some() {
            self.chrome_executable = file.chrome_executable;
        }
        if let Some(v) = file.llm_api_key {
            self.llm_api_key = v;
        }
        if let Some(v) = file.llm_api_base_url {
            self.llm_api_base_url = v;
        }
        if let Some(v) = file.llm_model_name {
            self.llm_model_name = v;
        }
        if let Some(v) = file.type_links {
            self.type_links = v;
        }
        if file.type_links_file.is_some() {
            self.type_links_file = file.type_links_file;
        }
        Ok(())
    }

    /// 叠加环境变量
    pub fn apply_env(&mut self) -> AppResult<()> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    /// 按名称取值的通用叠加逻辑，测试里用闭包代替真实环境变量
    pub fn apply_vars(&mut self, get: impl Fn(&str) -> Option<String>) -> AppResult<()> {
        if let Some(v) = get("INPUT_PATH") {
            self.input_path = Some(PathBuf::from(v));
        }
        if let Some(v) = get("OUTPUT_PATH") {
            self.output_path = Some(PathBuf::from(v));
        }
        if let Some(v) = get("OUTPUT_PREFIX") {
            self.output_prefix = v;
        }
        if let Some(v) = get("MAX_BATCH_LENGTH") {
            self.max_batch_length = parse_var("MAX_BATCH_LENGTH", &v, "usize")?;
        }
        if let Some(v) = get("TRANSLATE_TYPES") {
            self.translate_types = v
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.parse::<NodeType>())
                .collect::<Result<_, _>>()?;
        }
        if let Some(v) = get("PAUSE_MS") {
            self.pause_ms = parse_var("PAUSE_MS", &v, "u64")?;
        }
        if let Some(v) = get("TRANSLATOR") {
            self.translator = v.parse()?;
        }
        if let Some(v) = get("SOURCE_LANG") {
            self.source_lang = v;
        }
        if let Some(v) = get("TARGET_LANG") {
            self.target_lang = v;
        }
        if let Some(v) = get("TRANSLATOR_URL") {
            self.translator_url = v;
        }
        if let Some(v) = get("RESULT_TIMEOUT_SECS") {
            self.result_timeout_secs = parse_var("RESULT_TIMEOUT_SECS", &v, "u64")?;
        }
        if let Some(v) = get("BROWSER_DEBUG_PORT") {
            self.browser_debug_port = Some(parse_var("BROWSER_DEBUG_PORT", &v, "u16")?);
        }
        if let Some(v) = get("CHROME_EXECUTABLE") {
            self.chrome_executable = Some(v);
        }
        if let Some(v) = get("LLM_API_KEY") {
            self.llm_api_key = v;
        }
        if let Some(v) = get("LLM_API_BASE_URL") {
            self.llm_api_base_url = v;
        }
        if let Some(v) = get("LLM_MODEL_NAME") {
            self.llm_model_name = v;
        }
        if let Some(v) = get("TYPE_LINKS") {
            self.type_links = parse_var("TYPE_LINKS", &v, "bool")?;
        }
        if let Some(v) = get("TYPE_LINKS_FILE") {
            self.type_links_file = Some(v);
        }
        Ok(())
    }

    /// 输出文件路径：显式指定优先，否则在输入文件名前加前缀
    pub fn resolve_output_path(&self, input: &Path) -> PathBuf {
        match &self.output_path {
            Some(p) => p.clone(),
            None => derive_output_path(input, &self.output_prefix),
        }
    }
}

/// `docs/fs.md` + `ru` → `docs/ru.fs.md`
pub fn derive_output_path(input: &Path, prefix: &str) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    input.with_file_name(format!("{}.{}", prefix, file_name))
}

fn parse_var<T: FromStr>(name: &str, value: &str, expected_type: &str) -> AppResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::env_parse_failed(name, value, expected_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_match_reference_behavior() {
        let config = Config::default();
        assert_eq!(config.max_batch_length, 2000);
        assert_eq!(config.pause_ms, 5000);
        assert_eq!(config.output_prefix, "ru");
        assert_eq!(config.translator, TranslatorKind::Deepl);
        assert!(!config.type_links);
    }

    #[test]
    fn test_apply_vars_overrides() {
        let env = vars(&[
            ("MAX_BATCH_LENGTH", "500"),
            ("TRANSLATE_TYPES", "Paragraph, Table"),
            ("TRANSLATOR", "identity"),
            ("BROWSER_DEBUG_PORT", "9222"),
            ("TYPE_LINKS", "true"),
        ]);
        let mut config = Config::default();
        config.apply_vars(|k| env.get(k).cloned()).unwrap();

        assert_eq!(config.max_batch_length, 500);
        assert_eq!(
            config.translate_types,
            vec![NodeType::Paragraph, NodeType::Table]
        );
        assert_eq!(config.translator, TranslatorKind::Identity);
        assert_eq!(config.browser_debug_port, Some(9222));
        assert!(config.type_links);
    }

    #[test]
    fn test_apply_vars_rejects_bad_number() {
        let env = vars(&[("PAUSE_MS", "soon")]);
        let err = Config::default()
            .apply_vars(|k| env.get(k).cloned())
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::EnvVarParseFailed { .. })
        ));
    }

    #[test]
    fn test_apply_vars_rejects_unknown_type() {
        let env = vars(&[("TRANSLATE_TYPES", "Paragraph,Banner")]);
        let err = Config::default()
            .apply_vars(|k| env.get(k).cloned())
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::UnknownNodeType(_))
        ));
    }

    #[test]
    fn test_apply_toml() {
        let mut config = Config::default();
        config
            .apply_toml(
                r#"
                max_batch_length = 1500
                translate_types = ["Header", "Paragraph"]
                translator = "llm"
                target_lang = "de"
                output_prefix = "de"
                "#,
            )
            .unwrap();

        assert_eq!(config.max_batch_length, 1500);
        assert_eq!(
            config.translate_types,
            vec![NodeType::Header, NodeType::Paragraph]
        );
        assert_eq!(config.translator, TranslatorKind::Llm);
        assert_eq!(config.target_lang, "de");
        assert_eq!(config.pause_ms, 5000);
    }

    #[test]
    fn test_apply_toml_rejects_unknown_key() {
        let err = Config::default().apply_toml("max_batch = 3").unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::InvalidFile { .. })));
    }

    #[test]
    fn test_derive_output_path() {
        assert_eq!(
            derive_output_path(Path::new("docs/fs.md"), "ru"),
            PathBuf::from("docs/ru.fs.md")
        );
        assert_eq!(
            derive_output_path(Path::new("README.md"), "ru"),
            PathBuf::from("ru.README.md")
        );
    }

    #[test]
    fn test_explicit_output_path_wins() {
        let config = Config {
            output_path: Some(PathBuf::from("out.md")),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_output_path(Path::new("in.md")),
            PathBuf::from("out.md")
        );
    }
}
