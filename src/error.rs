use thiserror::Error;

/// 应用程序错误类型
///
/// 翻译失败不在这里：单个批次翻译失败由批次处理器就地吸收，
/// 这里只列出会终止整个运行的错误。
#[derive(Debug, Error)]
pub enum AppError {
    /// Markdown 解析失败
    #[error("Markdown 解析失败: {0}")]
    Parse(String),

    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 浏览器相关错误（仅限启动/连接阶段）
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 未知的节点类型
    #[error("未知的节点类型: {0}")]
    UnknownNodeType(String),
    /// 未知的翻译器
    #[error("未知的翻译器: {0}")]
    UnknownTranslator(String),
    /// 缺少输入文件
    #[error("未指定输入文件（命令行第一个参数或 INPUT_PATH）")]
    MissingInput,
    /// 配置文件无法读取或解析
    #[error("配置文件 {path} 无效: {message}")]
    InvalidFile { path: String, message: String },
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {message}")]
    ConnectionFailed { port: u16, message: String },
    /// 启动浏览器失败
    #[error("启动浏览器失败: {0}")]
    LaunchFailed(String),
    /// 创建页面失败
    #[error("创建页面失败: {0}")]
    PageCreationFailed(String),
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::FileRead {
            path: path.into(),
            source,
        }
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// 创建环境变量解析错误
    pub fn env_parse_failed(
        var_name: impl Into<String>,
        value: impl Into<String>,
        expected_type: impl Into<String>,
    ) -> Self {
        AppError::Config(ConfigError::EnvVarParseFailed {
            var_name: var_name.into(),
            value: value.into(),
            expected_type: expected_type.into(),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_read_error_mentions_path() {
        let err = AppError::file_read_failed(
            "docs/fs.md",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        let msg = err.to_string();
        assert!(msg.contains("docs/fs.md"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: AppError = ConfigError::UnknownNodeType("Banner".to_string()).into();
        assert!(matches!(err, AppError::Config(ConfigError::UnknownNodeType(_))));
        assert!(err.to_string().contains("Banner"));
    }

    #[test]
    fn test_env_parse_failed() {
        let err = AppError::env_parse_failed("PAUSE_MS", "soon", "u64");
        assert_eq!(
            err.to_string(),
            "配置错误: 环境变量 PAUSE_MS 解析失败: 值 'soon' 无法转换为 u64"
        );
    }
}
