//! 翻译能力
//!
//! 批次处理器只认识这个 trait，不关心背后是浏览器、LLM 还是别的东西。

use anyhow::Result;
use async_trait::async_trait;

/// 翻译器
///
/// 任何失败都统一视为"这个批次没有译文"，由调用方回退到原文。
#[async_trait]
pub trait Translator: Send + Sync {
    /// 翻译一段文本
    async fn translate(&self, text: &str) -> Result<String>;

    /// 用于日志显示的名称
    fn name(&self) -> &str;
}

/// 原样返回的翻译器，用于试运行
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityTranslator;

#[async_trait]
impl Translator for IdentityTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        Ok(text.to_string())
    }

    fn name(&self) -> &str {
        "identity"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_translator() {
        let translator = IdentityTranslator;
        let out = tokio_test::block_on(translator.translate("# Title\n\nbody")).unwrap();
        assert_eq!(out, "# Title\n\nbody");
        assert_eq!(translator.name(), "identity");
    }
}
