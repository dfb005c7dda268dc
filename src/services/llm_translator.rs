//! LLM 翻译 - 业务能力层
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 兼容 OpenAI API 的服务（自定义 API 端点和模型）

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::services::translator::Translator;

/// LLM 翻译器
pub struct LlmTranslator {
    client: Client<OpenAIConfig>,
    model_name: String,
    system_prompt: String,
}

impl LlmTranslator {
    /// 创建新的 LLM 翻译器
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            system_prompt: system_prompt(&config.source_lang, &config.target_lang),
        }
    }
}

#[async_trait]
impl Translator for LlmTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("原文长度: {} 字符", text.chars().count());

        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(self.system_prompt.as_str())
                    .build()?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(text)
                    .build()?,
            ),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.2)
            .max_tokens(4096u32)
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            anyhow::anyhow!("LLM API 调用失败: {}", e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("LLM 返回内容为空"))?;

        // 列表缩进在行首，只去掉首尾空行
        Ok(content.trim_matches('\n').to_string())
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

fn system_prompt(source_lang: &str, target_lang: &str) -> String {
    format!(
        "You are a translator of technical documentation. Translate the user's Markdown \
         from '{source_lang}' to '{target_lang}'. Keep the Markdown structure, code spans, \
         links, HTML tags and blank lines exactly as they are. Reply with the translation only."
    )
}
