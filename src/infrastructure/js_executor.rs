//! 页面执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"导航 / 点击 / 执行 JS"的能力

use anyhow::{Context, Result};
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::debug;

/// 页面执行器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 不认识批次 / 节点
/// - 不处理业务流程
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建新的执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 导航到指定地址并等待加载完成
    pub async fn goto(&self, url: &str) -> Result<()> {
        debug!("导航到: {}", url);
        self.page
            .goto(url)
            .await
            .with_context(|| format!("导航到 {} 失败", url))?;
        Ok(())
    }

    /// 点击匹配选择器的第一个元素
    pub async fn click(&self, selector: &str) -> Result<()> {
        debug!("点击元素: {}", selector);
        self.page
            .find_element(selector)
            .await
            .with_context(|| format!("未找到元素: {}", selector))?
            .click()
            .await
            .with_context(|| format!("点击元素失败: {}", selector))?;
        Ok(())
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }
}
