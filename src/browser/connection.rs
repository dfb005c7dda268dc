use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::{AppResult, BrowserError};

/// 连接到浏览器并创建新页面
///
/// 用于复用一个已经登录/预热过的浏览器（`--remote-debugging-port`）。
pub async fn connect_to_browser_and_page(port: u16, target_url: &str) -> AppResult<(Browser, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        BrowserError::ConnectionFailed {
            port,
            message: e.to_string(),
        }
    })?;
    debug!("浏览器连接成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    debug!("创建新页面并导航到: {}", target_url);
    let page = browser.new_page(target_url).await.map_err(|e| {
        error!("创建新页面失败: {}", e);
        BrowserError::PageCreationFailed(e.to_string())
    })?;
    info!("已导航到: {}", target_url);

    Ok((browser, page))
}
