use std::path::Path;
use std::time::Duration;

use chromiumoxide::Browser;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::browser::{bind_download_dir, spawn_handler};
use crate::error::{AppError, AppResult, BrowserError};
use crate::infrastructure::ChromePage;

/// 连接到已运行的浏览器并新建页面
///
/// 浏览器需以 `--remote-debugging-port=<port>` 启动。
pub async fn connect_to_browser(
    port: u16,
    download_dir: &Path,
    navigation_timeout: Duration,
) -> AppResult<ChromePage> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        AppError::browser_connection_failed(port, e)
    })?;
    debug!("浏览器连接成功");

    // 在后台处理浏览器事件
    let handler_task = spawn_handler(handler);

    // 添加短暂延迟以等待浏览器状态同步
    sleep(Duration::from_millis(300)).await;

    bind_download_dir(&browser, download_dir).await?;

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建新页面失败: {}", e);
        BrowserError::PageCreationFailed {
            source: Box::new(e),
        }
    })?;

    info!("✓ 已在现有浏览器中打开新页面");
    Ok(ChromePage::attached(browser, page, handler_task, navigation_timeout))
}
