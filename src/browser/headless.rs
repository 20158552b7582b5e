use std::path::Path;
use std::time::Duration;

use chromiumoxide::{Browser, BrowserConfig};
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::browser::{bind_download_dir, spawn_handler};
use crate::config::BrowserSettings;
use crate::error::{AppResult, BrowserError};
use crate::infrastructure::ChromePage;

/// 启动无头浏览器，下载目录绑定到 `download_dir`
pub async fn launch_headless_browser(
    settings: &BrowserSettings,
    download_dir: &Path,
    navigation_timeout: Duration,
) -> AppResult<ChromePage> {
    info!("🚀 启动浏览器 (无头: {})...", settings.headless);

    let (width, height) = settings.window_size;
    let mut builder = BrowserConfig::builder()
        .window_size(width, height)
        .args(vec![
            "--no-sandbox".to_string(),            // 禁用沙盒，容器内无权限时会崩溃
            "--disable-dev-shm-usage".to_string(), // 防止共享内存不足
            "--disable-gpu".to_string(),
            format!("--user-agent={}", settings.user_agent),
        ]);

    builder = if settings.headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };

    if let Some(executable) = &settings.executable {
        debug!("浏览器路径: {}", executable.display());
        builder = builder.chrome_executable(executable);
    }

    let config = builder.build().map_err(|e| {
        error!("配置浏览器失败: {}", e);
        BrowserError::ConfigurationFailed { message: e }
    })?;

    let (browser, handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        BrowserError::LaunchFailed {
            message: e.to_string(),
        }
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    let handler_task = spawn_handler(handler);

    // 添加短暂延迟以等待浏览器状态同步
    sleep(Duration::from_millis(300)).await;

    bind_download_dir(&browser, download_dir).await?;

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建页面失败: {}", e);
        BrowserError::PageCreationFailed {
            source: Box::new(e),
        }
    })?;

    info!("✅ 浏览器已就绪，下载目录: {}", download_dir.display());
    Ok(ChromePage::launched(browser, page, handler_task, navigation_timeout))
}
