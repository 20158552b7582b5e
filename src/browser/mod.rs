//! 浏览器会话的获取
//!
//! 两种方式：启动新的无头浏览器，或连接到已开启调试端口的浏览器。
//! 两者都把下载目录绑定到本次运行的暂存目录。

pub mod connection;
pub mod headless;

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::browser::{
    SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
use chromiumoxide::{Browser, Handler};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::BrowserSettings;
use crate::error::{AppError, AppResult, BrowserError};
use crate::infrastructure::PageDriver;

pub use connection::connect_to_browser;
pub use headless::launch_headless_browser;

/// 获取一个可操作的页面
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    async fn launch(&self, download_dir: &Path) -> AppResult<Box<dyn PageDriver>>;
}

/// 基于 chromiumoxide 的会话获取
#[derive(Clone, Debug)]
pub struct ChromeLauncher {
    settings: BrowserSettings,
    navigation_timeout: Duration,
}

impl ChromeLauncher {
    pub fn new(settings: BrowserSettings, navigation_timeout: Duration) -> Self {
        Self {
            settings,
            navigation_timeout,
        }
    }
}

#[async_trait]
impl SessionLauncher for ChromeLauncher {
    async fn launch(&self, download_dir: &Path) -> AppResult<Box<dyn PageDriver>> {
        let page = match self.settings.debug_port {
            Some(port) => connect_to_browser(port, download_dir, self.navigation_timeout).await?,
            None => {
                launch_headless_browser(&self.settings, download_dir, self.navigation_timeout)
                    .await?
            }
        };
        Ok(Box::new(page))
    }
}

/// 在后台处理浏览器事件
pub(crate) fn spawn_handler(mut handler: Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    })
}

/// 允许下载并指定下载目录（必须是绝对路径）
pub(crate) async fn bind_download_dir(browser: &Browser, download_dir: &Path) -> AppResult<()> {
    let absolute = download_dir
        .canonicalize()
        .map_err(|e| AppError::file_read_failed(download_dir, e))?;

    let params = SetDownloadBehaviorParams::builder()
        .behavior(SetDownloadBehaviorBehavior::Allow)
        .download_path(absolute.to_string_lossy().to_string())
        .build()
        .map_err(|e| BrowserError::ConfigurationFailed { message: e })?;

    browser.execute(params).await?;
    debug!("下载目录已绑定: {}", absolute.display());
    Ok(())
}
