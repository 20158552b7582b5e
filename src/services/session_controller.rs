//! 会话控制 - 业务能力层
//!
//! 只负责"打开浏览器"和"登录"两件事；登录只尝试一次，不重试。

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::browser::SessionLauncher;
use crate::config::{Credentials, SiteConfig, Timings};
use crate::error::AppResult;
use crate::infrastructure::{
    wait_for, wait_for_url, wait_required, ClickMode, Locator, PageDriver,
};
use crate::selectors;
use crate::utils::logging::truncate_text;

/// 登录失败时输出的页面内容长度
const DIAGNOSTIC_CONTENT_CHARS: usize = 500;

/// 一次运行中唯一的浏览器会话
///
/// `release` 消耗自身，保证同一会话不会被释放两次。
pub struct Session {
    driver: Box<dyn PageDriver>,
    download_dir: PathBuf,
}

impl Session {
    pub fn driver(&self) -> &dyn PageDriver {
        self.driver.as_ref()
    }

    /// 浏览器下载目录
    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    pub async fn release(self) -> AppResult<()> {
        debug!("释放浏览器会话");
        self.driver.close().await
    }
}

/// 会话控制器
pub struct SessionController<L> {
    launcher: L,
    site: SiteConfig,
    timings: Timings,
}

impl<L: SessionLauncher> SessionController<L> {
    pub fn new(launcher: L, site: SiteConfig, timings: Timings) -> Self {
        Self {
            launcher,
            site,
            timings,
        }
    }

    /// 打开浏览器，下载目录固定为 `download_dir`
    pub async fn open(&self, download_dir: &Path) -> AppResult<Session> {
        let driver = self.launcher.launch(download_dir).await?;
        Ok(Session {
            driver,
            download_dir: download_dir.to_path_buf(),
        })
    }

    /// 登录，成功返回 true
    ///
    /// 任何一步出错或超时都返回 false，并输出当前 URL 和页面片段供排查。
    pub async fn login(&self, session: &Session, credentials: &Credentials) -> bool {
        let driver = session.driver();
        match self.submit_login(driver, credentials).await {
            Ok(()) => {
                info!("✓ 登录成功");
                true
            }
            Err(e) => {
                error!("❌ 登录失败: {}", e);
                self.log_diagnostics(driver).await;
                false
            }
        }
    }

    async fn submit_login(&self, driver: &dyn PageDriver, credentials: &Credentials) -> AppResult<()> {
        let poll = self.timings.poll_interval;

        info!("正在打开登录页: {}", self.site.entry_url);
        driver.goto(&self.site.entry_url).await?;

        self.dismiss_consent(driver).await;

        debug!("等待登录表单...");
        wait_required(driver, &Locator::css(selectors::ANY_INPUT), self.timings.wait_timeout, poll)
            .await?;

        // 表单已渲染，备选选择器不再额外等待
        let email_chain = selectors::email_field();
        let email_field = email_chain.resolve(driver, Duration::ZERO, poll).await?;
        driver.fill(email_field, &credentials.email).await?;

        driver
            .fill(&Locator::css(selectors::PASSWORD_INPUT), &credentials.password)
            .await?;

        driver
            .click(&Locator::css(selectors::LOGIN_SUBMIT), ClickMode::Script)
            .await?;

        info!("已提交登录，等待进入主题列表...");
        wait_for_url(driver, &self.site.dashboard_marker, self.timings.wait_timeout, poll).await
    }

    /// 关闭 cookie 提示，没有就跳过
    async fn dismiss_consent(&self, driver: &dyn PageDriver) {
        let consent = Locator::xpath(selectors::CONSENT_OK);
        let present = wait_for(
            driver,
            &consent,
            self.timings.consent_timeout,
            self.timings.poll_interval,
        )
        .await
        .unwrap_or(false);

        if !present {
            debug!("没有 cookie 提示");
            return;
        }

        match driver.click(&consent, ClickMode::Native).await {
            Ok(()) => {
                info!("✓ 已接受 cookie");
                sleep(self.timings.consent_settle).await;
            }
            Err(e) => warn!("⚠️ cookie 提示无法关闭，继续登录: {}", e),
        }
    }

    async fn log_diagnostics(&self, driver: &dyn PageDriver) {
        match driver.current_url().await {
            Ok(url) => error!("当前 URL: {}", url),
            Err(e) => error!("无法获取当前 URL: {}", e),
        }
        match driver.content().await {
            Ok(content) => error!(
                "页面内容预览: {}",
                truncate_text(&content, DIAGNOSTIC_CONTENT_CHARS)
            ),
            Err(e) => error!("无法获取页面内容: {}", e),
        }
    }
}
