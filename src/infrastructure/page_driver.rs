//! 页面驱动 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"导航 / 查找 / 点击 / 输入"能力

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::element::Element;
use chromiumoxide::{Browser, Page};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult, BrowserError};
use crate::infrastructure::locator::Locator;

/// 点击方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickMode {
    /// 模拟鼠标点击
    Native,
    /// 通过脚本调用 element.click()，不受遮罩层影响
    Script,
}

/// 页面操作能力
///
/// 不认识主题、队列和文件，只做单步操作。
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// 打开地址
    async fn goto(&self, url: &str) -> AppResult<()>;

    /// 当前地址
    async fn current_url(&self) -> AppResult<String>;

    /// 当前页面 HTML
    async fn content(&self) -> AppResult<String>;

    /// 元素当前是否存在，不等待
    async fn is_present(&self, locator: &Locator) -> AppResult<bool>;

    async fn click(&self, locator: &Locator, mode: ClickMode) -> AppResult<()>;

    /// 清空后输入
    async fn fill(&self, locator: &Locator, text: &str) -> AppResult<()>;

    /// 全选、删除后输入，用于带格式校验的输入框
    async fn replace_text(&self, locator: &Locator, text: &str) -> AppResult<()>;

    /// 释放页面（以及自己启动的浏览器）
    async fn close(&self) -> AppResult<()>;
}

/// chromiumoxide 实现
pub struct ChromePage {
    page: Page,
    browser: Mutex<Option<Browser>>,
    handler_task: Mutex<Option<JoinHandle<()>>>,
    owns_browser: bool,
    navigation_timeout: Duration,
}

impl ChromePage {
    /// 自己启动的浏览器，关闭时一并退出
    pub fn launched(
        browser: Browser,
        page: Page,
        handler_task: JoinHandle<()>,
        navigation_timeout: Duration,
    ) -> Self {
        Self::new(browser, page, handler_task, navigation_timeout, true)
    }

    /// 连接到已运行的浏览器，关闭时只关页面
    pub fn attached(
        browser: Browser,
        page: Page,
        handler_task: JoinHandle<()>,
        navigation_timeout: Duration,
    ) -> Self {
        Self::new(browser, page, handler_task, navigation_timeout, false)
    }

    fn new(
        browser: Browser,
        page: Page,
        handler_task: JoinHandle<()>,
        navigation_timeout: Duration,
        owns_browser: bool,
    ) -> Self {
        Self {
            page,
            browser: Mutex::new(Some(browser)),
            handler_task: Mutex::new(Some(handler_task)),
            owns_browser,
            navigation_timeout,
        }
    }

    /// 获取 page 的引用（用于其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    async fn find(&self, locator: &Locator) -> AppResult<Element> {
        let found = match locator {
            Locator::Css(selector) => self.page.find_element(selector.as_str()).await,
            Locator::XPath(expression) => self.page.find_xpath(expression.as_str()).await,
        };
        found.map_err(|e| {
            debug!("查找 {} 失败: {}", locator, e);
            AppError::element_not_found(locator.to_string())
        })
    }

    async fn call(&self, element: &Element, function: &str) -> AppResult<()> {
        element.call_js_fn(function, false).await?;
        Ok(())
    }
}

#[async_trait]
impl PageDriver for ChromePage {
    async fn goto(&self, url: &str) -> AppResult<()> {
        match tokio::time::timeout(self.navigation_timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::NavigationFailed {
                url: url.to_string(),
                message: e.to_string(),
            }
            .into()),
            Err(_) => {
                // 同文档的 hash 跳转不一定触发加载事件
                if self.current_url().await? == url {
                    debug!("导航未收到加载事件，但地址已切换: {}", url);
                    Ok(())
                } else {
                    Err(BrowserError::NavigationFailed {
                        url: url.to_string(),
                        message: format!("超过 {:?} 未完成", self.navigation_timeout),
                    }
                    .into())
                }
            }
        }
    }

    async fn current_url(&self) -> AppResult<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    async fn content(&self) -> AppResult<String> {
        Ok(self.page.content().await?)
    }

    async fn is_present(&self, locator: &Locator) -> AppResult<bool> {
        Ok(self.find(locator).await.is_ok())
    }

    async fn click(&self, locator: &Locator, mode: ClickMode) -> AppResult<()> {
        let element = self.find(locator).await?;
        match mode {
            ClickMode::Native => {
                element.click().await?;
            }
            ClickMode::Script => self.call(&element, "function() { this.click(); }").await?,
        }
        Ok(())
    }

    async fn fill(&self, locator: &Locator, text: &str) -> AppResult<()> {
        let element = self.find(locator).await?;
        element.focus().await?;
        self.call(
            &element,
            "function() { this.value = ''; this.dispatchEvent(new Event('input', { bubbles: true })); }",
        )
        .await?;
        element.type_str(text).await?;
        Ok(())
    }

    async fn replace_text(&self, locator: &Locator, text: &str) -> AppResult<()> {
        let element = self.find(locator).await?;
        element.click().await?;
        self.call(&element, "function() { this.select(); }").await?;
        element.press_key("Delete").await?;
        element.type_str(text).await?;
        Ok(())
    }

    async fn close(&self) -> AppResult<()> {
        let result = if self.owns_browser {
            match self.browser.lock().await.take() {
                Some(mut browser) => close_browser(&mut browser).await,
                None => Ok(()),
            }
        } else {
            let closed = self.page.clone().close().await.map_err(AppError::from);
            self.browser.lock().await.take();
            closed
        };

        if let Some(task) = self.handler_task.lock().await.take() {
            task.abort();
        }

        if let Err(e) = &result {
            warn!("关闭浏览器时出错: {}", e);
        }
        result
    }
}

async fn close_browser(browser: &mut Browser) -> AppResult<()> {
    browser.close().await?;
    browser.wait().await.map_err(|e| BrowserError::CommandFailed {
        source: Box::new(e),
    })?;
    Ok(())
}
