//! 元素定位
//!
//! `Locator` 描述一个元素，`SelectorChain` 按顺序尝试多个定位方式，
//! 第一个在等待时间内出现的即为结果。

use std::fmt;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::{AppError, AppResult, UiError};
use crate::infrastructure::page_driver::PageDriver;

/// 元素定位方式
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Css(String),
    XPath(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Locator::XPath(expression.into())
    }

    /// 按 name 属性定位
    pub fn name(name: &str) -> Self {
        Locator::Css(format!("[name='{}']", name))
    }

    /// 按单个 class 定位
    pub fn class(class_name: &str) -> Self {
        Locator::Css(format!(".{}", class_name))
    }

    /// 原始选择器文本
    pub fn selector(&self) -> &str {
        match self {
            Locator::Css(s) | Locator::XPath(s) => s,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css={}", s),
            Locator::XPath(s) => write!(f, "xpath={}", s),
        }
    }
}

/// 等待元素出现，超时返回 false
///
/// `timeout` 为零时只检查一次。
pub async fn wait_for(
    driver: &dyn PageDriver,
    locator: &Locator,
    timeout: Duration,
    poll_interval: Duration,
) -> AppResult<bool> {
    let deadline = Instant::now() + timeout;
    loop {
        if driver.is_present(locator).await? {
            return Ok(true);
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(false);
        }
        sleep(poll_interval.min(deadline - now)).await;
    }
}

/// 等待元素出现，超时报错
pub async fn wait_required(
    driver: &dyn PageDriver,
    locator: &Locator,
    timeout: Duration,
    poll_interval: Duration,
) -> AppResult<()> {
    if wait_for(driver, locator, timeout, poll_interval).await? {
        Ok(())
    } else {
        Err(AppError::timeout(locator.to_string(), timeout))
    }
}

/// 等待当前 URL 包含指定片段
pub async fn wait_for_url(
    driver: &dyn PageDriver,
    fragment: &str,
    timeout: Duration,
    poll_interval: Duration,
) -> AppResult<()> {
    let deadline = Instant::now() + timeout;
    loop {
        if driver.current_url().await?.contains(fragment) {
            return Ok(());
        }
        let now = Instant::now();
        if now >= deadline {
            return Err(AppError::timeout(format!("URL 包含 {}", fragment), timeout));
        }
        sleep(poll_interval.min(deadline - now)).await;
    }
}

/// 有序的备选定位链
///
/// 每一级都等待 `per_tier_wait`，全部落空才算失败。
#[derive(Debug, Clone)]
pub struct SelectorChain {
    target: &'static str,
    tiers: Vec<Locator>,
}

impl SelectorChain {
    pub fn new(target: &'static str) -> Self {
        Self {
            target,
            tiers: Vec::new(),
        }
    }

    pub fn then(mut self, locator: Locator) -> Self {
        self.tiers.push(locator);
        self
    }

    pub fn target(&self) -> &'static str {
        self.target
    }

    pub fn tiers(&self) -> &[Locator] {
        &self.tiers
    }

    /// 返回第一个出现的定位方式
    pub async fn resolve(
        &self,
        driver: &dyn PageDriver,
        per_tier_wait: Duration,
        poll_interval: Duration,
    ) -> AppResult<&Locator> {
        for (tier, locator) in self.tiers.iter().enumerate() {
            match wait_for(driver, locator, per_tier_wait, poll_interval).await {
                Ok(true) => {
                    debug!("{} 命中第 {} 级: {}", self.target, tier + 1, locator);
                    return Ok(locator);
                }
                Ok(false) => debug!("{} 第 {} 级未命中: {}", self.target, tier + 1, locator),
                Err(e) => debug!("{} 第 {} 级查询出错: {} ({})", self.target, tier + 1, locator, e),
            }
        }

        Err(UiError::SelectorsExhausted {
            target: self.target,
            tried: self.tiers.iter().map(ToString::to_string).collect(),
        }
        .into())
    }
}
