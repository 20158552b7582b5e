//! 测试用的假浏览器
//!
//! 页面是一组"当前存在的选择器"，点击可以触发跳转或下载。
//! 按 URL 片段可以隐藏元素、取消下载或直接 panic，用来模拟单个主题出问题。

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use senti_export::config::{Config, SiteConfig, Timings};
use senti_export::error::{AppError, AppResult, BrowserError};
use senti_export::infrastructure::{ClickMode, Locator, PageDriver};
use senti_export::selectors;
use senti_export::SessionLauncher;

pub const DOWNLOAD_NAME: &str = "export_2024.csv";

/// 与浏览器一致：重复下载时追加序号
pub fn download_name(n: usize) -> String {
    match n {
        0 => DOWNLOAD_NAME.to_string(),
        n => format!("export_2024 ({}).csv", n),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Goto(String),
    Click(String, ClickMode),
    Fill(String, String),
    Replace(String, String),
}

#[derive(Debug, Clone)]
enum Effect {
    SetUrl(String),
    Download,
}

/// 某个主题页的异常
#[derive(Debug, Clone, Default)]
pub struct Quirk {
    pub hidden: Vec<String>,
    pub no_download: bool,
    pub panic_on_open: bool,
}

#[derive(Default)]
struct State {
    url: String,
    present: HashSet<String>,
    on_click: HashMap<String, Effect>,
    quirks: Vec<(String, Quirk)>,
    actions: Vec<Action>,
    download_dir: Option<PathBuf>,
    launches: usize,
    closes: usize,
    downloads: usize,
}

impl State {
    fn active_quirk(&self) -> Option<&Quirk> {
        self.quirks
            .iter()
            .find(|(fragment, _)| self.url.contains(fragment.as_str()))
            .map(|(_, quirk)| quirk)
    }

    fn is_present(&self, selector: &str) -> bool {
        if !self.present.contains(selector) {
            return false;
        }
        match self.active_quirk() {
            Some(quirk) => !quirk.hidden.iter().any(|s| s == selector),
            None => true,
        }
    }
}

/// 共享的假站点
#[derive(Clone, Default)]
pub struct FakeSite {
    state: Arc<Mutex<State>>,
}

pub fn key(locator: Locator) -> String {
    locator.selector().to_string()
}

pub fn login_keys() -> Vec<String> {
    vec![
        key(Locator::css(selectors::ANY_INPUT)),
        key(Locator::css(selectors::EMAIL_INPUT)),
        key(Locator::css(selectors::LABELED_INPUT)),
        key(Locator::css(selectors::PASSWORD_INPUT)),
        key(Locator::css(selectors::LOGIN_SUBMIT)),
    ]
}

pub fn results_keys() -> Vec<String> {
    vec![
        key(Locator::class(selectors::DATEPICKER_WRAPPER)),
        key(Locator::xpath(selectors::CUSTOM_RANGE_ITEM)),
        key(Locator::name(selectors::RANGE_START_FIELD)),
        key(Locator::name(selectors::RANGE_END_FIELD)),
        key(Locator::css(selectors::APPLY_BUTTON)),
        key(Locator::xpath(selectors::EXPORT_BUTTON_TEXT)),
        key(Locator::css(selectors::EXPORT_BUTTON_CLASS)),
        key(Locator::xpath(selectors::CSV_OPTION_EXACT)),
        key(Locator::xpath(selectors::CSV_OPTION_LOOSE)),
    ]
}

impl FakeSite {
    /// 登录会成功、所有导出元素都在的站点
    pub fn working() -> Self {
        let site = Self::default();
        {
            let mut state = site.lock();
            state.present.extend(login_keys());
            state.present.extend(results_keys());
            state.on_click.insert(
                key(Locator::css(selectors::LOGIN_SUBMIT)),
                Effect::SetUrl(format!("https://sentione.com{}", SiteConfig::default().dashboard_marker)),
            );
            state
                .on_click
                .insert(key(Locator::xpath(selectors::CSV_OPTION_EXACT)), Effect::Download);
            state
                .on_click
                .insert(key(Locator::xpath(selectors::CSV_OPTION_LOOSE)), Effect::Download);
        }
        site
    }

    /// 提交登录后停留在登录页
    pub fn rejecting_login() -> Self {
        let site = Self::working();
        site.lock()
            .on_click
            .remove(&key(Locator::css(selectors::LOGIN_SUBMIT)));
        site
    }

    pub fn remove(&self, selector: &str) -> &Self {
        self.lock().present.remove(selector);
        self
    }

    pub fn add(&self, selector: &str) -> &Self {
        self.lock().present.insert(selector.to_string());
        self
    }

    /// URL 包含 `fragment` 时生效的异常
    pub fn quirk(&self, fragment: &str, quirk: Quirk) -> &Self {
        self.lock().quirks.push((fragment.to_string(), quirk));
        self
    }

    pub fn set_download_dir(&self, dir: &Path) {
        self.lock().download_dir = Some(dir.to_path_buf());
    }

    pub fn driver(&self) -> FakeDriver {
        FakeDriver { site: self.clone() }
    }

    pub fn actions(&self) -> Vec<Action> {
        self.lock().actions.clone()
    }

    pub fn launches(&self) -> usize {
        self.lock().launches
    }

    pub fn closes(&self) -> usize {
        self.lock().closes
    }

    pub fn downloads(&self) -> usize {
        self.lock().downloads
    }

    pub fn visited(&self) -> Vec<String> {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                Action::Goto(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // 测试里可能在持锁外 panic，毒化不影响后续断言
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

pub struct FakeDriver {
    site: FakeSite,
}

#[async_trait]
impl PageDriver for FakeDriver {
    async fn goto(&self, url: &str) -> AppResult<()> {
        let panic_here = {
            let mut state = self.site.lock();
            state.actions.push(Action::Goto(url.to_string()));
            state.url = url.to_string();
            state.active_quirk().is_some_and(|q| q.panic_on_open)
        };
        if panic_here {
            panic!("页面崩溃: {}", url);
        }
        Ok(())
    }

    async fn current_url(&self) -> AppResult<String> {
        Ok(self.site.lock().url.clone())
    }

    async fn content(&self) -> AppResult<String> {
        Ok("<html><body>fake</body></html>".to_string())
    }

    async fn is_present(&self, locator: &Locator) -> AppResult<bool> {
        Ok(self.site.lock().is_present(locator.selector()))
    }

    async fn click(&self, locator: &Locator, mode: ClickMode) -> AppResult<()> {
        let mut state = self.site.lock();
        let selector = locator.selector().to_string();
        state.actions.push(Action::Click(selector.clone(), mode));
        if !state.is_present(&selector) {
            return Err(AppError::element_not_found(locator.to_string()));
        }

        match state.on_click.get(&selector).cloned() {
            Some(Effect::SetUrl(url)) => state.url = url,
            Some(Effect::Download) => {
                let skip = state.active_quirk().is_some_and(|q| q.no_download);
                if let (false, Some(dir)) = (skip, state.download_dir.clone()) {
                    let target = dir.join(download_name(state.downloads));
                    fs::write(&target, "id;text\n1;hello\n")
                        .map_err(|e| AppError::file_write_failed(&target, e))?;
                    state.downloads += 1;
                }
            }
            None => {}
        }
        Ok(())
    }

    async fn fill(&self, locator: &Locator, text: &str) -> AppResult<()> {
        let mut state = self.site.lock();
        let selector = locator.selector().to_string();
        state.actions.push(Action::Fill(selector.clone(), text.to_string()));
        if state.is_present(&selector) {
            Ok(())
        } else {
            Err(AppError::element_not_found(locator.to_string()))
        }
    }

    async fn replace_text(&self, locator: &Locator, text: &str) -> AppResult<()> {
        let mut state = self.site.lock();
        let selector = locator.selector().to_string();
        state.actions.push(Action::Replace(selector.clone(), text.to_string()));
        if state.is_present(&selector) {
            Ok(())
        } else {
            Err(AppError::element_not_found(locator.to_string()))
        }
    }

    async fn close(&self) -> AppResult<()> {
        self.site.lock().closes += 1;
        Ok(())
    }
}

/// 假的会话启动
pub struct FakeLauncher {
    pub site: FakeSite,
    pub fail: bool,
}

impl FakeLauncher {
    pub fn new(site: &FakeSite) -> Self {
        Self {
            site: site.clone(),
            fail: false,
        }
    }

    pub fn failing(site: &FakeSite) -> Self {
        Self {
            site: site.clone(),
            fail: true,
        }
    }
}

#[async_trait]
impl SessionLauncher for FakeLauncher {
    async fn launch(&self, download_dir: &Path) -> AppResult<Box<dyn PageDriver>> {
        if self.fail {
            return Err(BrowserError::LaunchFailed {
                message: "no chrome".to_string(),
            }
            .into());
        }
        {
            let mut state = self.site.lock();
            state.launches += 1;
            state.download_dir = Some(download_dir.to_path_buf());
        }
        Ok(Box::new(self.site.driver()))
    }
}

/// 所有固定等待为零、等待上限很短
pub fn fast_timings() -> Timings {
    Timings {
        wait_timeout: Duration::from_millis(40),
        consent_timeout: Duration::ZERO,
        poll_interval: Duration::from_millis(5),
        consent_settle: Duration::ZERO,
        page_settle: Duration::ZERO,
        picker_settle: Duration::ZERO,
        apply_settle: Duration::ZERO,
        menu_settle: Duration::ZERO,
        download_settle: Duration::ZERO,
    }
}

pub fn test_config(download_dir: &Path) -> Config {
    Config {
        download_dir: download_dir.to_path_buf(),
        timings: fast_timings(),
        ..Config::default()
    }
}
