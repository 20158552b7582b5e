use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::error::{AppResult, ConfigError};

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 待处理队列文件（TOML）
    pub queue_file: String,
    /// 下载根目录，归档后的客户目录也建在这里
    pub download_dir: PathBuf,
    /// 运行日志文件
    pub run_log_file: String,
    /// 运行结果汇总（JSON）
    pub summary_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 标题中客户前缀的分隔符
    pub client_separator: char,
    pub site: SiteConfig,
    pub browser: BrowserSettings,
    pub timings: Timings,
}

/// 目标站点地址
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// 登录入口
    pub entry_url: String,
    /// 登录成功后 URL 中应出现的片段
    pub dashboard_marker: String,
    /// 主题结果页前缀，后接 topic_id
    pub results_url_prefix: String,
}

impl SiteConfig {
    /// 主题结果页地址
    pub fn results_url(&self, topic_id: &str) -> String {
        format!("{}{}", self.results_url_prefix, topic_id)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            entry_url: "https://sentione.com/app".to_string(),
            dashboard_marker: "/app#/topics".to_string(),
            results_url_prefix: "https://sentione.com/app#/results?topicId=".to_string(),
        }
    }
}

/// 浏览器配置
#[derive(Clone, Debug)]
pub struct BrowserSettings {
    /// 设置后连接已运行的浏览器，否则启动新的无头浏览器
    pub debug_port: Option<u16>,
    /// 浏览器可执行文件，未设置时自动查找
    pub executable: Option<PathBuf>,
    pub headless: bool,
    pub user_agent: String,
    pub window_size: (u32, u32),
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            debug_port: None,
            executable: None,
            headless: true,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36".to_string(),
            window_size: (1920, 1080),
        }
    }
}

/// 等待与固定延迟
///
/// 除 `wait_timeout` / `consent_timeout` 外都是固定等待：页面没有暴露可轮询的完成信号，
/// 这些值偏小会导致条目失败，是整个流程里最不可靠的部分。
#[derive(Clone, Debug)]
pub struct Timings {
    /// 每次等待元素/URL 的上限
    pub wait_timeout: Duration,
    /// 等待 cookie 弹窗的上限
    pub consent_timeout: Duration,
    /// 轮询间隔
    pub poll_interval: Duration,
    pub consent_settle: Duration,
    /// 打开主题页后等待前端渲染
    pub page_settle: Duration,
    /// 打开日期选择器后
    pub picker_settle: Duration,
    /// 应用日期范围后
    pub apply_settle: Duration,
    /// 点击导出后等待菜单
    pub menu_settle: Duration,
    /// 选择 CSV 后等待浏览器写完文件
    pub download_settle: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            wait_timeout: Duration::from_secs(20),
            consent_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(250),
            consent_settle: Duration::from_millis(1000),
            page_settle: Duration::from_millis(5000),
            picker_settle: Duration::from_millis(1000),
            apply_settle: Duration::from_millis(3000),
            menu_settle: Duration::from_millis(1000),
            download_settle: Duration::from_millis(10_000),
        }
    }
}

impl Timings {
    fn from_env() -> Self {
        let default = Self::default();
        Self {
            wait_timeout: env_secs("WAIT_TIMEOUT_SECS").unwrap_or(default.wait_timeout),
            consent_timeout: env_secs("CONSENT_TIMEOUT_SECS").unwrap_or(default.consent_timeout),
            poll_interval: env_millis("POLL_INTERVAL_MS").unwrap_or(default.poll_interval),
            consent_settle: env_millis("CONSENT_SETTLE_MS").unwrap_or(default.consent_settle),
            page_settle: env_millis("PAGE_SETTLE_MS").unwrap_or(default.page_settle),
            picker_settle: env_millis("PICKER_SETTLE_MS").unwrap_or(default.picker_settle),
            apply_settle: env_millis("APPLY_SETTLE_MS").unwrap_or(default.apply_settle),
            menu_settle: env_millis("MENU_SETTLE_MS").unwrap_or(default.menu_settle),
            download_settle: env_millis("DOWNLOAD_SETTLE_MS").unwrap_or(default.download_settle),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            queue_file: "queue.toml".to_string(),
            download_dir: PathBuf::from("downloads"),
            run_log_file: "export_log.txt".to_string(),
            summary_file: "export_summary.json".to_string(),
            verbose_logging: false,
            client_separator: '_',
            site: SiteConfig::default(),
            browser: BrowserSettings::default(),
            timings: Timings::default(),
        }
    }
}

impl Config {
    /// 只读取 VERBOSE_LOGGING，用于在日志初始化前决定级别
    pub fn verbose_from_env() -> bool {
        std::env::var("VERBOSE_LOGGING")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(false)
    }

    pub fn from_env() -> Self {
        let default = Self::default();
        let site = SiteConfig {
            entry_url: std::env::var("APP_ENTRY_URL").unwrap_or(default.site.entry_url),
            dashboard_marker: std::env::var("APP_DASHBOARD_MARKER").unwrap_or(default.site.dashboard_marker),
            results_url_prefix: std::env::var("APP_RESULTS_URL").unwrap_or(default.site.results_url_prefix),
        };
        let browser = BrowserSettings {
            debug_port: env_parse("BROWSER_DEBUG_PORT"),
            executable: std::env::var("CHROME_EXECUTABLE").ok().map(PathBuf::from),
            headless: env_parse("HEADLESS").unwrap_or(default.browser.headless),
            user_agent: std::env::var("USER_AGENT").unwrap_or(default.browser.user_agent),
            window_size: default.browser.window_size,
        };
        Self {
            queue_file: std::env::var("QUEUE_FILE").unwrap_or(default.queue_file),
            download_dir: std::env::var("DOWNLOAD_DIR").map(PathBuf::from).unwrap_or(default.download_dir),
            run_log_file: std::env::var("RUN_LOG_FILE").unwrap_or(default.run_log_file),
            summary_file: std::env::var("SUMMARY_FILE").unwrap_or(default.summary_file),
            verbose_logging: Self::verbose_from_env(),
            client_separator: env_parse("CLIENT_SEPARATOR").unwrap_or(default.client_separator),
            site,
            browser,
            timings: Timings::from_env(),
        }
    }
}

/// 登录凭据
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// 从 SENTI_EMAIL / SENTI_PASSWORD 读取
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            email: required_env("SENTI_EMAIL")?,
            password: required_env("SENTI_PASSWORD")?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

fn required_env(var_name: &str) -> AppResult<String> {
    match std::env::var(var_name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::EnvVarNotFound {
            var_name: var_name.to_string(),
        }
        .into()),
    }
}

/// 读取并解析环境变量；未设置返回 None，无法解析时告警并返回 None
fn env_parse<T: FromStr>(var_name: &str) -> Option<T> {
    let value = std::env::var(var_name).ok()?;
    match parse_env_value(var_name, &value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!("⚠️ {}，使用默认值", e);
            None
        }
    }
}

fn parse_env_value<T: FromStr>(var_name: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: std::any::type_name::<T>().to_string(),
        })
}

fn env_secs(var_name: &str) -> Option<Duration> {
    env_parse(var_name).map(Duration::from_secs)
}

fn env_millis(var_name: &str) -> Option<Duration> {
    env_parse(var_name).map(Duration::from_millis)
}
