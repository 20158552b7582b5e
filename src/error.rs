use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 页面交互错误
    #[error("页面交互错误: {0}")]
    Ui(#[from] UiError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 启动浏览器失败
    #[error("启动浏览器失败: {message}")]
    LaunchFailed { message: String },
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 创建页面失败
    #[error("创建页面失败: {source}")]
    PageCreationFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 导航失败
    #[error("导航到 {url} 失败: {message}")]
    NavigationFailed { url: String, message: String },
    /// 浏览器配置失败
    #[error("浏览器配置失败: {message}")]
    ConfigurationFailed { message: String },
    /// CDP 命令执行失败
    #[error("CDP 命令执行失败: {source}")]
    CommandFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 页面交互错误
#[derive(Debug, Error)]
pub enum UiError {
    /// 元素不存在
    #[error("找不到元素: {selector}")]
    ElementNotFound { selector: String },
    /// 所有备选选择器均失败
    #[error("无法定位 {target}，已尝试: {}", .tried.join(" | "))]
    SelectorsExhausted {
        target: &'static str,
        tried: Vec<String>,
    },
    /// 等待条件超时
    #[error("等待 {what} 超时 ({waited:?})")]
    Timeout { what: String, waited: Duration },
    /// 导出流程中的某一步失败
    #[error("步骤 [{step}] 失败: {source}")]
    StepFailed {
        step: &'static str,
        source: Box<AppError>,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({}): {source}", .path.display())]
    ReadFailed { path: PathBuf, source: std::io::Error },
    /// 写入文件失败
    #[error("写入文件失败 ({}): {source}", .path.display())]
    WriteFailed { path: PathBuf, source: std::io::Error },
    /// 创建目录失败
    #[error("创建目录失败 ({}): {source}", .path.display())]
    CreateDirFailed { path: PathBuf, source: std::io::Error },
    /// 移动文件失败
    #[error("移动文件失败 ({} -> {}): {source}", .from.display(), .to.display())]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({}): {source}", .path.display())]
    TomlParseFailed {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// JSON 序列化失败
    #[error("JSON序列化失败: {0}")]
    JsonFailed(#[from] serde_json::Error),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 环境变量不存在
    #[error("环境变量 {var_name} 不存在")]
    EnvVarNotFound { var_name: String },
    /// 必填字段为空
    #[error("字段 {field} 不能为空")]
    EmptyField { field: &'static str },
    /// 队列条目不合法
    #[error("队列第 {index} 项不合法: {reason}")]
    InvalidQueueItem { index: usize, reason: String },
    /// 日期格式错误
    #[error("无法解析日期 '{value}'，应为 DD.MM.YYYY")]
    InvalidDate { value: String },
    /// 日期超出范围
    #[error("日期 {date} 加一天后超出范围")]
    DateOutOfRange { date: String },
}

// ========== 从常见错误类型转换 ==========

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(BrowserError::CommandFailed {
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建浏览器连接错误
    pub fn browser_connection_failed(
        port: u16,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Browser(BrowserError::ConnectionFailed {
            port,
            source: Box::new(source),
        })
    }

    /// 创建元素不存在错误
    pub fn element_not_found(selector: impl Into<String>) -> Self {
        AppError::Ui(UiError::ElementNotFound {
            selector: selector.into(),
        })
    }

    /// 创建超时错误
    pub fn timeout(what: impl Into<String>, waited: Duration) -> Self {
        AppError::Ui(UiError::Timeout {
            what: what.into(),
            waited,
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }

    /// 创建目录创建错误
    pub fn create_dir_failed(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        AppError::File(FileError::CreateDirFailed {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }

    /// 把错误归属到导出流程的某一步
    pub fn at_step(self, step: &'static str) -> Self {
        AppError::Ui(UiError::StepFailed {
            step,
            source: Box::new(self),
        })
    }

    /// 出错的导出步骤及其原因
    pub fn step_failure(&self) -> Option<(&'static str, &AppError)> {
        match self {
            AppError::Ui(UiError::StepFailed { step, source }) => Some((*step, source.as_ref())),
            _ => None,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
