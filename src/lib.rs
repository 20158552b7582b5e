//! # Senti Export
//!
//! 通过浏览器自动化，把分析平台中各主题在指定日期范围内的数据导出为 CSV，
//! 并按客户归档。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `browser/` - 启动或连接浏览器，绑定下载目录
//! - `infrastructure/` - `PageDriver` 是唯一的 page owner，提供导航、查找、点击、输入能力；
//!   `SelectorChain` 按顺序尝试备选选择器
//!
//! ### ② 业务能力层（Services）
//! - `SessionController` - 打开会话、登录
//! - `ArtifactResolver` - 定位最新下载的文件
//! - `ArtifactFiler` - 按客户归档
//! - `RunLog` - 写运行日志与汇总
//!
//! ### ③ 流程层（Workflow）
//! - `ExportWorkflow` - 一个主题的导出操作（主题页 → 日期 → 导出 → CSV）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 唯一持有会话，顺序处理队列，隔离单条失败
//! - `orchestrator/item_processor` - 单条：导出 → 定位 → 归档

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod selectors;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::{ChromeLauncher, SessionLauncher};
pub use config::{Config, Credentials, Timings};
pub use error::{AppError, AppResult};
pub use infrastructure::{ClickMode, Locator, PageDriver, SelectorChain};
pub use models::{BatchEntry, BatchResult, EntryScope, FailureReason, Outcome, QueueItem};
pub use orchestrator::{App, BatchOrchestrator};
pub use services::{ArtifactFiler, ArtifactResolver, Session, SessionController};
pub use workflow::{ExportCtx, ExportWorkflow};
