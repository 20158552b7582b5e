//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 初始化运行日志、加载凭据和队列
//! - 输出统计与 JSON 汇总
//!
//! ### `batch_processor` - 批量导出编排
//! - 持有唯一的浏览器会话（打开、登录、释放）
//! - 顺序遍历队列，隔离单条失败
//!
//! ### `item_processor` - 单条导出处理
//! - 导出 → 定位文件 → 归档，失败转成结果值
//!
//! ## 层次关系
//!
//! ```text
//! app
//!     ↓
//! batch_processor (处理 Vec<QueueItem>)
//!     ↓
//! item_processor (处理单个 QueueItem)
//!     ↓
//! workflow::ExportWorkflow / services (会话、定位、归档)
//!     ↓
//! infrastructure (PageDriver)
//! ```

pub mod app;
pub mod batch_processor;
pub mod item_processor;

pub use app::App;
pub use batch_processor::BatchOrchestrator;
pub use item_processor::ItemProcessor;
