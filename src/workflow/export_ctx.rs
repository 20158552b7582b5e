//! 导出上下文
//!
//! 封装"我正在处理队列第几条、哪个主题"这一信息

use std::fmt::Display;

use crate::models::QueueItem;

/// 单条导出的上下文，仅用于日志
#[derive(Debug, Clone)]
pub struct ExportCtx {
    /// 条目在队列中的位置（从1开始）
    pub index: usize,

    /// 队列总数
    pub total: usize,

    pub topic_id: String,

    pub title: String,
}

impl ExportCtx {
    pub fn new(index: usize, total: usize, item: &QueueItem) -> Self {
        Self {
            index,
            total,
            topic_id: item.topic_id().to_string(),
            title: item.title().to_string(),
        }
    }
}

impl Display for ExportCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}/{} 主题 #{} {}]",
            self.index, self.total, self.topic_id, self.title
        )
    }
}
