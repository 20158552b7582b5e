//! 日志工具模块
//!
//! 提供日志格式化和输出的辅助函数

use std::path::Path;

use tracing::{error, info};

use crate::config::Config;
use crate::models::BatchEntry;
use crate::workflow::ExportCtx;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 主题批量导出");
    info!("📂 下载目录: {}", config.download_dir.display());
    match config.browser.debug_port {
        Some(port) => info!("🌐 浏览器: 连接调试端口 {}", port),
        None => info!("🌐 浏览器: 启动新实例"),
    }
    info!("{}", "=".repeat(60));
}

/// 记录队列加载信息
pub fn log_queue_loaded(total: usize) {
    info!("✓ 找到 {} 个导出请求", total);
    info!("📋 将按顺序逐个处理\n");
}

/// 记录单条开始
pub fn log_item_start(ctx: &ExportCtx) {
    info!("\n{}", "─".repeat(60));
    info!("📦 处理第 {}/{} 项: {}", ctx.index, ctx.total, ctx.title);
}

/// 记录单条结果
pub fn log_item_result(entry: &BatchEntry) {
    if entry.outcome.is_success() {
        info!("{}", entry);
    } else {
        error!("{}", entry);
    }
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功数量
/// - `failed`: 失败数量
/// - `total`: 队列总数
/// - `log_file_path`: 运行日志路径
pub fn print_final_stats(success: usize, failed: usize, total: usize, log_file_path: &Path) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path.display());
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(truncate_text("abc", 5), "abc");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        assert_eq!(truncate_text("登录页面内容", 2), "登录...");
    }
}
