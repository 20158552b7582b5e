//! 应用入口
//!
//! 管理一次完整运行：初始化运行日志、加载队列、启动编排器、输出统计和汇总。

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::browser::ChromeLauncher;
use crate::config::{Config, Credentials};
use crate::models::{load_queue_file, BatchResult, QueueItem};
use crate::orchestrator::batch_processor::BatchOrchestrator;
use crate::services::{write_summary, RunLog};
use crate::utils::logging::{log_queue_loaded, log_startup, print_final_stats};

/// 应用主结构
pub struct App {
    config: Config,
    credentials: Credentials,
    queue: Vec<QueueItem>,
    run_log: RunLog,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        let run_log = RunLog::with_path(&config.run_log_file);
        run_log.init().context("无法创建运行日志")?;

        log_startup(&config);

        let credentials = Credentials::from_env().context("缺少登录凭据")?;

        info!("\n📁 正在加载导出队列...");
        let queue = load_queue_file(Path::new(&config.queue_file))
            .await
            .with_context(|| format!("无法加载队列: {}", config.queue_file))?;

        Ok(Self {
            config,
            credentials,
            queue,
            run_log,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<BatchResult> {
        if self.queue.is_empty() {
            warn!("⚠️ 队列为空，程序结束");
            return Ok(BatchResult::default());
        }

        log_queue_loaded(self.queue.len());

        fs::create_dir_all(&self.config.download_dir).with_context(|| {
            format!("无法创建下载目录: {}", self.config.download_dir.display())
        })?;

        let launcher = ChromeLauncher::new(
            self.config.browser.clone(),
            self.config.timings.wait_timeout,
        );
        let orchestrator = BatchOrchestrator::new(launcher, &self.config);

        let result = orchestrator
            .run_with(&self.queue, &self.credentials, |entry| {
                if let Err(e) = self.run_log.append(entry) {
                    warn!("⚠️ 写入运行日志失败: {}", e);
                }
            })
            .await?;

        print_final_stats(
            result.success_count(),
            result.failure_count(),
            self.queue.len(),
            self.run_log.path(),
        );

        let summary_path = Path::new(&self.config.summary_file);
        write_summary(summary_path, &result)
            .with_context(|| format!("无法写入汇总: {}", summary_path.display()))?;
        info!("汇总已保存至: {}", summary_path.display());

        Ok(result)
    }
}
