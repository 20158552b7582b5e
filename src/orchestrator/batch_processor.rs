//! 批量导出编排 - 编排层
//!
//! ## 职责
//!
//! 1. **会话管理**：整次运行只打开、登录一个浏览器会话，结束时释放一次
//! 2. **顺序处理**：按队列原顺序逐条处理，不并发、不跳过、不重排
//! 3. **失败隔离**：单条失败记录后继续下一条
//! 4. **结果流**：每追加一条结果就通知调用方
//!
//! 登录失败时只记录一条运行级失败，不处理任何条目。

use std::fs;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};

use futures::FutureExt;
use tracing::{debug, error, info, warn};

use crate::browser::SessionLauncher;
use crate::config::{Config, Credentials};
use crate::error::{AppError, AppResult};
use crate::models::{BatchEntry, BatchResult, FailureReason, QueueItem};
use crate::orchestrator::item_processor::ItemProcessor;
use crate::services::{ArtifactFiler, ArtifactResolver, Session, SessionController};
use crate::utils::logging::{log_item_result, log_item_start};
use crate::workflow::{ExportCtx, ExportWorkflow};

/// 批量导出编排器
pub struct BatchOrchestrator<L> {
    controller: SessionController<L>,
    items: ItemProcessor,
    download_root: PathBuf,
}

impl<L: SessionLauncher> BatchOrchestrator<L> {
    pub fn new(launcher: L, config: &Config) -> Self {
        let controller =
            SessionController::new(launcher, config.site.clone(), config.timings.clone());
        let items = ItemProcessor::new(
            ExportWorkflow::new(config.site.clone(), config.timings.clone()),
            ArtifactResolver::default(),
            ArtifactFiler::new(&config.download_dir, config.client_separator),
        );

        Self {
            controller,
            items,
            download_root: config.download_dir.clone(),
        }
    }

    pub async fn run(&self, queue: &[QueueItem], credentials: &Credentials) -> AppResult<BatchResult> {
        self.run_with(queue, credentials, |_| {}).await
    }

    /// 执行整批导出，每追加一条结果调用一次 `on_entry`
    ///
    /// 只有暂存目录无法创建时返回错误；此时浏览器尚未启动。
    pub async fn run_with<F>(
        &self,
        queue: &[QueueItem],
        credentials: &Credentials,
        mut on_entry: F,
    ) -> AppResult<BatchResult>
    where
        F: FnMut(&BatchEntry),
    {
        let staging = StagingDir::create(&self.download_root)?;
        let mut result = BatchResult::default();

        let session = match self.controller.open(staging.path()).await {
            Ok(session) => session,
            Err(e) => {
                error!("❌ 浏览器会话无法建立: {}", e);
                on_entry(result.push(BatchEntry::run(FailureReason::SessionStart(e.to_string()))));
                staging.cleanup();
                return Ok(result);
            }
        };

        if !self.controller.login(&session, credentials).await {
            on_entry(result.push(BatchEntry::run(FailureReason::Login)));
            release(session).await;
            staging.cleanup();
            return Ok(result);
        }

        let processed = AssertUnwindSafe(self.process_queue(&session, queue, &mut result, &mut on_entry))
            .catch_unwind()
            .await;

        release(session).await;
        staging.cleanup();

        match processed {
            Ok(()) => Ok(result),
            Err(panic) => {
                error!("❌ 处理过程中发生意外错误，已释放浏览器");
                std::panic::resume_unwind(panic)
            }
        }
    }

    async fn process_queue<F>(
        &self,
        session: &Session,
        queue: &[QueueItem],
        result: &mut BatchResult,
        on_entry: &mut F,
    ) where
        F: FnMut(&BatchEntry),
    {
        let total = queue.len();
        for (i, item) in queue.iter().enumerate() {
            let ctx = ExportCtx::new(i + 1, total, item);
            log_item_start(&ctx);

            let outcome = self.items.process(session, &ctx, item).await;
            let entry = result.push(BatchEntry::item(ctx.index, item, outcome));
            log_item_result(entry);
            on_entry(entry);
        }
    }
}

async fn release(session: Session) {
    match session.release().await {
        Ok(()) => info!("浏览器已关闭"),
        Err(e) => warn!("⚠️ 关闭浏览器失败: {}", e),
    }
}

/// 本次运行专用的下载目录，避免误认旧文件
struct StagingDir {
    path: PathBuf,
}

impl StagingDir {
    fn create(root: &Path) -> AppResult<Self> {
        let name = format!(
            ".staging-{}-{}",
            chrono::Local::now().format("%Y%m%d%H%M%S"),
            std::process::id()
        );
        let path = root.join(name);
        fs::create_dir_all(&path).map_err(|e| AppError::create_dir_failed(&path, e))?;
        debug!("下载暂存目录: {}", path.display());
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }

    /// 只删除空目录，未归档的文件留给人工处理
    fn cleanup(&self) {
        if fs::remove_dir(&self.path).is_err() {
            warn!(
                "⚠️ 暂存目录中仍有未归档的文件: {}",
                self.path.display()
            );
        }
    }
}
