//! 单条导出处理器 - 编排层
//!
//! ## 职责
//!
//! 处理队列中的一条请求：导出 → 定位文件 → 归档。
//! 任何一步的失败都转换成 `Outcome::Failure`，不向上抛出。

use tracing::{error, info, warn};

use crate::error::AppError;
use crate::models::{FailureReason, Outcome, QueueItem};
use crate::services::{ArtifactFiler, ArtifactResolver, Session};
use crate::workflow::{ExportCtx, ExportWorkflow};

/// 单条导出处理器
pub struct ItemProcessor {
    workflow: ExportWorkflow,
    resolver: ArtifactResolver,
    filer: ArtifactFiler,
}

impl ItemProcessor {
    pub fn new(workflow: ExportWorkflow, resolver: ArtifactResolver, filer: ArtifactFiler) -> Self {
        Self {
            workflow,
            resolver,
            filer,
        }
    }

    /// 处理一条请求
    pub async fn process(&self, session: &Session, ctx: &ExportCtx, item: &QueueItem) -> Outcome {
        let before = match self.resolver.snapshot(session.download_dir()) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("{} ⚠️ 无法读取下载目录: {}", ctx, e);
                return Outcome::failure(FailureReason::ArtifactNotFound);
            }
        };
        if !before.is_empty() {
            warn!(
                "{} ⚠️ 下载目录中有 {} 个未归档的文件，本条不会使用",
                ctx,
                before.len()
            );
        }

        if let Err(e) = self
            .workflow
            .try_run(session.driver(), ctx, item.start_date(), item.end_date())
            .await
        {
            error!("{} 导出流程失败: {}", ctx, e);
            return Outcome::failure(workflow_failure(&e));
        }

        let artifact = match self.resolver.resolve_since(session.download_dir(), &before) {
            Ok(Some(path)) => path,
            Ok(None) => {
                warn!(
                    "{} ⚠️ 下载目录中没有新的 .{} 文件: {}",
                    ctx,
                    self.resolver.extension(),
                    session.download_dir().display()
                );
                return Outcome::failure(FailureReason::ArtifactNotFound);
            }
            Err(e) => {
                warn!("{} ⚠️ 无法读取下载目录: {}", ctx, e);
                return Outcome::failure(FailureReason::ArtifactNotFound);
            }
        };

        match self.filer.file(&artifact, item.title()) {
            Ok(artifact_path) => {
                info!("{} 📁 已归档: {}", ctx, artifact_path.display());
                Outcome::Success { artifact_path }
            }
            Err(e) => {
                error!(
                    "{} 归档失败，文件保留在: {} ({})",
                    ctx,
                    artifact.display(),
                    e
                );
                Outcome::failure(FailureReason::Filing(e.to_string()))
            }
        }
    }
}

fn workflow_failure(e: &AppError) -> FailureReason {
    match e.step_failure() {
        Some((step, cause)) => FailureReason::Workflow {
            step: step.to_string(),
            detail: cause.to_string(),
        },
        None => FailureReason::Workflow {
            step: String::new(),
            detail: e.to_string(),
        },
    }
}
