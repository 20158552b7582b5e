//! 导出文件定位 - 业务能力层
//!
//! 只看文件系统：下载目录中扩展名匹配、创建时间最新的文件即为本次导出。
//! 不等待、不校验内容，下载是否写完由导出流程的固定等待保证。
//!
//! 归档失败的文件会留在下载目录里，所以每条开始前先记下目录现状，
//! 之后只接受新出现或被重写过的文件。

use std::collections::HashMap;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::error::{AppError, AppResult};

/// 导出文件定位
#[derive(Debug, Clone)]
pub struct ArtifactResolver {
    extension: String,
}

/// 某一时刻下载目录中的匹配文件及其修改时间
#[derive(Debug, Clone, Default)]
pub struct DirSnapshot {
    files: HashMap<PathBuf, SystemTime>,
}

impl DirSnapshot {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// 快照时已存在且之后没有被重写
    fn is_stale(&self, path: &Path, modified: SystemTime) -> bool {
        self.files.get(path) == Some(&modified)
    }
}

impl ArtifactResolver {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into().trim_start_matches('.').to_string(),
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// 记下目录中现有的匹配文件
    pub fn snapshot(&self, download_dir: &Path) -> AppResult<DirSnapshot> {
        let files = self
            .candidates(download_dir)?
            .into_iter()
            .map(|(path, metadata)| (path, modified(&metadata)))
            .collect();
        Ok(DirSnapshot { files })
    }

    /// 最新的匹配文件，没有则返回 None
    pub fn resolve(&self, download_dir: &Path) -> AppResult<Option<PathBuf>> {
        self.resolve_since(download_dir, &DirSnapshot::default())
    }

    /// 同 `resolve`，但忽略 `before` 中未变化的文件
    pub fn resolve_since(
        &self,
        download_dir: &Path,
        before: &DirSnapshot,
    ) -> AppResult<Option<PathBuf>> {
        let mut latest: Option<(SystemTime, PathBuf)> = None;
        for (path, metadata) in self.candidates(download_dir)? {
            if before.is_stale(&path, modified(&metadata)) {
                debug!("跳过之前遗留的文件: {}", path.display());
                continue;
            }

            // 部分文件系统不记录创建时间
            let created = metadata.created().unwrap_or_else(|_| modified(&metadata));
            if latest.as_ref().map_or(true, |(t, _)| created >= *t) {
                latest = Some((created, path));
            }
        }

        if let Some((_, path)) = &latest {
            debug!("定位到导出文件: {}", path.display());
        }
        Ok(latest.map(|(_, path)| path))
    }

    fn candidates(&self, download_dir: &Path) -> AppResult<Vec<(PathBuf, Metadata)>> {
        let entries =
            fs::read_dir(download_dir).map_err(|e| AppError::file_read_failed(download_dir, e))?;

        let mut found = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| AppError::file_read_failed(download_dir, e))?;
            let path = entry.path();
            if !self.matches(&path) {
                continue;
            }
            if let Ok(metadata) = entry.metadata() {
                if metadata.is_file() {
                    found.push((path, metadata));
                }
            }
        }
        Ok(found)
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }
}

fn modified(metadata: &Metadata) -> SystemTime {
    metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH)
}

impl Default for ArtifactResolver {
    fn default() -> Self {
        Self::new("csv")
    }
}
