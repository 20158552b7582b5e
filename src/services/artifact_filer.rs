//! 导出文件归档 - 业务能力层
//!
//! 把下载的文件移动到 `<root>/<客户>/<标题>.<扩展名>`，已存在则加时间戳，
//! 从不覆盖或截断已有文件。

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{AppError, AppResult, FileError};

/// 文件名中不允许出现的字符
const PATH_HOSTILE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// 导出文件归档
#[derive(Debug, Clone)]
pub struct ArtifactFiler {
    root: PathBuf,
    separator: char,
}

impl ArtifactFiler {
    pub fn new(root: impl Into<PathBuf>, separator: char) -> Self {
        Self {
            root: root.into(),
            separator,
        }
    }

    /// 标题中分隔符之前的部分；没有分隔符或前缀为空时用整个标题
    pub fn client_name(&self, title: &str) -> String {
        match title.split(self.separator).next() {
            Some(prefix) if !prefix.is_empty() => sanitize(prefix),
            _ => sanitize(title),
        }
    }

    /// 归档，返回最终路径
    ///
    /// 移动失败时源文件保留在原处。
    pub fn file(&self, source: &Path, title: &str) -> AppResult<PathBuf> {
        let client_dir = self.root.join(self.client_name(title));
        fs::create_dir_all(&client_dir).map_err(|e| AppError::create_dir_failed(&client_dir, e))?;

        let extension = source
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("csv");
        let target = free_target(&client_dir, &sanitize(title), extension);

        move_file(source, &target)?;
        debug!("已归档: {} -> {}", source.display(), target.display());
        Ok(target)
    }
}

fn sanitize(title: &str) -> String {
    let cleaned = title.replace(PATH_HOSTILE_CHARS, "-");
    // "." 与 ".." 会指向当前或上级目录
    if cleaned.chars().all(|c| c == '.') {
        "-".repeat(cleaned.len().max(1))
    } else {
        cleaned
    }
}

/// 第一个不存在的目标路径：`stem.ext`，`stem_<时间戳>.ext`，`stem_<时间戳>_2.ext`...
fn free_target(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    let plain = dir.join(format!("{}.{}", stem, extension));
    if !plain.exists() {
        return plain;
    }

    let timestamp = chrono::Local::now().format("%Y%m%d%H%M%S").to_string();
    let stamped = dir.join(format!("{}_{}.{}", stem, timestamp, extension));
    if !stamped.exists() {
        return stamped;
    }

    (2..)
        .map(|n| dir.join(format!("{}_{}_{}.{}", stem, timestamp, n, extension)))
        .find(|candidate| !candidate.exists())
        .unwrap_or(stamped)
}

/// 移动文件，目标已存在时失败而不是覆盖
fn move_file(source: &Path, target: &Path) -> AppResult<()> {
    link_then_remove(source, target)
        .or_else(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                return Err(e);
            }
            // 跨文件系统或不支持硬链接时，改为复制后删除源文件
            debug!("硬链接失败 ({})，尝试复制", e);
            copy_then_remove(source, target)
        })
        .map_err(|e| {
            warn!("归档移动失败: {}", e);
            AppError::File(FileError::MoveFailed {
                from: source.to_path_buf(),
                to: target.to_path_buf(),
                source: e,
            })
        })
}

fn link_then_remove(source: &Path, target: &Path) -> io::Result<()> {
    fs::hard_link(source, target)?;
    if let Err(e) = fs::remove_file(source) {
        let _ = fs::remove_file(target);
        return Err(e);
    }
    Ok(())
}

fn copy_then_remove(source: &Path, target: &Path) -> io::Result<()> {
    let mut reader = File::open(source)?;
    let mut writer = OpenOptions::new().write(true).create_new(true).open(target)?;

    let copied = io::copy(&mut reader, &mut writer).and_then(|_| writer.sync_all());
    drop(writer);

    if let Err(e) = copied.and_then(|_| fs::remove_file(source)) {
        // 不留下两份
        let _ = fs::remove_file(target);
        return Err(e);
    }
    Ok(())
}
