//! 运行日志写入 - 业务能力层
//!
//! 每完成一条就追加一行，运行结束写 JSON 汇总

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{AppError, AppResult, FileError};
use crate::models::{BatchEntry, BatchResult};

/// 运行日志
pub struct RunLog {
    log_file_path: PathBuf,
}

impl RunLog {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            log_file_path: path.into(),
        }
    }

    /// 重建日志文件并写入表头
    pub fn init(&self) -> AppResult<()> {
        let log_header = format!(
            "{}\n导出运行日志 - {}\n{}\n\n",
            "=".repeat(60),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            "=".repeat(60)
        );
        fs::write(&self.log_file_path, log_header)
            .map_err(|e| AppError::file_write_failed(&self.log_file_path, e))
    }

    /// 追加一条结果
    pub fn append(&self, entry: &BatchEntry) -> AppResult<()> {
        debug!("写入运行日志: {}", entry);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file_path)
            .map_err(|e| AppError::file_write_failed(&self.log_file_path, e))?;

        let line = format!(
            "[{}] {}\n",
            chrono::Local::now().format("%H:%M:%S"),
            entry
        );
        file.write_all(line.as_bytes())
            .map_err(|e| AppError::file_write_failed(&self.log_file_path, e))
    }

    pub fn path(&self) -> &Path {
        &self.log_file_path
    }
}

/// 写入 JSON 汇总
pub fn write_summary(path: &Path, result: &BatchResult) -> AppResult<()> {
    let json = serde_json::to_string_pretty(result).map_err(FileError::from)?;
    fs::write(path, json).map_err(|e| AppError::file_write_failed(path, e))
}
