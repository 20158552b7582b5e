//! 运行结果
//!
//! 每个队列条目对应一条结果，按队列顺序追加；登录失败时只有一条运行级结果。

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::models::queue_item::QueueItem;

/// 失败原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    /// 登录未完成
    Login,
    /// 浏览器会话无法建立
    SessionStart(String),
    /// 导出流程中某一步失败
    Workflow { step: String, detail: String },
    /// 下载目录中没有找到导出文件
    ArtifactNotFound,
    /// 归档失败，文件留在下载目录
    Filing(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Login => write!(f, "login"),
            FailureReason::SessionStart(detail) => write!(f, "session: {}", detail),
            FailureReason::Workflow { step, detail } => {
                write!(f, "workflow: [{}] {}", step, detail)
            }
            FailureReason::ArtifactNotFound => write!(f, "artifact not found"),
            FailureReason::Filing(detail) => write!(f, "filing: {}", detail),
        }
    }
}

/// 单条结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Success { artifact_path: PathBuf },
    Failure { reason: FailureReason },
}

impl Outcome {
    pub fn failure(reason: FailureReason) -> Self {
        Outcome::Failure { reason }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

/// 结果归属
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum EntryScope {
    /// 整次运行（登录、会话）
    Run,
    /// 队列中的某一条，index 从 1 开始
    Item {
        index: usize,
        topic_id: String,
        title: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchEntry {
    #[serde(flatten)]
    pub scope: EntryScope,
    pub outcome: Outcome,
}

impl BatchEntry {
    pub fn run(reason: FailureReason) -> Self {
        Self {
            scope: EntryScope::Run,
            outcome: Outcome::failure(reason),
        }
    }

    pub fn item(index: usize, item: &QueueItem, outcome: Outcome) -> Self {
        Self {
            scope: EntryScope::Item {
                index,
                topic_id: item.topic_id().to_string(),
                title: item.title().to_string(),
            },
            outcome,
        }
    }

    /// 用于日志的名称
    pub fn label(&self) -> &str {
        match &self.scope {
            EntryScope::Run => "run",
            EntryScope::Item { title, .. } => title,
        }
    }
}

impl fmt::Display for BatchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Success { artifact_path } => {
                write!(f, "✅ {}: saved to {}", self.label(), artifact_path.display())
            }
            Outcome::Failure { reason } => write!(f, "❌ {}: {}", self.label(), reason),
        }
    }
}

/// 一次运行的全部结果，只追加
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    entries: Vec<BatchEntry>,
}

impl BatchResult {
    pub(crate) fn push(&mut self, entry: BatchEntry) -> &BatchEntry {
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.entries.len() - self.success_count()
    }

    /// 是否存在运行级失败（登录或会话）
    pub fn run_failed(&self) -> bool {
        self.entries
            .iter()
            .any(|e| matches!(e.scope, EntryScope::Run))
    }
}
