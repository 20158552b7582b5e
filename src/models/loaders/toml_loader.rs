use std::path::Path;

use serde::Deserialize;
use tokio::fs;

use crate::error::{AppError, AppResult, ConfigError, FileError};
use crate::models::date_range::parse_ui_date;
use crate::models::queue_item::QueueItem;

/// 队列文件结构
///
/// ```toml
/// [[items]]
/// topic_id = "1171861"
/// title = "Acme_Brand"
/// start_date = "01.03.2024"
/// end_date = "05.03.2024"
/// ```
#[derive(Debug, Deserialize)]
struct QueueFile {
    #[serde(default)]
    items: Vec<RawQueueItem>,
}

#[derive(Debug, Deserialize)]
struct RawQueueItem {
    topic_id: String,
    title: String,
    start_date: String,
    end_date: String,
}

/// 从 TOML 文件加载队列，保持文件中的顺序
pub async fn load_queue_file(path: &Path) -> AppResult<Vec<QueueItem>> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path, e))?;

    let queue: QueueFile = toml::from_str(&content).map_err(|e| FileError::TomlParseFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    let items = into_queue(queue)?;
    tracing::info!(
        "成功加载 {} 个导出请求: {}",
        items.len(),
        path.file_name().unwrap_or_default().to_string_lossy()
    );
    Ok(items)
}

/// 解析队列文本
pub fn parse_queue(content: &str) -> AppResult<Vec<QueueItem>> {
    let queue: QueueFile = toml::from_str(content).map_err(|e| FileError::TomlParseFailed {
        path: Default::default(),
        source: e,
    })?;
    into_queue(queue)
}

fn into_queue(queue: QueueFile) -> AppResult<Vec<QueueItem>> {
    queue
        .items
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            let index = i + 1;
            to_queue_item(raw).map_err(|e| {
                AppError::from(ConfigError::InvalidQueueItem {
                    index,
                    reason: e.to_string(),
                })
            })
        })
        .collect()
}

fn to_queue_item(raw: RawQueueItem) -> AppResult<QueueItem> {
    let start_date = parse_ui_date(&raw.start_date)?;
    let end_date = parse_ui_date(&raw.end_date)?;
    QueueItem::new(raw.topic_id, raw.title, start_date, end_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_queue_keeps_order() {
        let content = r#"
            [[items]]
            topic_id = "1171861"
            title = "Acme_Brand"
            start_date = "01.03.2024"
            end_date = "05.03.2024"

            [[items]]
            topic_id = "42"
            title = "Globex_Social"
            start_date = "2024-02-01"
            end_date = "2024-02-29"
        "#;

        let items = parse_queue(content).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].topic_id(), "1171861");
        assert_eq!(items[1].title(), "Globex_Social");
        assert_eq!(items[1].end_date(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_empty_file_is_empty_queue() {
        assert!(parse_queue("").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_item_names_its_index() {
        let content = r#"
            [[items]]
            topic_id = "1"
            title = "Acme_Brand"
            start_date = "01.03.2024"
            end_date = "05.03.2024"

            [[items]]
            topic_id = "2"
            title = ""
            start_date = "01.03.2024"
            end_date = "05.03.2024"
        "#;

        let err = parse_queue(content).unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::InvalidQueueItem { index: 2, .. })
        ));
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let content = r#"
            [[items]]
            topic_id = "1"
            title = "Acme_Brand"
            start_date = "2024/03/01"
            end_date = "05.03.2024"
        "#;
        assert!(parse_queue(content).is_err());
    }

    #[tokio::test]
    async fn test_load_queue_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_queue_file(&dir.path().join("missing.toml")).await.unwrap_err();
        assert!(matches!(err, AppError::File(FileError::ReadFailed { .. })));
    }

    #[test]
    fn test_load_queue_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queue.toml");
        std::fs::write(
            &path,
            "[[items]]\ntopic_id = \"7\"\ntitle = \"Acme_Brand\"\nstart_date = \"01.03.2024\"\nend_date = \"05.03.2024\"\n",
        )
        .unwrap();

        let items = tokio_test::block_on(load_queue_file(&path)).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].topic_id(), "7");
    }
}
