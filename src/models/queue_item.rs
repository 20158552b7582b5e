use std::fmt::Display;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::error::{AppResult, ConfigError};
use crate::models::date_range::UI_DATE_FORMAT;

/// 一条导出请求
///
/// 入队后不再修改。topic_id 与 title 非空；起止日期先后不做检查。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueItem {
    topic_id: String,
    title: String,
    #[serde(serialize_with = "serialize_ui_date")]
    start_date: NaiveDate,
    #[serde(serialize_with = "serialize_ui_date")]
    end_date: NaiveDate,
}

impl QueueItem {
    pub fn new(
        topic_id: impl Into<String>,
        title: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<Self> {
        let topic_id = topic_id.into().trim().to_string();
        let title = title.into().trim().to_string();

        if topic_id.is_empty() {
            return Err(ConfigError::EmptyField { field: "topic_id" }.into());
        }
        if title.is_empty() {
            return Err(ConfigError::EmptyField { field: "title" }.into());
        }

        Ok(Self {
            topic_id,
            title,
            start_date,
            end_date,
        })
    }

    pub fn topic_id(&self) -> &str {
        &self.topic_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }
}

impl Display for QueueItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[主题 #{} {} {}~{}]",
            self.topic_id,
            self.title,
            self.start_date.format(UI_DATE_FORMAT),
            self.end_date.format(UI_DATE_FORMAT)
        )
    }
}

fn serialize_ui_date<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format(UI_DATE_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_trims_fields() {
        let item = QueueItem::new(" 1171861 ", " Acme_Brand ", date(2024, 3, 1), date(2024, 3, 5)).unwrap();
        assert_eq!(item.topic_id(), "1171861");
        assert_eq!(item.title(), "Acme_Brand");
    }

    #[test]
    fn test_new_rejects_blank_fields() {
        assert!(QueueItem::new("", "Acme_Brand", date(2024, 3, 1), date(2024, 3, 5)).is_err());
        assert!(QueueItem::new("1171861", "   ", date(2024, 3, 1), date(2024, 3, 5)).is_err());
    }

    #[test]
    fn test_reversed_dates_are_accepted() {
        let item = QueueItem::new("1", "Acme_Brand", date(2024, 3, 9), date(2024, 3, 1)).unwrap();
        assert!(item.start_date() > item.end_date());
    }

    #[test]
    fn test_display_uses_ui_dates() {
        let item = QueueItem::new("1171861", "Acme_Brand", date(2024, 3, 1), date(2024, 3, 5)).unwrap();
        assert_eq!(item.to_string(), "[主题 #1171861 Acme_Brand 01.03.2024~05.03.2024]");
    }
}
