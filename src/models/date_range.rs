//! 日期范围换算
//!
//! 站点日期选择器的结束日是开区间，传给页面的结束日统一为请求结束日的后一天。

use chrono::NaiveDate;

use crate::error::{AppResult, ConfigError};

/// 页面输入框使用的日期格式
pub const UI_DATE_FORMAT: &str = "%d.%m.%Y";

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// 实际填入日期选择器的范围
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiDateRange {
    pub start: String,
    pub end: String,
}

impl UiDateRange {
    /// 根据请求范围计算填入页面的值
    ///
    /// 开始日不变，结束日加一天，使请求的结束日被包含在导出中。
    /// 不检查 start <= end。
    pub fn for_export(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        let effective_end = end.succ_opt().ok_or_else(|| ConfigError::DateOutOfRange {
            date: end.format(UI_DATE_FORMAT).to_string(),
        })?;

        Ok(Self {
            start: start.format(UI_DATE_FORMAT).to_string(),
            end: effective_end.format(UI_DATE_FORMAT).to_string(),
        })
    }
}

/// 解析 `DD.MM.YYYY`，也接受 `YYYY-MM-DD`
pub fn parse_ui_date(value: &str) -> AppResult<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, UI_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT))
        .map_err(|_| {
            ConfigError::InvalidDate {
                value: value.to_string(),
            }
            .into()
        })
}
