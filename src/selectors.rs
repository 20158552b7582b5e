//! 站点页面元素
//!
//! 站点同时使用语义标记和样式类，不同视图不一致；能用文本定位的优先，
//! 样式类作为第二级。

use crate::infrastructure::{Locator, SelectorChain};

// ========== 登录页 ==========

pub const CONSENT_OK: &str = "//*[contains(@class, 'cookies__content')]//*[contains(text(), 'OK')]";
pub const ANY_INPUT: &str = "input";
pub const EMAIL_INPUT: &str = "input.input-with-label__input[type='email']";
pub const LABELED_INPUT: &str = "input.input-with-label__input";
pub const PASSWORD_INPUT: &str = "input.input-with-label__input[type='password']";
pub const LOGIN_SUBMIT: &str = "button.entry-form__submit";

// ========== 主题结果页 ==========

pub const DATEPICKER_WRAPPER: &str = "header-datepicker__wrapper";
pub const CUSTOM_RANGE_ITEM: &str = "//li[contains(text(), 'Custom') or contains(text(), 'Customize')]";
pub const RANGE_START_FIELD: &str = "daterangepicker_start";
pub const RANGE_END_FIELD: &str = "daterangepicker_end";
pub const APPLY_BUTTON: &str = ".applyBtn";
pub const EXPORT_BUTTON_TEXT: &str = "//button[contains(., 'Export')]";
pub const EXPORT_BUTTON_CLASS: &str = "button.secondary.small.with-icon.without-line-separator";
pub const CSV_OPTION_EXACT: &str = "//*[contains(@class, 'actions-list__item') and contains(., 'CSV file')]";
pub const CSV_OPTION_LOOSE: &str = "//*[contains(@class, 'actions-list__item') and contains(., 'CSV')]";

pub fn email_field() -> SelectorChain {
    SelectorChain::new("邮箱输入框")
        .then(Locator::css(EMAIL_INPUT))
        .then(Locator::css(LABELED_INPUT))
}

pub fn export_button() -> SelectorChain {
    SelectorChain::new("导出按钮")
        .then(Locator::xpath(EXPORT_BUTTON_TEXT))
        .then(Locator::css(EXPORT_BUTTON_CLASS))
}

pub fn csv_option() -> SelectorChain {
    SelectorChain::new("CSV 选项")
        .then(Locator::xpath(CSV_OPTION_EXACT))
        .then(Locator::xpath(CSV_OPTION_LOOSE))
}
