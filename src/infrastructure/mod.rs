pub mod locator;
pub mod page_driver;

pub use locator::{wait_for, wait_for_url, wait_required, Locator, SelectorChain};
pub use page_driver::{ChromePage, ClickMode, PageDriver};
