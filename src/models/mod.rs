pub mod date_range;
pub mod loaders;
pub mod outcome;
pub mod queue_item;

pub use date_range::{parse_ui_date, UiDateRange, UI_DATE_FORMAT};
pub use loaders::load_queue_file;
pub use outcome::{BatchEntry, BatchResult, EntryScope, FailureReason, Outcome};
pub use queue_item::QueueItem;
