pub mod dialogs;
pub mod formatting;
pub mod updates;

pub use dialogs::{format_status, set_status, show_error, StatusLevel};
pub use formatting::format_record_json;
pub use updates::{page_report, render, update_ui_from_state};
