pub mod commands;
pub mod handlers;

pub use handlers::{crawl_options_from_matches, handle_crawl, report_format_from_matches};
