pub mod display;
pub mod reporter;

pub use display::{format_duration, write_match_line, SearchSummary};
pub use reporter::{ReportSender, Reporter};
