//! Output formatting for the sample run.
//!
//! - [`terminal`] - step banners and field formatting
//! - [`report`] - the end-of-run summary

mod report;
mod terminal;

pub use report::{print_report, report_lines};
pub use terminal::{format_label, step, STEP_COUNT};
