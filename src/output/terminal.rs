//! Terminal output utilities.

use colored::Colorize;

/// Total number of steps in a sample run, cleanup excluded.
pub const STEP_COUNT: usize = 7;

/// Log a step banner; the console appender shows it on the terminal.
pub fn step(n: usize, message: &str) {
    log::info!("{}", step_banner(n, message));
}

fn step_banner(n: usize, message: &str) -> String {
    format!("{} {}", format!("[{n}/{STEP_COUNT}]").on_blue(), message.bold())
}

/// Format a value as a left-aligned label padded to `width`.
///
/// # Returns
/// The label followed by ':' and padding
pub fn format_label<T: ToString>(value: T, width: usize) -> String {
    let label = format!("{}:", value.to_string());
    format!("{label:<width$}")
}
