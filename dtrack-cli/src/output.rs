//! Output formatting utilities

use chrono::{FixedOffset, TimeZone};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use dtrack_core::services::format_percentage;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
///
/// Goes to stderr so JSON and CSV output stay machine-readable.
pub fn warning(msg: &str) {
    eprintln!("{}", msg.yellow());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Percentage change colored by direction
///
/// With `lower_is_better` a decrease is shown green.
pub fn signed_change(change: f64, lower_is_better: bool) -> String {
    let text = format_percentage(change);
    let good = if lower_is_better { change < 0.0 } else { change > 0.0 };
    if change == 0.0 || change.is_nan() {
        text.dimmed().to_string()
    } else if good {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}

/// Local date and time for a millisecond timestamp
pub fn format_timestamp(timestamp_ms: i64, tz: &FixedOffset) -> String {
    tz.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}
