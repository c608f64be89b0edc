//! Human-readable rendering of sizes, phone numbers, dates and durations.

use chrono::{DateTime, Duration, Month as CalendarMonth, Utc};
use phonenumber::{Mode, parse};

use crate::domain::assignment::MonthKey;

const KIB: f64 = 1024.0;

/// Formats a byte count with binary units, one decimal above bytes.
pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64 / KIB;
    for unit in ["KB", "MB"] {
        if value < KIB {
            return format!("{value:.1} {unit}");
        }
        value /= KIB;
    }
    format!("{value:.1} GB")
}

/// International format of a phone number, or the raw input when it does not
/// parse.
pub fn format_phone(value: &str) -> String {
    let trimmed = value.trim();
    match parse(None, trimmed) {
        Ok(number) => number.format().mode(Mode::International).to_string(),
        Err(_) => trimmed.to_string(),
    }
}

pub fn format_date(value: &DateTime<Utc>) -> String {
    value.format("%d %b %Y, %H:%M").to_string()
}

/// "March 2024".
pub fn month_label(period: &MonthKey) -> String {
    let name = u8::try_from(period.month.get())
        .ok()
        .and_then(|m| CalendarMonth::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_else(|| period.month.to_string());
    format!("{name} {}", period.year)
}

/// "2h 05m"; negative spans render as zero.
pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}
