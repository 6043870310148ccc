//! Display formatting - currency, dates, relative ages, progress.
//!
//! Pure functions, recomputed whenever the source data or the masking flag
//! changes. Anything time-dependent takes the reference instant as an
//! argument so tests can pin the clock.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};

/// Fixed-width placeholder shown when balances are hidden.
pub const MASKED_AMOUNT: &str = "••••••••";

/// Formats a naira amount with thousands grouping, or the fixed-length mask
/// when balances are hidden. The mask never varies with the amount.
#[must_use]
pub fn format_currency(amount: i64, show_value: bool) -> String {
    if !show_value {
        return MASKED_AMOUNT.to_string();
    }
    if amount < 0 {
        format!("-₦{}", group_thousands(amount.unsigned_abs()))
    } else {
        format!("₦{}", group_thousands(amount.unsigned_abs()))
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Formats a date as "Dec 1, 2024".
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    format!("{} {}, {}", month_abbrev(date.month()), date.day(), date.year())
}

/// Formats a time of day as "9:15 AM".
#[must_use]
pub fn format_time(instant: DateTime<Utc>) -> String {
    let (is_pm, hour) = instant.hour12();
    let meridiem = if is_pm { "PM" } else { "AM" };
    format!("{}:{:02} {}", hour, instant.minute(), meridiem)
}

const fn month_abbrev(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        _ => "Dec",
    }
}

/// Coarse age of an event relative to `now`: "Just now", "3h ago", "2d ago",
/// "1w ago".
#[must_use]
pub fn relative_age(instant: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - instant).num_hours();
    if hours < 1 {
        return "Just now".to_string();
    }
    if hours < 24 {
        return format!("{hours}h ago");
    }
    let days = hours / 24;
    if days < 7 {
        return format!("{days}d ago");
    }
    format!("{}w ago", days / 7)
}

/// Time-of-day greeting for the home header.
#[must_use]
pub const fn greeting(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good morning ☀️",
        12..=16 => "Good afternoon 🌤️",
        17..=20 => "Good evening 🌅",
        _ => "Good night 🌙",
    }
}

/// English ordinal suffix for a day of month (1st, 2nd, 3rd, 4th, ...).
#[must_use]
pub const fn day_suffix(day: u32) -> &'static str {
    if day > 3 && day < 21 {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Payout progress as a whole percentage, rounded to nearest and clamped to
/// 0-100. A plan with `total == 0` has made no progress: the result is 0,
/// never NaN.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn calculate_progress(completed: i64, total: i64) -> i64 {
    if total == 0 {
        return 0;
    }
    let percent = (completed as f64 / total as f64 * 100.0).round() as i64;
    percent.clamp(0, 100)
}
