//! Formatting helpers shared by the tool definitions.

use chrono::{DateTime, Utc};

/// Default page size for listing tools.
pub fn default_per_page() -> u32 {
    30
}

pub fn default_page() -> u32 {
    1
}

/// Validate and clamp a page size to the allowed range (1-100).
pub fn clamp_per_page(per_page: u32) -> u32 {
    per_page.clamp(1, 100)
}

pub fn default_true() -> bool {
    true
}

fn parse(date: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(date)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Long timestamp, e.g. `March 5, 2024, 02:07 PM` (UTC).
///
/// Input that is not RFC 3339 comes back unchanged.
pub fn format_datetime(date: &str) -> String {
    match parse(date) {
        Some(parsed) => parsed.format("%B %-d, %Y, %I:%M %p").to_string(),
        None => date.to_string(),
    }
}

/// Short date, e.g. `3/5/2024` (UTC).
pub fn format_date(date: &str) -> String {
    match parse(date) {
        Some(parsed) => parsed.format("%-m/%-d/%Y").to_string(),
        None => date.to_string(),
    }
}

/// [`format_date`] for an optional field, `Unknown` when absent.
pub fn date_or_unknown(date: Option<&str>) -> String {
    date.map(format_date)
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Body preview for listings: the first `max` characters, or a placeholder.
pub fn body_preview(body: Option<&str>, max: usize) -> String {
    match body.filter(|body| !body.is_empty()) {
        Some(body) => crate::domains::tree::truncate(body, max),
        None => "No description".to_string(),
    }
}
