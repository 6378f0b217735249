//! Display fallbacks for bug fields.
//!
//! Each function picks the first available source in a fixed priority order
//! and otherwise returns a fixed fallback text. Renderers call these instead
//! of branching on optional fields themselves.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const UNTITLED: &str = "Untitled Bug";
pub const DATE_UNAVAILABLE: &str = "Date not available";
pub const INVALID_DATE: &str = "Invalid Date";
pub const UNKNOWN_CONTRIBUTOR: &str = "Unknown";
pub const NO_SCREENSHOTS: &str = "No project screenshots available.";
pub const NO_DESCRIPTION: &str = "No description available.";
pub const NO_CONTRIBUTORS: &str = "No contributors listed.";

/// Body of a bug page, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyContent<'a> {
    /// Markdown `content`.
    Markdown(&'a str),
    /// Plain `description`, used only without `content`.
    Plain(&'a str),
    /// Neither was published.
    Missing,
}

/// Choose the page body: markdown content, then description, then nothing.
pub fn body_content<'a>(content: Option<&'a str>, description: Option<&'a str>) -> BodyContent<'a> {
    match (content, description) {
        (Some(md), _) if !md.is_empty() => BodyContent::Markdown(md),
        (_, Some(text)) if !text.is_empty() => BodyContent::Plain(text),
        _ => BodyContent::Missing,
    }
}

pub fn display_title(title: Option<&str>) -> &str {
    match title {
        Some(t) if !t.is_empty() => t,
        _ => UNTITLED,
    }
}

pub fn contributor_name(name: Option<&str>) -> &str {
    match name {
        Some(n) if !n.is_empty() => n,
        _ => UNKNOWN_CONTRIBUTOR,
    }
}

/// Long-form date (`January 5, 2024`), or a fallback.
pub fn display_date(date: Option<&str>) -> String {
    match date {
        Some(raw) if !raw.is_empty() => match parse_calendar_date(raw) {
            Some(day) => format_long_date(day),
            None => INVALID_DATE.to_string(),
        },
        _ => DATE_UNAVAILABLE.to_string(),
    }
}

/// Parse the calendar day of an ISO-8601 date or date-time.
///
/// Accepts `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, naive date-times and RFC 3339
/// timestamps. Timestamps keep the day in their own offset.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts.date());
        }
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(day);
    }
    match raw.len() {
        7 => NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok(),
        4 if raw.bytes().all(|b| b.is_ascii_digit()) => {
            NaiveDate::parse_from_str(&format!("{raw}-01-01"), "%Y-%m-%d").ok()
        }
        _ => None,
    }
}

pub fn format_long_date(day: NaiveDate) -> String {
    day.format("%B %-d, %Y").to_string()
}

/// Alt text for the n-th (zero-based) screenshot.
pub fn screenshot_alt(title: Option<&str>, index: usize) -> String {
    let subject = match title {
        Some(t) if !t.is_empty() => t,
        _ => "screenshot",
    };
    format!("Bug {} screenshot {}", subject, index + 1)
}

pub fn photo_alt(name: Option<&str>) -> String {
    match name {
        Some(n) if !n.is_empty() => format!("{n}'s profile"),
        _ => "Contributor's profile".to_string(),
    }
}

pub fn linkedin_label(name: Option<&str>) -> String {
    match name {
        Some(n) if !n.is_empty() => format!("Visit {n}'s LinkedIn profile"),
        _ => "Visit contributor's LinkedIn profile".to_string(),
    }
}
