use chrono::{DateTime, Local, Utc};
use std::borrow::Cow;

use crate::layers::ResourceType;

const KB: u64 = 1024;
const MB: u64 = 1024 * 1024;

pub const UNKNOWN_SIZE: &str = "Unknown size";

/// Buckets elapsed whole days into a humanized label.
///
/// Months are 30 days and years 365 days; calendar boundaries are ignored.
/// Timestamps in the future are measured by absolute distance.
pub fn format_date(uploaded: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (now - uploaded).num_days().unsigned_abs();

    match days {
        0 => "today".to_string(),
        1 => "yesterday".to_string(),
        d if d < 7 => format!("{} days ago", d),
        d if d < 30 => format!("{} weeks ago", d / 7),
        d if d < 365 => format!("{} months ago", d / 30),
        d => format!("{} years ago", d / 365),
    }
}

pub fn format_file_size(bytes: Option<u64>) -> String {
    match bytes {
        None | Some(0) => UNKNOWN_SIZE.to_string(),
        Some(b) if b < KB => format!("{} B", b),
        Some(b) if b < MB => format!("{:.1} KB", b as f64 / KB as f64),
        Some(b) => format!("{:.1} MB", b as f64 / MB as f64),
    }
}

pub fn file_icon(kind: &ResourceType) -> &'static str {
    match kind {
        ResourceType::Notes => "📝",
        ResourceType::Papers => "📄",
        ResourceType::Books => "📚",
        ResourceType::Other => "📎",
        ResourceType::Unknown(_) => "📄",
    }
}

/// Escapes text for interpolation into HTML element content or attribute values.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(text)
}

/// Replaces control characters (ANSI escapes, bells, carriage returns) before
/// backend text reaches the terminal.
pub fn terminal_safe(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|c| if c.is_control() { '_' } else { c })
            .collect(),
    )
}

pub fn capitalize(tag: &str) -> String {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Full timestamp in the viewer's local zone, for the details view.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}
