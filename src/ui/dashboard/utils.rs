//! Dashboard utility functions
//!
//! Contains helper functions used across dashboard components

use crate::events::Source;
use crate::models::BadgeStyle;
use crate::notice::Severity;
use ratatui::prelude::Color;
use std::time::Duration;

/// Get a ratatui color for an event based on where it came from
pub fn get_source_color(source: &Source) -> Color {
    match source {
        Source::Scheduler => Color::Cyan,
        Source::Environment => Color::LightGreen,
        Source::Prediction => Color::Yellow,
        Source::Export => Color::LightBlue,
        Source::Thresholds => Color::LightRed,
    }
}

pub fn badge_color(style: BadgeStyle) -> Color {
    match style {
        BadgeStyle::Success => Color::Green,
        BadgeStyle::Warning => Color::Yellow,
        BadgeStyle::Danger => Color::Red,
        BadgeStyle::Neutral => Color::Gray,
    }
}

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::LightBlue,
        Severity::Success => Color::Green,
        Severity::Warning => Color::Yellow,
        Severity::Danger => Color::Red,
    }
}

/// Format compact timestamp (`MM-DD HH:MM`) from a `YYYY-MM-DD HH:MM:SS` timestamp
pub fn format_compact_timestamp(timestamp: &str) -> String {
    let mut parts = timestamp.split(' ');
    let (Some(date_part), Some(time_part)) = (parts.next(), parts.next()) else {
        return timestamp.to_string();
    };
    match (date_part.get(5..10), time_part.get(0..5)) {
        (Some(month_day), Some(hour_min)) => format!("{} {}", month_day, hour_min),
        _ => timestamp.to_string(),
    }
}

/// `1h 02m 03s`, dropping leading zero units.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_timestamp() {
        assert_eq!(format_compact_timestamp("2024-05-01 14:05:09"), "05-01 14:05");
        assert_eq!(format_compact_timestamp("garbage"), "garbage");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(9)), "9s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 05s");
        assert_eq!(format_duration(Duration::from_secs(3723)), "1h 02m 03s");
    }
}
