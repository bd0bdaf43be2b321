//! Event System
//!
//! Activity log entries produced while syncing the dashboard

use crate::logging::{LogLevel, should_log_with_env};
use chrono::Local;
use std::fmt::Display;

/// Part of the dashboard an event originates from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum Source {
    /// The refresh trigger (timer or manual).
    Scheduler,
    /// The environment-data fetch.
    Environment,
    /// The prediction fetch.
    Prediction,
    /// CSV export of the current view.
    Export,
    /// Environmental threshold checks.
    Thresholds,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Error,
    Refresh,
    /// A response arrived after a newer one had already been applied.
    Discarded,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub source: Source,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
}

impl Event {
    pub fn new(source: Source, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            source,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
        }
    }

    pub fn scheduler(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Source::Scheduler, msg, event_type, log_level)
    }

    pub fn environment(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Source::Environment, msg, event_type, log_level)
    }

    pub fn prediction(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Source::Prediction, msg, event_type, log_level)
    }

    pub fn export(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Source::Export, msg, event_type, log_level)
    }

    pub fn thresholds(msg: String, log_level: LogLevel) -> Self {
        Self::new(Source::Thresholds, msg, EventType::Warning, log_level)
    }

    pub fn should_display(&self) -> bool {
        // Always show success events and info level events
        if self.event_type == EventType::Success || self.log_level >= LogLevel::Info {
            return true;
        }
        should_log_with_env(self.log_level)
    }

    /// Forward the event to the `log` facade.
    pub fn emit(&self) {
        let level: log::Level = self.log_level.into();
        log::log!(level, "[{}] {}", self.source, self.msg);
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.event_type, self.timestamp, self.source, self.msg
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_and_info_events_always_display() {
        let success = Event::environment("ok".to_string(), EventType::Success, LogLevel::Debug);
        assert!(success.should_display());

        let warn = Event::prediction("slow".to_string(), EventType::Error, LogLevel::Warn);
        assert!(warn.should_display());
    }

    #[test]
    fn test_display_includes_source_and_message() {
        let event = Event::export("wrote 3 rows".to_string(), EventType::Success, LogLevel::Info);
        let text = event.to_string();
        assert!(text.starts_with("Success ["));
        assert!(text.ends_with("Export: wrote 3 rows"));
    }
}
