//! Dashboard state management
//!
//! Contains the main dashboard state struct and the search input state

use crate::consts::cli_consts::{MAX_ACTIVITY_LOGS, ui};
use crate::environment::Environment;
use crate::events::Event as SyncEvent;
use crate::export::SharedEnvironment;
use crate::models::{EnvironmentSample, PredictionResult};
use crate::network::ErrorHandler;
use crate::notice::NoticeBoard;
use crate::page::Page;
use crate::sync::{FreshnessGuard, RefreshTrigger};
use crate::thresholds::{WarningKind, WarningThresholds};
use crate::ui::app::UIConfig;

use chrono::{DateTime, Local};
use std::collections::{BTreeSet, VecDeque};
use std::time::{Duration, Instant};

/// Activity log filter typed after `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    /// Whether keystrokes currently go to the query.
    pub editing: bool,
    pub query: String,
}

impl SearchState {
    pub fn is_filtering(&self) -> bool {
        !self.query.is_empty()
    }

    pub fn matches(&self, event: &SyncEvent) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let query = self.query.to_lowercase();
        event.msg.to_lowercase().contains(&query)
    }
}

/// Everything the dashboard renders, owned by the UI or headless loop.
#[derive(Debug)]
pub struct DashboardState {
    /// The backend the dashboard reads from.
    pub environment: Environment,
    /// The start time of the application, used for computing uptime.
    pub start_time: Instant,
    /// When the dashboard screen was first shown; drives the card entrance.
    pub shown_at: Instant,
    /// Display slots mounted by the configured layout.
    pub page: Page,
    /// Banners above the cards.
    pub notices: NoticeBoard,
    /// Activity logs for display (last 100 events)
    pub activity_logs: VecDeque<SyncEvent>,
    /// Latest applied environment payload, kept for the chart.
    pub latest_environment: Option<EnvironmentSample>,
    /// Latest applied prediction payload, kept for the chart.
    pub latest_prediction: Option<PredictionResult>,
    /// Time and cause of the last refresh.
    pub last_refresh: Option<(DateTime<Local>, RefreshTrigger)>,
    pub search: SearchState,
    /// Period of the recurring refresh, shown in the header.
    pub refresh_interval: Duration,
    /// Whether to enable background colors
    pub with_background_color: bool,
    /// Animation tick counter
    pub tick: usize,

    freshness: FreshnessGuard,
    thresholds: WarningThresholds,
    active_warnings: BTreeSet<WarningKind>,
    snapshot: Option<SharedEnvironment>,
    error_handler: ErrorHandler,
}

impl DashboardState {
    /// Creates a new instance of the dashboard state.
    pub fn new(environment: Environment, start_time: Instant, ui_config: UIConfig) -> Self {
        Self {
            environment,
            start_time,
            shown_at: Instant::now(),
            page: Page::new(ui_config.mounted_slots),
            notices: NoticeBoard::new(ui_config.notice_ttl),
            activity_logs: VecDeque::new(),
            latest_environment: None,
            latest_prediction: None,
            last_refresh: None,
            search: SearchState::default(),
            refresh_interval: ui_config.refresh_interval,
            with_background_color: ui_config.with_background_color,
            tick: 0,
            freshness: FreshnessGuard::new(),
            thresholds: ui_config.thresholds,
            active_warnings: BTreeSet::new(),
            snapshot: ui_config.snapshot,
            error_handler: ErrorHandler::new(),
        }
    }

    pub fn freshness(&self) -> &FreshnessGuard {
        &self.freshness
    }

    pub(super) fn freshness_mut(&mut self) -> &mut FreshnessGuard {
        &mut self.freshness
    }

    pub fn thresholds(&self) -> &WarningThresholds {
        &self.thresholds
    }

    pub fn active_warnings(&self) -> &BTreeSet<WarningKind> {
        &self.active_warnings
    }

    pub(super) fn active_warnings_mut(&mut self) -> &mut BTreeSet<WarningKind> {
        &mut self.active_warnings
    }

    pub fn error_handler(&self) -> &ErrorHandler {
        &self.error_handler
    }

    /// Publishes the latest applied sample to the export provider, if one is wired in.
    pub(super) fn publish_snapshot(&self, sample: &EnvironmentSample) {
        if let Some(snapshot) = &self.snapshot {
            match snapshot.write() {
                Ok(mut guard) => *guard = Some(sample.clone()),
                Err(_) => log::warn!("Export snapshot lock poisoned, export data not updated"),
            }
        }
    }

    /// Add an event to activity logs with size limit
    pub fn add_to_activity_log(&mut self, event: SyncEvent) {
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.activity_logs.push_back(event);
    }

    /// Log entries matching the search query, oldest first.
    pub fn filtered_logs(&self) -> Vec<&SyncEvent> {
        self.activity_logs
            .iter()
            .filter(|event| event.should_display() && self.search.matches(event))
            .collect()
    }

    /// Card `index` slides in `index * 120ms` after the dashboard is shown.
    pub fn card_visible(&self, index: usize) -> bool {
        self.shown_at.elapsed() >= ui::card_stagger() * index as u32
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventType, Source};
    use crate::logging::LogLevel;

    fn state() -> DashboardState {
        DashboardState::new(Environment::Local, Instant::now(), UIConfig::default())
    }

    #[test]
    fn test_activity_log_is_bounded() {
        let mut state = state();
        for i in 0..(MAX_ACTIVITY_LOGS + 5) {
            state.add_to_activity_log(SyncEvent::scheduler(
                format!("refresh {}", i),
                EventType::Refresh,
                LogLevel::Info,
            ));
        }
        assert_eq!(state.activity_logs.len(), MAX_ACTIVITY_LOGS);
        assert_eq!(state.activity_logs[0].msg, "refresh 5");
    }

    #[test]
    fn test_search_filters_case_insensitively() {
        let mut state = state();
        state.add_to_activity_log(SyncEvent::environment(
            "Temperature 23.5°C".to_string(),
            EventType::Success,
            LogLevel::Info,
        ));
        state.add_to_activity_log(SyncEvent::prediction(
            "Risk level high".to_string(),
            EventType::Success,
            LogLevel::Info,
        ));

        state.search.query = "RISK".to_string();
        let shown = state.filtered_logs();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].source, Source::Prediction);

        state.search.query.clear();
        assert_eq!(state.filtered_logs().len(), 2);
    }

    #[test]
    fn test_first_card_is_visible_immediately() {
        let state = state();
        assert!(state.card_visible(0));
    }
}
