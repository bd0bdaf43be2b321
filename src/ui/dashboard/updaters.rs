//! Dashboard state update logic
//!
//! Applies sync results to the page. Every outcome is turned into activity log
//! events; nothing here fails.

use super::state::DashboardState;

use crate::events::{Event as SyncEvent, EventType};
use crate::export::{ExportError, ExportOutcome};
use crate::logging::LogLevel;
use crate::models::{EnvironmentSample, PredictionResult};
use crate::notice::Severity;
use crate::backend::error::BackendError;
use crate::page::{SlotId, format_reading};
use crate::sync::{Endpoint, RefreshTrigger, SyncUpdate};
use crate::thresholds::WarningKind;

use chrono::{DateTime, Local};
use std::collections::BTreeSet;
use std::time::Instant;

impl DashboardState {
    /// Advance the animation tick and drop expired banners.
    pub fn update(&mut self) {
        self.tick += 1;
        self.notices.expire(Instant::now());
    }

    /// Applies one sync result and records what happened in the activity log.
    pub fn apply(&mut self, update: SyncUpdate) -> Vec<SyncEvent> {
        let events = match update {
            SyncUpdate::Refreshed { at, trigger } => self.apply_refreshed(at, trigger),
            SyncUpdate::Environment { seq, result } => self.apply_environment(seq, result),
            SyncUpdate::Prediction { seq, result } => self.apply_prediction(seq, result),
        };
        for event in &events {
            event.emit();
            self.add_to_activity_log(event.clone());
        }
        events
    }

    /// Records the result of an export and raises a banner for it.
    pub fn record_export(&mut self, result: Result<ExportOutcome, ExportError>) -> SyncEvent {
        let event = match result {
            Ok(ExportOutcome::Written { path, rows }) => {
                let msg = format!("Exported {} rows to {}", rows, path.display());
                self.notices.notify(msg.clone(), Severity::Success);
                SyncEvent::export(msg, EventType::Success, LogLevel::Info)
            }
            Ok(ExportOutcome::Empty) => {
                let msg = "Nothing to export".to_string();
                self.notices.notify(msg.clone(), Severity::Info);
                SyncEvent::export(msg, EventType::Success, LogLevel::Info)
            }
            Err(e) => {
                let msg = format!("Export failed: {}", e);
                self.notices.notify(msg.clone(), Severity::Danger);
                SyncEvent::export(msg, EventType::Error, LogLevel::Error)
            }
        };
        event.emit();
        self.add_to_activity_log(event.clone());
        event
    }

    fn apply_refreshed(&mut self, at: DateTime<Local>, trigger: RefreshTrigger) -> Vec<SyncEvent> {
        Self::log_skipped(self.page.show_last_updated(at));
        self.last_refresh = Some((at, trigger));
        let level = match trigger {
            RefreshTrigger::Timer => LogLevel::Debug,
            RefreshTrigger::Manual => LogLevel::Info,
        };
        vec![SyncEvent::scheduler(
            format!("{} refresh started", trigger),
            EventType::Refresh,
            level,
        )]
    }

    fn apply_environment(
        &mut self,
        seq: u64,
        result: Result<EnvironmentSample, BackendError>,
    ) -> Vec<SyncEvent> {
        if let Some(stale) = self.discard_if_stale(Endpoint::Environment, seq) {
            return vec![stale];
        }
        match result {
            Ok(sample) => {
                self.freshness_mut().admit(Endpoint::Environment, seq);
                Self::log_skipped(self.page.show_environment(&sample));
                self.publish_snapshot(&sample);

                let mut events = vec![SyncEvent::environment(
                    format!(
                        "Temperature {}, humidity {}",
                        Self::reading(sample.latest("temperature"), "°C"),
                        Self::reading(sample.latest("humidity"), "%")
                    ),
                    EventType::Success,
                    LogLevel::Info,
                )];
                events.extend(self.check_thresholds(&sample));
                self.latest_environment = Some(sample);
                events
            }
            Err(e) => vec![SyncEvent::environment(
                format!("Fetch failed: {}", self.error_handler().describe(&e)),
                EventType::Error,
                self.error_handler().classify_error(&e),
            )],
        }
    }

    fn apply_prediction(
        &mut self,
        seq: u64,
        result: Result<PredictionResult, BackendError>,
    ) -> Vec<SyncEvent> {
        if let Some(stale) = self.discard_if_stale(Endpoint::Prediction, seq) {
            return vec![stale];
        }
        match result {
            Ok(prediction) => {
                self.freshness_mut().admit(Endpoint::Prediction, seq);
                Self::log_skipped(self.page.show_prediction(&prediction));

                let msg = match prediction.overall_risk {
                    Some(overall) => format!(
                        "Risk level {} (overall {:.0}%)",
                        prediction.risk_level,
                        overall * 100.0
                    ),
                    None => format!("Risk level {}", prediction.risk_level),
                };
                self.latest_prediction = Some(prediction);
                vec![SyncEvent::prediction(msg, EventType::Success, LogLevel::Info)]
            }
            Err(e) => vec![SyncEvent::prediction(
                format!("Fetch failed: {}", self.error_handler().describe(&e)),
                EventType::Error,
                self.error_handler().classify_error(&e),
            )],
        }
    }

    /// A response is stale when a newer one for the same endpoint was already applied.
    fn discard_if_stale(&self, endpoint: Endpoint, seq: u64) -> Option<SyncEvent> {
        if self.freshness().is_fresh(endpoint, seq) {
            return None;
        }
        let msg = format!(
            "Discarded response #{}, #{} already shown",
            seq,
            self.freshness().last_applied(endpoint)
        );
        Some(match endpoint {
            Endpoint::Environment => {
                SyncEvent::environment(msg, EventType::Discarded, LogLevel::Debug)
            }
            Endpoint::Prediction => SyncEvent::prediction(msg, EventType::Discarded, LogLevel::Debug),
        })
    }

    /// Raises a banner for each breach that was not active on the previous update.
    fn check_thresholds(&mut self, sample: &EnvironmentSample) -> Vec<SyncEvent> {
        let warnings = self.thresholds().check(sample);
        let current: BTreeSet<WarningKind> = warnings.iter().map(|w| w.kind).collect();

        let mut events = Vec::new();
        for warning in warnings {
            if self.active_warnings().contains(&warning.kind) {
                continue;
            }
            self.notices.notify(warning.message.clone(), warning.severity);
            let level = match warning.severity {
                Severity::Danger => LogLevel::Error,
                _ => LogLevel::Warn,
            };
            events.push(SyncEvent::thresholds(warning.message, level));
        }
        *self.active_warnings_mut() = current;
        events
    }

    fn reading(value: Option<f64>, unit: &str) -> String {
        value
            .map(|v| format_reading(v, unit))
            .unwrap_or_else(|| "n/a".to_string())
    }

    fn log_skipped(skipped: Vec<SlotId>) {
        for slot in skipped {
            log::debug!("Slot '{}' not updated", slot);
        }
    }
}
