//! Display slots of the dashboard page
//!
//! A [`Page`] holds the slots its layout mounts. Display updates write to a
//! slot only when it is mounted; a missing slot skips that one update and the
//! rest of the cycle carries on.

use crate::models::{BadgeStyle, EnvironmentSample, PredictionResult};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

/// Named display target. The kebab-case names are the ids used in the config file.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SlotId {
    Temperature,
    Humidity,
    RiskLevel,
    LastUpdate,
    EnvironmentChart,
    RiskChart,
    Search,
    Refresh,
    Export,
}

impl SlotId {
    pub fn all() -> Vec<SlotId> {
        SlotId::iter().collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slot {
    pub text: Option<String>,
    pub style: BadgeStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    slots: BTreeMap<SlotId, Slot>,
}

impl Page {
    pub fn new(mounted: impl IntoIterator<Item = SlotId>) -> Self {
        Self {
            slots: mounted
                .into_iter()
                .map(|id| (id, Slot::default()))
                .collect(),
        }
    }

    pub fn is_mounted(&self, id: SlotId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn slot(&self, id: SlotId) -> Option<&Slot> {
        self.slots.get(&id)
    }

    pub fn text(&self, id: SlotId) -> Option<&str> {
        self.slots.get(&id)?.text.as_deref()
    }

    /// Writes to a mounted slot. Returns `false` when the slot is missing.
    fn write(&mut self, id: SlotId, text: String, style: BadgeStyle) -> bool {
        match self.slots.get_mut(&id) {
            Some(slot) => {
                slot.text = Some(text);
                slot.style = style;
                true
            }
            None => false,
        }
    }

    /// Shows the latest temperature and humidity. Returns the slots that were
    /// skipped, either unmounted or without a reading.
    pub fn show_environment(&mut self, sample: &EnvironmentSample) -> Vec<SlotId> {
        let readings = [
            (SlotId::Temperature, sample.temperature.last(), "°C"),
            (SlotId::Humidity, sample.humidity.last(), "%"),
        ];

        let mut skipped = Vec::new();
        for (id, value, unit) in readings {
            let written = match value {
                Some(value) => self.write(id, format_reading(*value, unit), BadgeStyle::Neutral),
                None => false,
            };
            if !written {
                skipped.push(id);
            }
        }
        skipped
    }

    /// Shows the risk level badge. Returns the slots that were skipped.
    pub fn show_prediction(&mut self, prediction: &PredictionResult) -> Vec<SlotId> {
        let level = &prediction.risk_level;
        if self.write(
            SlotId::RiskLevel,
            level.as_str().to_string(),
            level.badge_style(),
        ) {
            Vec::new()
        } else {
            vec![SlotId::RiskLevel]
        }
    }

    /// Shows the time of the last refresh. Returns the slots that were skipped.
    pub fn show_last_updated(&mut self, at: DateTime<Local>) -> Vec<SlotId> {
        if self.write(SlotId::LastUpdate, format_time(at), BadgeStyle::Neutral) {
            Vec::new()
        } else {
            vec![SlotId::LastUpdate]
        }
    }
}

pub fn format_reading(value: f64, unit: &str) -> String {
    format!("{:.1}{}", value, unit)
}

/// Local wall-clock time, e.g. `14:05:09`.
pub fn format_time(at: DateTime<Local>) -> String {
    at.format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskLevel;
    use chrono::TimeZone;

    #[test]
    fn test_environment_shows_last_reading_with_units() {
        let mut page = Page::new(SlotId::all());
        let sample = EnvironmentSample::new(vec![18.0, 21.5, 23.5], vec![70.0, 64.0, 61.5]);

        let skipped = page.show_environment(&sample);

        assert!(skipped.is_empty());
        assert_eq!(page.text(SlotId::Temperature), Some("23.5°C"));
        assert_eq!(page.text(SlotId::Humidity), Some("61.5%"));
    }

    #[test]
    fn test_missing_slot_skips_only_that_update() {
        let mut page = Page::new([SlotId::Humidity, SlotId::RiskLevel]);
        let sample = EnvironmentSample::new(vec![20.0], vec![55.0]);

        let skipped = page.show_environment(&sample);

        assert_eq!(skipped, vec![SlotId::Temperature]);
        assert_eq!(page.text(SlotId::Humidity), Some("55.0%"));
        assert!(!page.is_mounted(SlotId::Temperature));
    }

    #[test]
    fn test_empty_series_leaves_previous_value() {
        let mut page = Page::new(SlotId::all());
        page.show_environment(&EnvironmentSample::new(vec![19.0], vec![50.0]));

        let skipped = page.show_environment(&EnvironmentSample::new(vec![], vec![52.0]));

        assert_eq!(skipped, vec![SlotId::Temperature]);
        assert_eq!(page.text(SlotId::Temperature), Some("19.0°C"));
        assert_eq!(page.text(SlotId::Humidity), Some("52.0%"));
    }

    #[test]
    fn test_prediction_sets_badge_text_and_style() {
        let cases = [
            ("low", BadgeStyle::Success),
            ("medium", BadgeStyle::Warning),
            ("high", BadgeStyle::Danger),
            ("severe", BadgeStyle::Neutral),
        ];
        let mut page = Page::new(SlotId::all());
        for (level, style) in cases {
            let prediction = PredictionResult::new(RiskLevel::from(level.to_string()));
            page.show_prediction(&prediction);
            let slot = page.slot(SlotId::RiskLevel).unwrap();
            assert_eq!(slot.text.as_deref(), Some(level));
            assert_eq!(slot.style, style);
        }
    }

    #[test]
    fn test_last_updated_uses_wall_clock_time() {
        let mut page = Page::new(SlotId::all());
        let at = Local.with_ymd_and_hms(2024, 5, 1, 14, 5, 9).unwrap();
        page.show_last_updated(at);
        assert_eq!(page.text(SlotId::LastUpdate), Some("14:05:09"));

        let mut bare = Page::new(Vec::<SlotId>::new());
        assert_eq!(bare.show_last_updated(at), vec![SlotId::LastUpdate]);
    }

    #[test]
    fn test_slot_ids_use_kebab_case() {
        assert_eq!(SlotId::LastUpdate.to_string(), "last-update");
        let parsed: SlotId = serde_json::from_str("\"environment-chart\"").unwrap();
        assert_eq!(parsed, SlotId::EnvironmentChart);
        assert_eq!(SlotId::all().len(), 9);
    }
}
