//! Environmental threshold checks
//!
//! Compares the latest readings against configured limits and reports each
//! breach with the severity used for its banner.

use crate::models::EnvironmentSample;
use crate::notice::Severity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display)]
pub enum WarningKind {
    TemperatureHigh,
    TemperatureLow,
    HumidityHigh,
    HumidityLow,
    SoilMoistureLow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdWarning {
    pub kind: WarningKind,
    pub severity: Severity,
    pub message: String,
    pub value: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarningThresholds {
    pub temperature_high: f64,
    pub temperature_low: f64,
    pub humidity_high: f64,
    pub humidity_low: f64,
    pub soil_moisture_low: f64,
}

impl Default for WarningThresholds {
    fn default() -> Self {
        Self {
            temperature_high: 35.0,
            temperature_low: 5.0,
            humidity_high: 90.0,
            humidity_low: 30.0,
            soil_moisture_low: 20.0,
        }
    }
}

impl WarningThresholds {
    /// Breaches in the latest readings of `sample`. Metrics without readings are ignored.
    pub fn check(&self, sample: &EnvironmentSample) -> Vec<ThresholdWarning> {
        let mut warnings = Vec::new();

        if let Some(value) = sample.latest("temperature") {
            if value > self.temperature_high {
                warnings.push(ThresholdWarning {
                    kind: WarningKind::TemperatureHigh,
                    severity: Severity::Danger,
                    message: format!(
                        "High temperature: {:.1}°C is above {:.1}°C",
                        value, self.temperature_high
                    ),
                    value,
                    threshold: self.temperature_high,
                });
            } else if value < self.temperature_low {
                warnings.push(ThresholdWarning {
                    kind: WarningKind::TemperatureLow,
                    severity: Severity::Warning,
                    message: format!(
                        "Low temperature: {:.1}°C is below {:.1}°C",
                        value, self.temperature_low
                    ),
                    value,
                    threshold: self.temperature_low,
                });
            }
        }

        if let Some(value) = sample.latest("humidity") {
            if value > self.humidity_high {
                warnings.push(ThresholdWarning {
                    kind: WarningKind::HumidityHigh,
                    severity: Severity::Warning,
                    message: format!(
                        "High humidity: {:.1}% is above {:.1}%",
                        value, self.humidity_high
                    ),
                    value,
                    threshold: self.humidity_high,
                });
            } else if value < self.humidity_low {
                warnings.push(ThresholdWarning {
                    kind: WarningKind::HumidityLow,
                    severity: Severity::Warning,
                    message: format!(
                        "Low humidity: {:.1}% is below {:.1}%",
                        value, self.humidity_low
                    ),
                    value,
                    threshold: self.humidity_low,
                });
            }
        }

        if let Some(value) = sample.latest("soil_moisture") {
            if value < self.soil_moisture_low {
                warnings.push(ThresholdWarning {
                    kind: WarningKind::SoilMoistureLow,
                    severity: Severity::Danger,
                    message: format!(
                        "Dry soil: moisture {:.1}% is below {:.1}%",
                        value, self.soil_moisture_low
                    ),
                    value,
                    threshold: self.soil_moisture_low,
                });
            }
        }

        warnings
    }
}
