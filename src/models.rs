//! Backend payloads consumed by the dashboard

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Environment readings as returned by the environment-data endpoint.
///
/// Each metric is an ordered series; the dashboard only ever displays the
/// last reading of a series. Metrics other than temperature and humidity are
/// kept as raw JSON and read through [`EnvironmentSample::series`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSample {
    #[serde(default)]
    pub timestamps: Vec<String>,
    pub temperature: Vec<f64>,
    pub humidity: Vec<f64>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

impl EnvironmentSample {
    pub fn new(temperature: Vec<f64>, humidity: Vec<f64>) -> Self {
        Self {
            timestamps: Vec::new(),
            temperature,
            humidity,
            other: BTreeMap::new(),
        }
    }

    /// Returns the named series, or `None` when the backend did not send it
    /// or it is not a list of numbers.
    pub fn series(&self, metric: &str) -> Option<Vec<f64>> {
        match metric {
            "temperature" => Some(self.temperature.clone()),
            "humidity" => Some(self.humidity.clone()),
            _ => self
                .other
                .get(metric)?
                .as_array()?
                .iter()
                .map(Value::as_f64)
                .collect(),
        }
    }

    /// Last reading of the named series.
    pub fn latest(&self, metric: &str) -> Option<f64> {
        match metric {
            "temperature" => self.temperature.last().copied(),
            "humidity" => self.humidity.last().copied(),
            _ => self.series(metric)?.last().copied(),
        }
    }

    /// Names of every numeric series in the sample, temperature and humidity first.
    pub fn metric_names(&self) -> Vec<String> {
        let mut names = vec!["temperature".to_string(), "humidity".to_string()];
        names.extend(
            self.other
                .keys()
                .filter(|key| self.series(key).is_some())
                .cloned(),
        );
        names
    }
}

/// Categorical pest/disease risk as reported by the prediction backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    /// Any level string the dashboard has no style for.
    Other(String),
}

impl RiskLevel {
    pub fn as_str(&self) -> &str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Other(level) => level,
        }
    }

    pub fn badge_style(&self) -> BadgeStyle {
        match self {
            RiskLevel::Low => BadgeStyle::Success,
            RiskLevel::Medium => BadgeStyle::Warning,
            RiskLevel::High => BadgeStyle::Danger,
            RiskLevel::Other(_) => BadgeStyle::Neutral,
        }
    }
}

impl From<String> for RiskLevel {
    fn from(level: String) -> Self {
        match level.as_str() {
            "low" => RiskLevel::Low,
            "medium" => RiskLevel::Medium,
            "high" => RiskLevel::High,
            _ => RiskLevel::Other(level),
        }
    }
}

impl From<RiskLevel> for String {
    fn from(level: RiskLevel) -> Self {
        level.as_str().to_string()
    }
}

impl Display for RiskLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual class of a slot.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum BadgeStyle {
    Success,
    Warning,
    Danger,
    #[default]
    Neutral,
}

/// Output of the prediction endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub overall_risk: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub pest_risk: BTreeMap<String, f64>,
    #[serde(default)]
    pub disease_risk: BTreeMap<String, f64>,
}

impl PredictionResult {
    pub fn new(risk_level: RiskLevel) -> Self {
        Self {
            risk_level,
            overall_risk: None,
            timestamp: None,
            pest_risk: BTreeMap::new(),
            disease_risk: BTreeMap::new(),
        }
    }

    /// Every per-pest and per-disease probability, pests first.
    pub fn risk_breakdown(&self) -> Vec<(&str, f64)> {
        self.pest_risk
            .iter()
            .chain(self.disease_risk.iter())
            .map(|(name, risk)| (name.as_str(), *risk))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_badge_mapping() {
        assert_eq!(RiskLevel::from("low".to_string()).badge_style(), BadgeStyle::Success);
        assert_eq!(
            RiskLevel::from("medium".to_string()).badge_style(),
            BadgeStyle::Warning
        );
        assert_eq!(RiskLevel::from("high".to_string()).badge_style(), BadgeStyle::Danger);

        for other in ["critical", "", "HIGH", "unknown"] {
            let level = RiskLevel::from(other.to_string());
            assert_eq!(level.badge_style(), BadgeStyle::Neutral);
            assert_eq!(level.as_str(), other);
        }
    }

    #[test]
    fn test_decode_prediction_from_backend_shape() {
        let body = r#"{
            "timestamp": "2024-05-01T10:00:00",
            "pest_risk": {"aphids": 0.7, "spider_mites": 0.3},
            "disease_risk": {"powdery_mildew": 0.6},
            "overall_risk": 0.5,
            "risk_level": "medium"
        }"#;
        let prediction: PredictionResult = serde_json::from_str(body).unwrap();
        assert_eq!(prediction.risk_level, RiskLevel::Medium);
        assert_eq!(prediction.overall_risk, Some(0.5));
        assert_eq!(
            prediction.risk_breakdown(),
            vec![("aphids", 0.7), ("spider_mites", 0.3), ("powdery_mildew", 0.6)]
        );
    }

    #[test]
    fn test_decode_environment_keeps_extra_series() {
        let body = r#"{
            "timestamps": ["2024-05-01 09:00", "2024-05-01 10:00"],
            "temperature": [21.0, 23.5],
            "humidity": [60.0, 58.25],
            "soil_moisture": [30.0, 28.0],
            "note": "not a series"
        }"#;
        let sample: EnvironmentSample = serde_json::from_str(body).unwrap();
        assert_eq!(sample.latest("temperature"), Some(23.5));
        assert_eq!(sample.latest("humidity"), Some(58.25));
        assert_eq!(sample.latest("soil_moisture"), Some(28.0));
        assert_eq!(sample.series("note"), None);
        assert_eq!(
            sample.metric_names(),
            vec!["temperature", "humidity", "soil_moisture"]
        );
    }

    #[test]
    fn test_decode_environment_requires_core_series() {
        let body = r#"{"temperature": [21.0]}"#;
        assert!(serde_json::from_str::<EnvironmentSample>(body).is_err());
    }

    #[test]
    fn test_latest_of_empty_series_is_none() {
        let sample = EnvironmentSample::new(vec![], vec![55.0]);
        assert_eq!(sample.latest("temperature"), None);
        assert_eq!(sample.latest("humidity"), Some(55.0));
    }
}
