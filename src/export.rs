//! CSV export of the data currently on screen
//!
//! The rows come from a pluggable [`DataProvider`]. The default provider has
//! nothing to export, so exporting is a no-op until an embedder wires in a
//! real source such as [`EnvironmentSnapshotProvider`].
//!
//! Fields are quoted per RFC 4180: a field containing a comma, a double quote,
//! CR or LF is wrapped in double quotes with inner quotes doubled.

use crate::consts::cli_consts::EXPORT_FILE_NAME;
use crate::models::EnvironmentSample;
use std::borrow::Cow;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Latest applied environment sample, shared between the dashboard state and export.
pub type SharedEnvironment = Arc<RwLock<Option<EnvironmentSample>>>;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}

/// One record of the export, fields in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportRow {
    fields: Vec<(String, String)>,
}

impl ExportRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.fields.push((key.into(), value.to_string()));
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_str())
    }
}

/// Serialises rows to CSV. The header is the keys of the first row and every
/// row is written in that key order; no rows give an empty string.
pub fn to_csv(rows: &[ExportRow]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };
    let header: Vec<&str> = first.keys().collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(join_fields(header.iter().copied()));
    for row in rows {
        lines.push(join_fields(
            header.iter().map(|key| row.get(key).unwrap_or_default()),
        ));
    }
    lines.join("\n")
}

fn join_fields<'a>(fields: impl Iterator<Item = &'a str>) -> String {
    fields.map(escape_field).collect::<Vec<_>>().join(",")
}

fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Source of the rows considered "current data".
pub trait DataProvider: Send + Sync {
    fn current_rows(&self) -> Vec<ExportRow>;
}

/// Provides nothing; export is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyProvider;

impl DataProvider for EmptyProvider {
    fn current_rows(&self) -> Vec<ExportRow> {
        Vec::new()
    }
}

/// One row per reading of the latest applied environment sample.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentSnapshotProvider {
    snapshot: SharedEnvironment,
}

impl EnvironmentSnapshotProvider {
    pub fn new(snapshot: SharedEnvironment) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> SharedEnvironment {
        Arc::clone(&self.snapshot)
    }
}

impl DataProvider for EnvironmentSnapshotProvider {
    fn current_rows(&self) -> Vec<ExportRow> {
        let Ok(guard) = self.snapshot.read() else {
            return Vec::new();
        };
        match guard.as_ref() {
            Some(sample) => sample_rows(sample),
            None => Vec::new(),
        }
    }
}

fn sample_rows(sample: &EnvironmentSample) -> Vec<ExportRow> {
    let columns: Vec<(String, Vec<f64>)> = sample
        .metric_names()
        .into_iter()
        .filter_map(|name| sample.series(&name).map(|values| (name, values)))
        .collect();
    let len = columns
        .iter()
        .map(|(_, values)| values.len())
        .chain(std::iter::once(sample.timestamps.len()))
        .max()
        .unwrap_or(0);

    (0..len)
        .map(|i| {
            let timestamp = sample.timestamps.get(i).map(String::as_str).unwrap_or("");
            columns.iter().fold(
                ExportRow::new().with("timestamp", timestamp),
                |row, (name, values)| match values.get(i) {
                    Some(value) => row.with(name.as_str(), value),
                    None => row.with(name.as_str(), ""),
                },
            )
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The provider had no rows; no file was written.
    Empty,
    Written { path: PathBuf, rows: usize },
}

/// Writes the provider's rows to `agricultural_data.csv` in a directory.
pub struct Exporter {
    provider: Box<dyn DataProvider>,
    directory: PathBuf,
}

impl Exporter {
    pub fn new(provider: Box<dyn DataProvider>, directory: PathBuf) -> Self {
        Self {
            provider,
            directory,
        }
    }

    pub fn export(&self) -> Result<ExportOutcome, ExportError> {
        export_current_view(self.provider.as_ref(), &self.directory)
    }
}

pub fn export_current_view(
    provider: &dyn DataProvider,
    directory: &Path,
) -> Result<ExportOutcome, ExportError> {
    let rows = provider.current_rows();
    let csv = to_csv(&rows);
    if csv.is_empty() {
        return Ok(ExportOutcome::Empty);
    }

    fs::create_dir_all(directory)?;
    let path = directory.join(EXPORT_FILE_NAME);
    fs::write(&path, csv)?;
    Ok(ExportOutcome::Written {
        path,
        rows: rows.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_empty_rows_give_empty_string() {
        assert_eq!(to_csv(&[]), "");
    }

    #[test]
    fn test_header_then_rows_in_first_row_key_order() {
        let rows = vec![
            ExportRow::new().with("a", 1).with("b", 2),
            ExportRow::new().with("a", 3).with("b", 4),
        ];
        assert_eq!(to_csv(&rows), "a,b\n1,2\n3,4");
    }

    #[test]
    fn test_rows_follow_header_order_even_if_built_differently() {
        let rows = vec![
            ExportRow::new().with("a", 1).with("b", 2),
            ExportRow::new().with("b", 4).with("a", 3),
        ];
        assert_eq!(to_csv(&rows), "a,b\n1,2\n3,4");
    }

    #[test]
    fn test_fields_are_quoted_when_needed() {
        let rows = vec![
            ExportRow::new()
                .with("note", "dry, windy")
                .with("label", "the \"north\" block")
                .with("plain", "ok"),
        ];
        assert_eq!(
            to_csv(&rows),
            "note,label,plain\n\"dry, windy\",\"the \"\"north\"\" block\",ok"
        );
    }

    #[test]
    fn test_empty_provider_writes_no_file() {
        let dir = tempdir().unwrap();
        let outcome = export_current_view(&EmptyProvider, dir.path()).unwrap();
        assert_eq!(outcome, ExportOutcome::Empty);
        assert!(!dir.path().join(EXPORT_FILE_NAME).exists());
    }

    #[test]
    fn test_snapshot_provider_exports_latest_sample() {
        let dir = tempdir().unwrap();
        let mut sample = EnvironmentSample::new(vec![21.0, 23.5], vec![60.0, 58.0]);
        sample.timestamps = vec!["2024-05-01 09:00".to_string(), "2024-05-01 10:00".to_string()];
        sample
            .other
            .insert("soil_moisture".to_string(), json!([30.0]));
        let provider = EnvironmentSnapshotProvider::default();
        *provider.snapshot().write().unwrap() = Some(sample);

        let exporter = Exporter::new(Box::new(provider), dir.path().join("exports"));
        let outcome = exporter.export().unwrap();

        let path = dir.path().join("exports").join(EXPORT_FILE_NAME);
        assert_eq!(
            outcome,
            ExportOutcome::Written {
                path: path.clone(),
                rows: 2
            }
        );
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "timestamp,temperature,humidity,soil_moisture\n\
             2024-05-01 09:00,21,60,30\n\
             2024-05-01 10:00,23.5,58,"
        );
    }

    #[test]
    fn test_snapshot_provider_without_sample_is_empty() {
        let provider = EnvironmentSnapshotProvider::default();
        assert!(provider.current_rows().is_empty());
    }
}
