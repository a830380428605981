//! Dataset Loader
//!
//! Reads `<data_dir>/<prefix><STATE>.csv` and memoizes the parsed table per
//! state code for the lifetime of the process. There is no invalidation: a
//! file changed on disk keeps being served from the cache until restart.

use crate::dataset::error::{DatasetError, DatasetResult};
use crate::dataset::types::{Dataset, DatasetRow};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Where the per-state files live and how they are laid out
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    /// Directory holding the per-state files
    pub data_dir: PathBuf,
    /// File name prefix before the state code
    pub file_prefix: String,
    /// Zero-based position of the temporal `week` column
    pub week_column: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            file_prefix: "dataset_".to_string(),
            week_column: 4,
        }
    }
}

impl DatasetConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Path of the backing file for a state code
    pub fn path_for(&self, state: &str) -> PathBuf {
        self.data_dir.join(format!("{}{}.csv", self.file_prefix, state))
    }
}

/// Read-through cache of per-state datasets
pub struct DatasetLoader {
    config: DatasetConfig,
    cache: RwLock<HashMap<String, Arc<Dataset>>>,
}

impl DatasetLoader {
    pub fn new(config: DatasetConfig) -> Self {
        Self {
            config,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// Load the dataset for a state code, reading the file only on first use
    ///
    /// The code is not checked against the known state list; an unknown code
    /// simply has no file and fails with [`DatasetError::NotFound`].
    pub async fn load(&self, state: &str) -> DatasetResult<Arc<Dataset>> {
        {
            let cache = self.cache.read().await;
            if let Some(dataset) = cache.get(state) {
                tracing::debug!(state = %state, "Dataset cache hit");
                return Ok(Arc::clone(dataset));
            }
        }

        let path = self.config.path_for(state);
        let started = Instant::now();

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| DatasetError::from_io(state, path.clone(), e))?;
        let dataset = Arc::new(parse_dataset(state, &bytes, self.config.week_column)?);

        tracing::info!(
            state = %state,
            path = %path.display(),
            rows = dataset.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Loaded dataset"
        );

        // A concurrent first load may have won the race; keep whichever landed first.
        let mut cache = self.cache.write().await;
        let entry = cache.entry(state.to_string()).or_insert(dataset);
        Ok(Arc::clone(entry))
    }

    /// State codes currently held in the cache, sorted
    pub async fn cached_states(&self) -> Vec<String> {
        let mut states: Vec<String> = self.cache.read().await.keys().cloned().collect();
        states.sort();
        states
    }

    /// Whether the data directory exists
    pub fn data_dir_exists(&self) -> bool {
        self.config.data_dir.is_dir()
    }
}

/// Parse a state's CSV bytes into a dataset
///
/// The column at `week_column` must be headed `week` and is parsed as a date;
/// rows whose week cell is not a readable date are dropped. The remaining required columns are located by header name; any other
/// columns (a leading index, a state column) are ignored.
pub fn parse_dataset(state: &str, bytes: &[u8], week_column: usize) -> DatasetResult<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let layout = ColumnLayout::from_headers(&headers, week_column)?;

    let mut rows = Vec::new();
    let mut unreadable_weeks = 0usize;
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        match layout.parse_row(&record, line)? {
            Some(row) => rows.push(row),
            None => unreadable_weeks += 1,
        }
    }

    if unreadable_weeks > 0 {
        tracing::warn!(
            state = %state,
            rows = unreadable_weeks,
            "Dropped rows with an unreadable week"
        );
    }

    Ok(Dataset::new(state, rows))
}

/// Positions of the required columns within a file's header row
#[derive(Debug)]
struct ColumnLayout {
    age: usize,
    elective: usize,
    week: usize,
    patients: usize,
    physicians: usize,
    claims: usize,
}

impl ColumnLayout {
    fn from_headers(headers: &csv::StringRecord, week_column: usize) -> DatasetResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| DatasetError::Schema(format!("missing column '{}'", name)))
        };

        match headers.get(week_column).map(str::trim) {
            Some("week") => {}
            Some(other) => {
                return Err(DatasetError::Schema(format!(
                    "expected 'week' at column {}, found '{}'",
                    week_column, other
                )))
            }
            None => {
                return Err(DatasetError::Schema(format!(
                    "header has {} columns, temporal column {} is out of range",
                    headers.len(),
                    week_column
                )))
            }
        }

        Ok(Self {
            age: find("age")?,
            elective: find("elective")?,
            week: week_column,
            patients: find("patients")?,
            physicians: find("physicians")?,
            claims: find("claims")?,
        })
    }

    /// `None` when the week cell is not a date the loader understands
    fn parse_row(&self, record: &csv::StringRecord, line: u64) -> DatasetResult<Option<DatasetRow>> {
        let cell = |idx: usize| record.get(idx).map(str::trim).unwrap_or("");

        let week_str = cell(self.week);
        let Some(week) = parse_week(week_str) else {
            tracing::debug!(line, value = week_str, "Unreadable week");
            return Ok(None);
        };

        Ok(Some(DatasetRow {
            age: cell(self.age).to_string(),
            elective: cell(self.elective).to_string(),
            week,
            patients: parse_count(cell(self.patients), line, "patients")?,
            physicians: parse_count(cell(self.physicians), line, "physicians")?,
            claims: parse_count(cell(self.claims), line, "claims")?,
        }))
    }
}

/// Empty cells are missing values; integral floats ("12.0") are accepted
fn parse_count(value: &str, line: u64, column: &'static str) -> DatasetResult<Option<i64>> {
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }

    if let Ok(n) = value.parse::<i64>() {
        return Ok(Some(n));
    }

    match value.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.is_finite() => Ok(Some(f as i64)),
        _ => Err(DatasetError::Parse {
            line,
            column,
            value: value.to_string(),
        }),
    }
}

/// Parse a week cell, truncating any time component to the date
pub fn parse_week(value: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
    const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }

    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}
