//! Core data types for per-state datasets
//!
//! - `DatasetRow`: one weekly observation for an age group and procedure
//! - `Dataset`: the full row set loaded from one state's CSV file

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column names of a loaded dataset, in display order
pub const COLUMNS: [&str; 6] = ["age", "elective", "week", "patients", "physicians", "claims"];

/// A single row of a state's dataset
///
/// Numeric cells are optional: an empty cell in the file is a missing value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatasetRow {
    /// Age band, e.g. "50-64"
    pub age: String,
    /// Procedure type, e.g. "CATARACT" or "COVID"
    pub elective: String,
    /// Week the counts refer to
    pub week: NaiveDate,
    pub patients: Option<i64>,
    pub physicians: Option<i64>,
    pub claims: Option<i64>,
}

impl DatasetRow {
    /// Create a row with all counts present
    pub fn new(
        age: impl Into<String>,
        elective: impl Into<String>,
        week: NaiveDate,
        patients: i64,
        physicians: i64,
        claims: i64,
    ) -> Self {
        Self {
            age: age.into(),
            elective: elective.into(),
            week,
            patients: Some(patients),
            physicians: Some(physicians),
            claims: Some(claims),
        }
    }

    /// Check whether this row belongs to the given age group and procedure
    pub fn matches(&self, age_group: &str, elective: &str) -> bool {
        self.age == age_group && self.elective == elective
    }
}

/// All rows of one state's dataset, in file order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dataset {
    /// State code the dataset was loaded for
    pub state: String,
    pub rows: Vec<DatasetRow>,
}

impl Dataset {
    pub fn new(state: impl Into<String>, rows: Vec<DatasetRow>) -> Self {
        Self {
            state: state.into(),
            rows,
        }
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), COLUMNS.len())
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    /// First `n` rows in file order
    pub fn head(&self, n: usize) -> &[DatasetRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, d).unwrap()
    }

    #[test]
    fn test_shape_and_columns() {
        let dataset = Dataset::new(
            "CA",
            vec![
                DatasetRow::new("50-64", "CATARACT", week(1), 10, 2, 5),
                DatasetRow::new("50-64", "COVID", week(1), 100, 20, 50),
            ],
        );

        assert_eq!(dataset.shape(), (2, 6));
        assert_eq!(
            dataset.columns(),
            &["age", "elective", "week", "patients", "physicians", "claims"]
        );
    }

    #[test]
    fn test_head_shorter_than_dataset() {
        let rows = (1..=3)
            .map(|d| DatasetRow::new("65+", "CABG", week(d), 1, 1, 1))
            .collect();
        let dataset = Dataset::new("TX", rows);

        assert_eq!(dataset.head(10).len(), 3);
        assert_eq!(dataset.head(2).len(), 2);
        assert_eq!(dataset.head(0).len(), 0);
    }

    #[test]
    fn test_row_matches() {
        let row = DatasetRow::new("18-29", "MASTECTOMY", week(8), 3, 1, 2);
        assert!(row.matches("18-29", "MASTECTOMY"));
        assert!(!row.matches("18-29", "COVID"));
        assert!(!row.matches("30-39", "MASTECTOMY"));
    }
}
