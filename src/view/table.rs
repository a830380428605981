//! View tables
//!
//! - `ViewTable`: one (age group, procedure) slice of a dataset, indexed by week
//! - `ComparativeTable`: the COVID slice and an elective slice aligned on week,
//!   keeping only fully populated weeks

use crate::dataset::{Dataset, DatasetRow};
use crate::view::error::{ViewError, ViewResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Numeric columns of a view table
pub const VIEW_COLUMNS: [&str; 3] = ["patients", "physicians", "claims"];

/// Columns of the comparative table, COVID side first
pub const COMPARATIVE_COLUMNS: [&str; 6] = [
    "covid_patients",
    "covid_physicians",
    "covid_claims",
    "elective_patients",
    "elective_physicians",
    "elective_claims",
];

/// One week of counts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewRow {
    pub week: NaiveDate,
    pub patients: Option<i64>,
    pub physicians: Option<i64>,
    pub claims: Option<i64>,
}

impl From<&DatasetRow> for ViewRow {
    fn from(row: &DatasetRow) -> Self {
        Self {
            week: row.week,
            patients: row.patients,
            physicians: row.physicians,
            claims: row.claims,
        }
    }
}

impl ViewRow {
    /// Values in `VIEW_COLUMNS` order
    pub fn values(&self) -> [Option<i64>; 3] {
        [self.patients, self.physicians, self.claims]
    }
}

/// Week-indexed projection of a dataset, in file order
///
/// Weeks are not required to be unique; duplicates show up as repeated
/// chart points.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewTable {
    pub rows: Vec<ViewRow>,
}

impl ViewTable {
    /// Rows where `age == age_group AND elective == elective`
    ///
    /// No matching rows yields an empty table, not an error.
    pub fn filter(dataset: &Dataset, age_group: &str, elective: &str) -> Self {
        let rows = dataset
            .rows
            .iter()
            .filter(|row| row.matches(age_group, elective))
            .map(ViewRow::from)
            .collect();

        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn weeks(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.week).collect()
    }

    /// Map week to row, rejecting weeks that occur more than once
    fn index_by_week(&self, side: &'static str) -> ViewResult<BTreeMap<NaiveDate, &ViewRow>> {
        let mut index = BTreeMap::new();
        for row in &self.rows {
            if index.insert(row.week, row).is_some() {
                return Err(ViewError::DuplicateWeek {
                    side,
                    week: row.week,
                });
            }
        }
        Ok(index)
    }
}

/// One fully populated week of the comparison
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComparativeRow {
    pub week: NaiveDate,
    pub covid_patients: i64,
    pub covid_physicians: i64,
    pub covid_claims: i64,
    pub elective_patients: i64,
    pub elective_physicians: i64,
    pub elective_claims: i64,
}

impl ComparativeRow {
    /// Combine two rows for the same week; `None` if any count is missing
    fn combine(covid: &ViewRow, elective: &ViewRow) -> Option<Self> {
        Some(Self {
            week: covid.week,
            covid_patients: covid.patients?,
            covid_physicians: covid.physicians?,
            covid_claims: covid.claims?,
            elective_patients: elective.patients?,
            elective_physicians: elective.physicians?,
            elective_claims: elective.claims?,
        })
    }

    /// Values in `COMPARATIVE_COLUMNS` order
    pub fn values(&self) -> [i64; 6] {
        [
            self.covid_patients,
            self.covid_physicians,
            self.covid_claims,
            self.elective_patients,
            self.elective_physicians,
            self.elective_claims,
        ]
    }
}

/// COVID vs. elective counts over the weeks both slices have
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComparativeTable {
    pub rows: Vec<ComparativeRow>,
}

impl ComparativeTable {
    /// Align the two views on week and drop incomplete rows
    ///
    /// When both views carry the same week sequence (always the case when the
    /// elective is COVID itself) rows pair up positionally and keep their
    /// order. Otherwise weeks must be unique in each view and the result is
    /// ordered by week.
    pub fn join(covid: &ViewTable, elective: &ViewTable) -> ViewResult<Self> {
        if covid.weeks() == elective.weeks() {
            let rows = covid
                .rows
                .iter()
                .zip(&elective.rows)
                .filter_map(|(c, e)| ComparativeRow::combine(c, e))
                .collect();
            return Ok(Self { rows });
        }

        let covid_index = covid.index_by_week("covid")?;
        let elective_index = elective.index_by_week("elective")?;

        let rows = covid_index
            .iter()
            .filter_map(|(week, c)| {
                elective_index
                    .get(week)
                    .and_then(|e| ComparativeRow::combine(c, e))
            })
            .collect();

        Ok(Self { rows })
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &COMPARATIVE_COLUMNS
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn head(&self, n: usize) -> &[ComparativeRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Column-major copy of the values, one vector per column
    pub fn column_values(&self) -> Vec<Vec<f64>> {
        (0..COMPARATIVE_COLUMNS.len())
            .map(|col| self.rows.iter().map(|r| r.values()[col] as f64).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::COVID;

    fn week(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, m, d).unwrap()
    }

    fn sample() -> Dataset {
        Dataset::new(
            "CA",
            vec![
                DatasetRow::new("50-64", "CATARACT", week(1, 1), 10, 2, 5),
                DatasetRow::new("50-64", "COVID", week(1, 1), 100, 20, 50),
                DatasetRow::new("50-64", "CATARACT", week(1, 8), 12, 3, 6),
                DatasetRow::new("50-64", "COVID", week(1, 15), 90, 18, 40),
                DatasetRow::new("65+", "CATARACT", week(1, 1), 30, 4, 9),
            ],
        )
    }

    #[test]
    fn test_filter_projects_matching_rows() {
        let view = ViewTable::filter(&sample(), "50-64", "CATARACT");

        assert_eq!(view.len(), 2);
        assert_eq!(
            view.rows[0],
            ViewRow {
                week: week(1, 1),
                patients: Some(10),
                physicians: Some(2),
                claims: Some(5),
            }
        );
        assert_eq!(view.weeks(), vec![week(1, 1), week(1, 8)]);
    }

    #[test]
    fn test_filter_absent_pair_is_empty() {
        let view = ViewTable::filter(&sample(), "18-29", "CABG");
        assert!(view.is_empty());

        let empty = ComparativeTable::join(&view, &view).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_join_keeps_shared_weeks() {
        let dataset = sample();
        let elective = ViewTable::filter(&dataset, "50-64", "CATARACT");
        let covid = ViewTable::filter(&dataset, "50-64", COVID);

        let table = ComparativeTable::join(&covid, &elective).unwrap();

        assert_eq!(table.len(), 1);
        assert!(table.len() <= elective.len().min(covid.len()));
        assert_eq!(
            table.rows[0],
            ComparativeRow {
                week: week(1, 1),
                covid_patients: 100,
                covid_physicians: 20,
                covid_claims: 50,
                elective_patients: 10,
                elective_physicians: 2,
                elective_claims: 5,
            }
        );
    }

    #[test]
    fn test_join_drops_missing_values() {
        let mut dataset = sample();
        dataset.rows[0].claims = None;

        let elective = ViewTable::filter(&dataset, "50-64", "CATARACT");
        let covid = ViewTable::filter(&dataset, "50-64", COVID);

        let table = ComparativeTable::join(&covid, &elective).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_join_sorts_by_week() {
        let dataset = Dataset::new(
            "NY",
            vec![
                DatasetRow::new("65+", "CABG", week(2, 5), 1, 1, 1),
                DatasetRow::new("65+", "CABG", week(1, 1), 2, 2, 2),
                DatasetRow::new("65+", "COVID", week(1, 1), 3, 3, 3),
                DatasetRow::new("65+", "COVID", week(2, 5), 4, 4, 4),
            ],
        );
        let elective = ViewTable::filter(&dataset, "65+", "CABG");
        let covid = ViewTable::filter(&dataset, "65+", COVID);

        let table = ComparativeTable::join(&covid, &elective).unwrap();
        let weeks: Vec<_> = table.rows.iter().map(|r| r.week).collect();
        assert_eq!(weeks, vec![week(1, 1), week(2, 5)]);
    }

    #[test]
    fn test_join_rejects_duplicate_weeks() {
        let dataset = Dataset::new(
            "TX",
            vec![
                DatasetRow::new("65+", "CABG", week(1, 1), 1, 1, 1),
                DatasetRow::new("65+", "CABG", week(1, 1), 2, 2, 2),
                DatasetRow::new("65+", "COVID", week(1, 1), 3, 3, 3),
            ],
        );
        let elective = ViewTable::filter(&dataset, "65+", "CABG");
        let covid = ViewTable::filter(&dataset, "65+", COVID);

        let err = ComparativeTable::join(&covid, &elective).unwrap_err();
        assert!(matches!(err, ViewError::DuplicateWeek { side: "elective", .. }));
    }

    #[test]
    fn test_covid_selection_is_identical() {
        let dataset = sample();
        let elective = ViewTable::filter(&dataset, "50-64", COVID);
        let covid = ViewTable::filter(&dataset, "50-64", COVID);
        assert_eq!(elective, covid);

        let table = ComparativeTable::join(&covid, &elective).unwrap();
        assert_eq!(table.len(), covid.len());
        for row in &table.rows {
            assert_eq!(row.covid_patients, row.elective_patients);
            assert_eq!(row.covid_claims, row.elective_claims);
        }
    }

    #[test]
    fn test_column_values_layout() {
        let dataset = sample();
        let table = ComparativeTable::join(
            &ViewTable::filter(&dataset, "50-64", COVID),
            &ViewTable::filter(&dataset, "50-64", "CATARACT"),
        )
        .unwrap();

        let columns = table.column_values();
        assert_eq!(columns.len(), 6);
        assert_eq!(columns[0], vec![100.0]);
        assert_eq!(columns[5], vec![5.0]);
    }
}
