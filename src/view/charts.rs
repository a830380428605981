//! Chart specifications
//!
//! The composer decides which column plays which role; drawing is left to the
//! dashboard frontend.

use crate::view::table::{ViewTable, VIEW_COLUMNS};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One line per numeric column against the week index
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LineChart {
    /// Shared x axis
    pub weeks: Vec<NaiveDate>,
    pub series: Vec<LineSeries>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineSeries {
    pub name: String,
    /// Aligned with `weeks`; missing values are gaps in the line
    pub values: Vec<Option<i64>>,
}

impl LineChart {
    pub fn from_view(view: &ViewTable) -> Self {
        let series = VIEW_COLUMNS
            .iter()
            .enumerate()
            .map(|(idx, name)| LineSeries {
                name: name.to_string(),
                values: view.rows.iter().map(|r| r.values()[idx]).collect(),
            })
            .collect();

        Self {
            weeks: view.weeks(),
            series,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }
}

/// Which column drives each visual channel of the scatter chart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScatterEncoding {
    pub x: String,
    pub y: String,
    pub size: String,
    pub color: String,
    pub tooltip: Vec<String>,
}

impl Default for ScatterEncoding {
    fn default() -> Self {
        Self {
            x: "week".to_string(),
            y: "patients".to_string(),
            size: "claims".to_string(),
            color: "physicians".to_string(),
            tooltip: vec![
                "claims".to_string(),
                "physicians".to_string(),
                "patients".to_string(),
            ],
        }
    }
}

/// A single circle mark
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScatterPoint {
    pub week: NaiveDate,
    pub patients: i64,
    pub claims: i64,
    pub physicians: i64,
}

impl ScatterPoint {
    /// Tooltip lines in encoding order
    pub fn tooltip(&self) -> Vec<(&'static str, i64)> {
        vec![
            ("claims", self.claims),
            ("physicians", self.physicians),
            ("patients", self.patients),
        ]
    }
}

/// Circle marks over week/patients, sized by claims, coloured by physicians
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScatterChart {
    pub encoding: ScatterEncoding,
    pub points: Vec<ScatterPoint>,
    /// Pan/zoom and hover tooltips enabled
    pub interactive: bool,
}

impl ScatterChart {
    /// Rows missing any encoded value cannot be placed and are skipped
    pub fn from_view(view: &ViewTable) -> Self {
        let points = view
            .rows
            .iter()
            .filter_map(|r| {
                Some(ScatterPoint {
                    week: r.week,
                    patients: r.patients?,
                    claims: r.claims?,
                    physicians: r.physicians?,
                })
            })
            .collect();

        Self {
            encoding: ScatterEncoding::default(),
            points,
            interactive: true,
        }
    }

    /// (min, max) physicians, for the colour scale
    pub fn color_domain(&self) -> Option<(i64, i64)> {
        let min = self.points.iter().map(|p| p.physicians).min()?;
        let max = self.points.iter().map(|p| p.physicians).max()?;
        Some((min, max))
    }

    /// (min, max) claims, for the size scale
    pub fn size_domain(&self) -> Option<(i64, i64)> {
        let min = self.points.iter().map(|p| p.claims).min()?;
        let max = self.points.iter().map(|p| p.claims).max()?;
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::table::ViewRow;

    fn view() -> ViewTable {
        let week = |d| NaiveDate::from_ymd_opt(2021, 1, d).unwrap();
        ViewTable {
            rows: vec![
                ViewRow {
                    week: week(1),
                    patients: Some(10),
                    physicians: Some(2),
                    claims: Some(5),
                },
                ViewRow {
                    week: week(8),
                    patients: Some(12),
                    physicians: None,
                    claims: Some(7),
                },
            ],
        }
    }

    #[test]
    fn test_line_chart_series() {
        let chart = LineChart::from_view(&view());

        assert_eq!(chart.weeks.len(), 2);
        let names: Vec<_> = chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["patients", "physicians", "claims"]);
        assert_eq!(chart.series[1].values, vec![Some(2), None]);
    }

    #[test]
    fn test_scatter_skips_incomplete_rows() {
        let chart = ScatterChart::from_view(&view());

        assert_eq!(chart.points.len(), 1);
        assert_eq!(chart.encoding.size, "claims");
        assert_eq!(chart.encoding.color, "physicians");
        assert_eq!(chart.color_domain(), Some((2, 2)));
        assert_eq!(
            chart.points[0].tooltip(),
            vec![("claims", 5), ("physicians", 2), ("patients", 10)]
        );
    }

    #[test]
    fn test_empty_view_gives_empty_charts() {
        let empty = ViewTable::default();

        let line = LineChart::from_view(&empty);
        assert!(line.is_empty());
        assert_eq!(line.series.len(), 3);

        let scatter = ScatterChart::from_view(&empty);
        assert!(scatter.points.is_empty());
        assert_eq!(scatter.size_domain(), None);
    }
}
