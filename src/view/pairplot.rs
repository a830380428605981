//! Pair Plot
//!
//! Pairwise view of the comparative table: a kernel density curve for each
//! column on the diagonal, and for every pair of distinct columns the
//! Pearson coefficient plus a bivariate density grid.
//!
//! Bandwidths follow Scott's rule (`n^(-1/(d+4))` times the sample standard
//! deviation). The bivariate estimate uses a product kernel, one bandwidth
//! per axis. A column without spread has no bandwidth; its cells are skipped
//! and the rest of the grid is still estimated.

use crate::view::error::PlotError;
use crate::view::table::ComparativeTable;
use serde::{Deserialize, Serialize};

/// Evaluation points along a diagonal density curve
pub const CURVE_POINTS: usize = 64;

/// Evaluation points per axis of an off-diagonal density grid
pub const GRID_POINTS: usize = 24;

/// Support is extended this many bandwidths past the data
const CUT: f64 = 3.0;

/// Grid of pairwise cells over the comparative columns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PairPlot {
    pub columns: Vec<String>,
    /// Number of rows the estimates were computed from
    pub observations: usize,
    /// Row-major, `columns.len()` squared cells
    pub cells: Vec<PairCell>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PairCell {
    pub row: usize,
    pub col: usize,
    #[serde(flatten)]
    pub content: CellContent,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellContent {
    /// Diagonal: univariate density of one column
    Density { x: Vec<f64>, density: Vec<f64> },
    /// Off-diagonal: joint density of (col on x, row on y)
    Joint {
        correlation: f64,
        x: Vec<f64>,
        y: Vec<f64>,
        /// `density[j][i]` is the estimate at `(x[i], y[j])`
        density: Vec<Vec<f64>>,
    },
    /// No estimate: a column in this cell has zero variance
    Skipped { reason: String },
}

impl PairPlot {
    pub fn build(table: &ComparativeTable) -> Result<Self, PlotError> {
        let n = table.len();
        if n < 2 {
            return Err(PlotError::NotEnoughObservations(n));
        }

        let names = table.columns();
        let data = table.column_values();

        let spreads: Vec<Option<f64>> = data
            .iter()
            .map(|values| Some(std_dev(values)).filter(|sd| *sd > 0.0 && sd.is_finite()))
            .collect();

        for (name, _) in names.iter().zip(&spreads).filter(|(_, sd)| sd.is_none()) {
            tracing::warn!(column = %name, "Zero variance, skipping density estimate");
        }

        let skipped = |row: usize, col: usize| {
            let column = if spreads[col].is_none() { names[col] } else { names[row] };
            CellContent::Skipped {
                reason: format!("column '{}' has zero variance", column),
            }
        };

        let univariate_factor = (n as f64).powf(-1.0 / 5.0);
        let bivariate_factor = (n as f64).powf(-1.0 / 6.0);

        let mut cells = Vec::with_capacity(data.len() * data.len());
        for row in 0..data.len() {
            for col in 0..data.len() {
                let content = match (spreads[row], spreads[col]) {
                    (Some(_), Some(sd)) if row == col => {
                        let bandwidth = sd * univariate_factor;
                        let x = support(&data[col], bandwidth, CURVE_POINTS);
                        let density = x.iter().map(|&p| kde_1d(&data[col], bandwidth, p)).collect();
                        CellContent::Density { x, density }
                    }
                    (Some(sd_row), Some(sd_col)) => {
                        let hx = sd_col * bivariate_factor;
                        let hy = sd_row * bivariate_factor;
                        let x = support(&data[col], hx, GRID_POINTS);
                        let y = support(&data[row], hy, GRID_POINTS);
                        let density = y
                            .iter()
                            .map(|&py| {
                                x.iter()
                                    .map(|&px| kde_2d(&data[col], &data[row], (hx, hy), (px, py)))
                                    .collect()
                            })
                            .collect();
                        CellContent::Joint {
                            correlation: pearson_correlation(&data[col], &data[row]),
                            x,
                            y,
                            density,
                        }
                    }
                    _ => skipped(row, col),
                };
                cells.push(PairCell { row, col, content });
            }
        }

        tracing::debug!(observations = n, cells = cells.len(), "Built pair plot");

        Ok(Self {
            columns: names.iter().map(|s| s.to_string()).collect(),
            observations: n,
            cells,
        })
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&PairCell> {
        self.cells.get(row * self.columns.len() + col)
    }
}

/// Sample standard deviation (n - 1 denominator)
fn std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    var.sqrt()
}

/// Evenly spaced evaluation points covering the data plus `CUT` bandwidths
fn support(values: &[f64], bandwidth: f64, points: usize) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min) - CUT * bandwidth;
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max) + CUT * bandwidth;
    let step = (max - min) / (points - 1) as f64;
    (0..points).map(|i| min + step * i as f64).collect()
}

fn gaussian(u: f64) -> f64 {
    (-0.5 * u * u).exp()
}

fn kde_1d(values: &[f64], h: f64, at: f64) -> f64 {
    let norm = values.len() as f64 * h * (2.0 * std::f64::consts::PI).sqrt();
    values.iter().map(|v| gaussian((at - v) / h)).sum::<f64>() / norm
}

fn kde_2d(xs: &[f64], ys: &[f64], (hx, hy): (f64, f64), (px, py): (f64, f64)) -> f64 {
    let norm = xs.len() as f64 * hx * hy * 2.0 * std::f64::consts::PI;
    xs.iter()
        .zip(ys)
        .map(|(x, y)| gaussian((px - x) / hx) * gaussian((py - y) / hy))
        .sum::<f64>()
        / norm
}

/// Calculate Pearson correlation coefficient
///
/// Returns a value between -1 and 1, or 0 when either side is constant.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return 0.0;
    }

    let n = x.len() as f64;

    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y.iter()).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = x.iter().map(|a| a * a).sum();
    let sum_y2: f64 = y.iter().map(|b| b * b).sum();

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x.powi(2)) * (n * sum_y2 - sum_y.powi(2))).sqrt();

    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::table::ComparativeRow;
    use chrono::NaiveDate;

    fn table(rows: &[[i64; 6]]) -> ComparativeTable {
        let rows = rows
            .iter()
            .enumerate()
            .map(|(i, v)| ComparativeRow {
                week: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap() + chrono::Duration::weeks(i as i64),
                covid_patients: v[0],
                covid_physicians: v[1],
                covid_claims: v[2],
                elective_patients: v[3],
                elective_physicians: v[4],
                elective_claims: v[5],
            })
            .collect();
        ComparativeTable { rows }
    }

    #[test]
    fn test_empty_table_fails() {
        let err = PairPlot::build(&ComparativeTable::default()).unwrap_err();
        assert_eq!(err, PlotError::NotEnoughObservations(0));
    }

    #[test]
    fn test_single_row_fails() {
        let err = PairPlot::build(&table(&[[100, 20, 50, 10, 2, 5]])).unwrap_err();
        assert_eq!(err, PlotError::NotEnoughObservations(1));
    }

    #[test]
    fn test_constant_column_skips_only_its_cells() {
        // elective_physicians stays at 2 while every other column varies
        let plot = PairPlot::build(&table(&[
            [100, 20, 50, 10, 2, 5],
            [120, 25, 61, 8, 2, 4],
            [90, 18, 40, 14, 2, 9],
        ]))
        .unwrap();

        assert_eq!(plot.cells.len(), 36);
        let constant = 4;
        for cell in &plot.cells {
            let touches_constant = cell.row == constant || cell.col == constant;
            match &cell.content {
                CellContent::Skipped { reason } => {
                    assert!(touches_constant, "unexpected skip at {:?}", (cell.row, cell.col));
                    assert_eq!(reason, "column 'elective_physicians' has zero variance");
                }
                other => assert!(!touches_constant, "expected skip, got {other:?}"),
            }
        }

        assert!(matches!(plot.cell(0, 0).unwrap().content, CellContent::Density { .. }));
        assert!(matches!(plot.cell(5, 3).unwrap().content, CellContent::Joint { .. }));
    }

    #[test]
    fn test_grid_layout() {
        let plot = PairPlot::build(&table(&[
            [100, 20, 50, 10, 2, 5],
            [120, 25, 61, 8, 3, 4],
            [90, 18, 40, 14, 4, 9],
        ]))
        .unwrap();

        assert_eq!(plot.columns.len(), 6);
        assert_eq!(plot.cells.len(), 36);
        assert_eq!(plot.observations, 3);

        match &plot.cell(2, 2).unwrap().content {
            CellContent::Density { x, density } => {
                assert_eq!(x.len(), CURVE_POINTS);
                assert_eq!(density.len(), CURVE_POINTS);
            }
            other => panic!("expected density on diagonal, got {other:?}"),
        }

        match &plot.cell(0, 3).unwrap().content {
            CellContent::Joint { x, y, density, correlation } => {
                assert_eq!(x.len(), GRID_POINTS);
                assert_eq!(y.len(), GRID_POINTS);
                assert_eq!(density.len(), GRID_POINTS);
                assert!(correlation.abs() <= 1.0);
            }
            other => panic!("expected joint cell, got {other:?}"),
        }
    }

    #[test]
    fn test_density_integrates_to_one() {
        let values = vec![1.0, 2.0, 2.5, 4.0, 7.0];
        let h = std_dev(&values) * (values.len() as f64).powf(-0.2);
        let x = support(&values, h, 400);
        let step = x[1] - x[0];

        let area: f64 = x.iter().map(|&p| kde_1d(&values, h, p) * step).sum();
        assert!((area - 1.0).abs() < 0.02, "area was {area}");
    }

    #[test]
    fn test_pearson_correlation_perfect() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![2.0, 4.0, 6.0, 8.0, 10.0];
        assert!((pearson_correlation(&x, &y) - 1.0).abs() < 0.001);

        let y = vec![10.0, 8.0, 6.0, 4.0, 2.0];
        assert!((pearson_correlation(&x, &y) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let plot = PairPlot::build(&table(&[
            [100, 20, 50, 10, 2, 5],
            [120, 25, 61, 8, 3, 4],
        ]))
        .unwrap();

        let json = serde_json::to_string(&plot.cells[0]).unwrap();
        assert!(json.contains("\"kind\":\"density\""));
        let json = serde_json::to_string(&plot.cells[1]).unwrap();
        assert!(json.contains("\"kind\":\"joint\""));

        let skipped = CellContent::Skipped { reason: "column 'covid_claims' has zero variance".into() };
        let json = serde_json::to_string(&skipped).unwrap();
        assert!(json.contains("\"kind\":\"skipped\""));
    }
}
