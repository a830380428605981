//! Dashboard Session
//!
//! One render pass: load the selected state's dataset, derive the views and
//! assemble everything the main panel shows. The pass is a pure function of
//! the selection and the (cached, immutable) dataset, so re-rendering on
//! every selection change is just calling [`DashboardSession::render`] again.

use crate::dataset::{Dataset, DatasetError, DatasetLoader, DatasetRow};
use crate::selection::{Selection, COVID};
use crate::view::{
    ComparativeRow, ComparativeTable, LineChart, PairPlot, ScatterChart, ViewError, ViewTable,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

pub const TITLE: &str = "Persimmon";

pub const TAGLINE: &str =
    "Optimizing physician distribution between recurring elective surgeries and an ongoing pandemic";

/// Dataset rows shown in the raw preview
pub const PREVIEW_ROWS: usize = 10;

/// Comparative rows shown above the pair plot
pub const COMPARATIVE_PREVIEW_ROWS: usize = 5;

/// Errors that abort a render
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    View(#[from] ViewError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Heading and description of a persona section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersonaSection {
    pub heading: String,
    pub description: String,
    /// Points the description lists, if any
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bullets: Vec<String>,
}

impl PersonaSection {
    pub fn patient() -> Self {
        Self {
            heading: "Patient".to_string(),
            description: "A patient picks a state, an age group and the elective procedure \
                they are planning. The charts below trace that procedure week by week and set \
                it against COVID activity for the same age group, so the patient can judge \
                when demand on physicians is likely to ease before submitting a claim."
                .to_string(),
            bullets: Vec::new(),
        }
    }

    pub fn clinician() -> Self {
        Self {
            heading: "Clinician".to_string(),
            description: "A clinic or hospital administration will be able to compare how \
                elective procedures were prioritised against COVID across its branches and \
                age groups, filtered by:"
                .to_string(),
            bullets: vec![
                "in-patient vs. out-patient".to_string(),
                "coverage scheme".to_string(),
                "state-wise vs. aggregate".to_string(),
            ],
        }
    }
}

/// Outcome of the pair plot: drawn, or reported inline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CorrelationPanel {
    Plot { plot: PairPlot },
    Error { message: String },
}

impl CorrelationPanel {
    pub fn is_error(&self) -> bool {
        matches!(self, CorrelationPanel::Error { .. })
    }
}

/// Everything the main panel shows for one selection, in display order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardView {
    pub title: String,
    pub tagline: String,
    pub selection: Selection,
    /// First rows of the raw dataset
    pub preview: Vec<DatasetRow>,
    /// (rows, columns) of the raw dataset
    pub shape: (usize, usize),
    pub status: String,
    pub patient: PersonaSection,
    pub success: String,
    /// Rows in the elective view
    pub elective_rows: usize,
    /// Rows in the COVID view
    pub covid_rows: usize,
    pub line_chart: LineChart,
    pub scatter_chart: ScatterChart,
    pub comparison_heading: String,
    pub comparison_note: String,
    pub comparative_preview: Vec<ComparativeRow>,
    pub comparative_rows: usize,
    pub correlation: CorrelationPanel,
    pub clinician: PersonaSection,
}

/// Renders dashboard views against a shared dataset cache
#[derive(Clone)]
pub struct DashboardSession {
    loader: Arc<DatasetLoader>,
}

impl DashboardSession {
    pub fn new(loader: Arc<DatasetLoader>) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &Arc<DatasetLoader> {
        &self.loader
    }

    /// Load the selected state and compose its view
    ///
    /// A missing or malformed dataset is fatal; a pair plot that cannot be
    /// drawn is not.
    pub async fn render(&self, selection: &Selection) -> SessionResult<DashboardView> {
        let dataset = self.loader.load(&selection.state).await?;
        compose(&dataset, selection)
    }
}

/// Compose the view for a selection over an already loaded dataset
pub fn compose(dataset: &Dataset, selection: &Selection) -> SessionResult<DashboardView> {
    let elective = ViewTable::filter(dataset, &selection.age_group, &selection.elective);
    let covid = ViewTable::filter(dataset, &selection.age_group, COVID);
    let comparative = ComparativeTable::join(&covid, &elective)?;

    let correlation = match PairPlot::build(&comparative) {
        Ok(plot) => CorrelationPanel::Plot { plot },
        Err(e) => {
            tracing::warn!(
                state = %selection.state,
                age_group = %selection.age_group,
                elective = %selection.elective,
                error = %e,
                "Pair plot unavailable"
            );
            CorrelationPanel::Error {
                message: format!("Cannot plot comparison {}", e),
            }
        }
    };

    let (rows, cols) = dataset.shape();

    Ok(DashboardView {
        title: TITLE.to_string(),
        tagline: TAGLINE.to_string(),
        selection: selection.clone(),
        preview: dataset.head(PREVIEW_ROWS).to_vec(),
        shape: (rows, cols),
        status: format!("Loaded {} data! [({}, {}) matrix]", selection.state, rows, cols),
        patient: PersonaSection::patient(),
        success: format!(
            "Visualizing patient approach for {} (age {})",
            selection.elective, selection.age_group
        ),
        elective_rows: elective.len(),
        covid_rows: covid.len(),
        line_chart: LineChart::from_view(&elective),
        scatter_chart: ScatterChart::from_view(&elective),
        comparison_heading: format!("Covid vs. {} Correlation", selection.elective),
        comparison_note: "Following is the overlapping data that we have; a bivariate plot \
            shows how the correlation changes across time"
            .to_string(),
        comparative_preview: comparative.head(COMPARATIVE_PREVIEW_ROWS).to_vec(),
        comparative_rows: comparative.len(),
        correlation,
        clinician: PersonaSection::clinician(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetConfig;
    use crate::view::CellContent;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn week(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, m, d).unwrap()
    }

    fn scenario() -> Dataset {
        Dataset::new(
            "CA",
            vec![
                DatasetRow::new("50-64", "CATARACT", week(1, 1), 10, 2, 5),
                DatasetRow::new("50-64", "COVID", week(1, 1), 100, 20, 50),
            ],
        )
    }

    #[test]
    fn test_single_week_scenario() {
        let selection = Selection::new("CA", "50-64", "CATARACT");
        let view = compose(&scenario(), &selection).unwrap();

        assert_eq!(view.status, "Loaded CA data! [(2, 6) matrix]");
        assert_eq!(view.success, "Visualizing patient approach for CATARACT (age 50-64)");
        assert_eq!(view.comparison_heading, "Covid vs. CATARACT Correlation");

        assert_eq!(view.elective_rows, 1);
        assert_eq!(view.line_chart.weeks, vec![week(1, 1)]);
        assert_eq!(view.line_chart.series[0].values, vec![Some(10)]);
        assert_eq!(view.scatter_chart.points.len(), 1);

        assert_eq!(view.comparative_rows, 1);
        let row = view.comparative_preview[0];
        assert_eq!(row.week, week(1, 1));
        assert_eq!(row.values(), [100, 20, 50, 10, 2, 5]);

        match &view.correlation {
            CorrelationPanel::Error { message } => {
                assert!(message.starts_with("Cannot plot comparison "));
                assert!(message.contains("not enough observations"));
            }
            other => panic!("expected inline error, got {other:?}"),
        }
    }

    #[test]
    fn test_absent_pair_renders_empty() {
        let selection = Selection::new("CA", "18-29", "CABG");
        let view = compose(&scenario(), &selection).unwrap();

        assert_eq!(view.elective_rows, 0);
        assert!(view.line_chart.is_empty());
        assert!(view.scatter_chart.points.is_empty());
        assert_eq!(view.comparative_rows, 0);
        assert!(view.correlation.is_error());
    }

    #[test]
    fn test_covid_selection_degenerate() {
        let mut dataset = scenario();
        dataset
            .rows
            .push(DatasetRow::new("50-64", "COVID", week(1, 8), 80, 15, 40));

        let view = compose(&dataset, &Selection::new("CA", "50-64", COVID)).unwrap();

        assert_eq!(view.elective_rows, view.covid_rows);
        assert_eq!(view.comparative_rows, 2);
        for row in &view.comparative_preview {
            assert_eq!(row.covid_patients, row.elective_patients);
        }
        // Identical columns still have spread, so the plot is drawn
        assert!(!view.correlation.is_error());
    }

    #[test]
    fn test_plot_drawn_with_enough_overlap() {
        let dataset = Dataset::new(
            "NY",
            vec![
                DatasetRow::new("65+", "CABG", week(1, 1), 10, 2, 5),
                DatasetRow::new("65+", "CABG", week(1, 8), 14, 3, 4),
                DatasetRow::new("65+", "CABG", week(1, 15), 9, 5, 8),
                DatasetRow::new("65+", "COVID", week(1, 1), 100, 20, 50),
                DatasetRow::new("65+", "COVID", week(1, 8), 130, 24, 60),
                DatasetRow::new("65+", "COVID", week(1, 15), 90, 19, 45),
            ],
        );

        let view = compose(&dataset, &Selection::new("NY", "65+", "CABG")).unwrap();
        match view.correlation {
            CorrelationPanel::Plot { plot } => assert_eq!(plot.observations, 3),
            other => panic!("expected plot, got {other:?}"),
        }
    }

    #[test]
    fn test_constant_physicians_still_plotted() {
        let dataset = Dataset::new(
            "WA",
            vec![
                DatasetRow::new("30-39", "HYSTEROSCOPY", week(1, 1), 10, 2, 5),
                DatasetRow::new("30-39", "HYSTEROSCOPY", week(1, 8), 14, 2, 4),
                DatasetRow::new("30-39", "HYSTEROSCOPY", week(1, 15), 9, 2, 8),
                DatasetRow::new("30-39", "COVID", week(1, 1), 100, 20, 50),
                DatasetRow::new("30-39", "COVID", week(1, 8), 130, 24, 60),
                DatasetRow::new("30-39", "COVID", week(1, 15), 90, 19, 45),
            ],
        );

        let view = compose(&dataset, &Selection::new("WA", "30-39", "HYSTEROSCOPY")).unwrap();
        let plot = match view.correlation {
            CorrelationPanel::Plot { plot } => plot,
            other => panic!("expected plot, got {other:?}"),
        };

        assert_eq!(view.comparative_rows, 3);
        assert!(matches!(
            plot.cell(4, 4).unwrap().content,
            CellContent::Skipped { .. }
        ));
        assert!(matches!(
            plot.cell(0, 0).unwrap().content,
            CellContent::Density { .. }
        ));
    }

    #[test]
    fn test_full_option_grid_composes() {
        let mut rows = Vec::new();
        for (a, age) in crate::selection::AGE_GROUPS.iter().enumerate() {
            for (e, elective) in crate::selection::ELECTIVES.iter().enumerate() {
                for w in 0..4u32 {
                    let base = ((a + 1) * (e + 3) * (w as usize + 11) % 97) as i64;
                    rows.push(DatasetRow::new(
                        *age,
                        *elective,
                        week(1, 1 + 7 * w),
                        base + 40,
                        base / 3 + 5,
                        base * 2 + 17,
                    ));
                }
            }
        }
        let dataset = Dataset::new("CA", rows);

        let view = compose(&dataset, &Selection::new("CA", "50-64", "CATARACT")).unwrap();
        assert_eq!(view.covid_rows, 4);
        assert_eq!(view.comparative_rows, 4);
        assert!(!view.correlation.is_error());
    }

    #[test]
    fn test_preview_limits() {
        let rows = (0..20)
            .map(|i| {
                DatasetRow::new(
                    "40-49",
                    if i % 2 == 0 { "CATARACT" } else { COVID },
                    week(1, 1) + chrono::Duration::weeks(i / 2),
                    10 + i,
                    1 + i % 3,
                    5 + i % 4,
                )
            })
            .collect();
        let dataset = Dataset::new("AK", rows);

        let view = compose(&dataset, &Selection::new("AK", "40-49", "CATARACT")).unwrap();
        assert_eq!(view.preview.len(), PREVIEW_ROWS);
        assert_eq!(view.comparative_rows, 10);
        assert_eq!(view.comparative_preview.len(), COMPARATIVE_PREVIEW_ROWS);
    }

    #[test]
    fn test_duplicate_weeks_are_fatal() {
        let mut dataset = scenario();
        dataset
            .rows
            .push(DatasetRow::new("50-64", "CATARACT", week(1, 1), 11, 2, 5));

        let err = compose(&dataset, &Selection::new("CA", "50-64", "CATARACT")).unwrap_err();
        assert!(matches!(err, SessionError::View(ViewError::DuplicateWeek { .. })));
    }

    #[tokio::test]
    async fn test_render_unknown_state_is_fatal() {
        let dir = tempdir().unwrap();
        let session = DashboardSession::new(Arc::new(DatasetLoader::new(DatasetConfig::new(
            dir.path(),
        ))));

        let err = session
            .render(&Selection::new("ZZ", "50-64", "CATARACT"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Dataset(DatasetError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_render_from_disk() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("dataset_CA.csv"),
            ",state,age,elective,week,patients,physicians,claims
0,CA,50-64,CATARACT,2021-01-01,10,2,5
1,CA,50-64,COVID,2021-01-01,100,20,50
",
        )
        .unwrap();

        let session = DashboardSession::new(Arc::new(DatasetLoader::new(DatasetConfig::new(
            dir.path(),
        ))));
        let selection = Selection::new("CA", "50-64", "CATARACT");

        let first = session.render(&selection).await.unwrap();
        let second = session.render(&selection).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.shape, (2, 6));
    }
}
