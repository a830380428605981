//! Global Application State
//!
//! Reactive state management using Leptos signals, plus the JSON shapes
//! returned by the Persimmon API.

use chrono::NaiveDate;
use leptos::*;
use serde::{Deserialize, Serialize};

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Chooser option sets, once fetched
    pub options: RwSignal<Option<SelectionOptions>>,
    /// Current (state, age group, elective) triple
    pub selection: RwSignal<Selection>,
    /// Global loading state
    pub loading: RwSignal<bool>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        options: create_rw_signal(None),
        selection: create_rw_signal(Selection::default()),
        loading: create_rw_signal(false),
        error: create_rw_signal(None),
    };

    provide_context(state);
}

/// Fetch the global state from context
pub fn use_global_state() -> GlobalState {
    use_context::<GlobalState>().expect("GlobalState not found")
}

impl GlobalState {
    pub fn set_state(&self, state: String) {
        self.selection.update(|s| s.state = state);
    }

    pub fn set_age_group(&self, age_group: String) {
        self.selection.update(|s| s.age_group = age_group);
    }

    pub fn set_elective(&self, elective: String) {
        self.selection.update(|s| s.elective = elective);
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }
}

// ============ Selection ============

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub state: String,
    pub age_group: String,
    pub elective: String,
}

impl Default for Selection {
    /// Matches the server's default until the option sets arrive
    fn default() -> Self {
        Self {
            state: "AK".to_string(),
            age_group: "40-49".to_string(),
            elective: "CYSTOSCOPY".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SelectionOptions {
    pub states: Vec<String>,
    pub age_groups: Vec<String>,
    pub electives: Vec<String>,
    pub default: Selection,
}

// ============ Dashboard view ============

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DatasetRow {
    pub age: String,
    pub elective: String,
    pub week: NaiveDate,
    pub patients: Option<i64>,
    pub physicians: Option<i64>,
    pub claims: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PersonaSection {
    pub heading: String,
    pub description: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct LineChart {
    pub weeks: Vec<NaiveDate>,
    pub series: Vec<LineSeries>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub values: Vec<Option<i64>>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ScatterEncoding {
    pub x: String,
    pub y: String,
    pub size: String,
    pub color: String,
    pub tooltip: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct ScatterPoint {
    pub week: NaiveDate,
    pub patients: i64,
    pub claims: i64,
    pub physicians: i64,
}

impl ScatterPoint {
    /// Value of a tooltip column by name
    pub fn field(&self, name: &str) -> Option<i64> {
        match name {
            "patients" => Some(self.patients),
            "claims" => Some(self.claims),
            "physicians" => Some(self.physicians),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ScatterChart {
    pub encoding: ScatterEncoding,
    pub points: Vec<ScatterPoint>,
    pub interactive: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
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

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PairPlot {
    pub columns: Vec<String>,
    pub observations: usize,
    pub cells: Vec<PairCell>,
}

impl PairPlot {
    pub fn cell(&self, row: usize, col: usize) -> Option<&PairCell> {
        self.cells.get(row * self.columns.len() + col)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PairCell {
    pub row: usize,
    pub col: usize,
    #[serde(flatten)]
    pub content: CellContent,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellContent {
    Density {
        x: Vec<f64>,
        density: Vec<f64>,
    },
    Joint {
        correlation: f64,
        x: Vec<f64>,
        y: Vec<f64>,
        density: Vec<Vec<f64>>,
    },
    Skipped {
        reason: String,
    },
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CorrelationPanel {
    Plot { plot: PairPlot },
    Error { message: String },
}

/// Everything the main panel shows for one selection, in display order
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DashboardView {
    pub title: String,
    pub tagline: String,
    pub selection: Selection,
    pub preview: Vec<DatasetRow>,
    pub shape: (usize, usize),
    pub status: String,
    pub patient: PersonaSection,
    pub success: String,
    pub elective_rows: usize,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_default_matches_server() {
        let selection = Selection::default();
        assert_eq!(selection.state, "AK");
        assert_eq!(selection.age_group, "40-49");
        assert_eq!(selection.elective, "CYSTOSCOPY");
    }

    #[test]
    fn test_correlation_panel_error_shape() {
        let json = r#"{"status":"error","message":"Cannot plot comparison not enough observations: 1"}"#;
        let panel: CorrelationPanel = serde_json::from_str(json).unwrap();
        assert!(matches!(panel, CorrelationPanel::Error { .. }));
    }

    #[test]
    fn test_pair_cell_flattened_content() {
        let json = r#"{"row":0,"col":1,"kind":"joint","correlation":0.5,"x":[0.0],"y":[1.0],"density":[[0.2]]}"#;
        let cell: PairCell = serde_json::from_str(json).unwrap();
        match cell.content {
            CellContent::Joint { correlation, .. } => assert_eq!(correlation, 0.5),
            _ => panic!("expected joint cell"),
        }
    }

    #[test]
    fn test_pair_cell_skipped_content() {
        let json = r#"{"row":4,"col":4,"kind":"skipped","reason":"column 'elective_physicians' has zero variance"}"#;
        let cell: PairCell = serde_json::from_str(json).unwrap();
        assert!(matches!(cell.content, CellContent::Skipped { .. }));
    }

    #[test]
    fn test_scatter_point_field() {
        let point = ScatterPoint {
            week: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            patients: 10,
            claims: 5,
            physicians: 2,
        };
        assert_eq!(point.field("claims"), Some(5));
        assert_eq!(point.field("week"), None);
    }
}
