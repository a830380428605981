//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! The dashboard view itself is serialized straight from
//! [`crate::session::DashboardView`].

use crate::dataset::DatasetRow;
use crate::selection::{Selection, SelectionOptions};
use serde::{Deserialize, Serialize};

// ============================================
// DASHBOARD DTOs
// ============================================

/// Dashboard query parameters; omitted members take the default selection
#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub age_group: Option<String>,
    #[serde(default)]
    pub elective: Option<String>,
}

impl DashboardParams {
    pub fn into_selection(self) -> Selection {
        let default = Selection::default();
        Selection {
            state: self.state.unwrap_or(default.state),
            age_group: self.age_group.unwrap_or(default.age_group),
            elective: self.elective.unwrap_or(default.elective),
        }
    }
}

/// Option sets for the three choosers
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    #[serde(flatten)]
    pub options: SelectionOptions,
    /// Selection a new session starts with
    pub default: Selection,
}

// ============================================
// DATASET DTOs
// ============================================

/// Dataset preview query parameters
#[derive(Debug, Deserialize)]
pub struct DatasetParams {
    /// Rows to return (default: 10, max: 1000)
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Raw dataset preview
#[derive(Debug, Serialize)]
pub struct DatasetPreviewResponse {
    pub state: String,
    /// (rows, columns) of the whole dataset
    pub shape: (usize, usize),
    pub columns: Vec<String>,
    pub rows: Vec<DatasetRow>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy or degraded
    pub status: String,
    /// Data directory status: ok or missing
    pub data_dir: String,
    /// States already loaded into the cache
    pub cached_states: Vec<String>,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
