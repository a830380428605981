//! # Persimmon
//!
//! Elective surgery vs. COVID dashboard over per-state CSV datasets.
//!
//! A user picks a state, an age group and an elective procedure; Persimmon
//! loads that state's dataset (once per process), slices it down to the
//! chosen procedure and to COVID for the same age group, aligns the two on
//! week and prepares the line, scatter and pair-plot charts the dashboard
//! draws.
//!
//! ## Modules
//!
//! - [`dataset`]: CSV loading and the per-state cache
//! - [`selection`]: The option sets and the current selection triple
//! - [`view`]: View tables, comparative join and chart specifications
//! - [`session`]: One full render pass for a selection
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use persimmon::dataset::{DatasetConfig, DatasetLoader};
//! use persimmon::selection::Selection;
//! use persimmon::session::{CorrelationPanel, DashboardSession};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let loader = Arc::new(DatasetLoader::new(DatasetConfig::new("./data")));
//!     let session = DashboardSession::new(loader);
//!
//!     let view = session
//!         .render(&Selection::new("CA", "50-64", "CATARACT"))
//!         .await?;
//!     println!("{}", view.status);
//!
//!     if let CorrelationPanel::Error { message } = &view.correlation {
//!         println!("{}", message);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dataset;
pub mod selection;
pub mod session;
pub mod view;

// Re-export top-level types for convenience
pub use dataset::{Dataset, DatasetConfig, DatasetError, DatasetLoader, DatasetResult, DatasetRow};

pub use selection::{Selection, SelectionOptions, AGE_GROUPS, COVID, ELECTIVES, STATES};

pub use view::{
    ComparativeRow, ComparativeTable, LineChart, PairPlot, PlotError, ScatterChart, ViewError,
    ViewRow, ViewTable,
};

pub use session::{
    compose, CorrelationPanel, DashboardSession, DashboardView, SessionError, SessionResult,
};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{
    generate_default_config, ApiConfig as ConfigApiConfig, Config, ConfigError, DataConfig,
    LoggingConfig,
};
