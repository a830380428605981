//! View Composer
//!
//! Derives the tables and chart specifications shown for one selection:
//!
//! - **table**: week-indexed slices and the COVID vs. elective comparison
//! - **charts**: line and scatter chart specifications
//! - **pairplot**: pairwise correlation and density estimates
//! - **error**: Error types
//!
//! ```text
//! Dataset ─┬─ filter(age, elective) ─→ ViewTable ─→ LineChart, ScatterChart
//!          │                               │
//!          └─ filter(age, COVID) ─→ ViewTable ─┴─ join ─→ ComparativeTable ─→ PairPlot
//! ```

pub mod charts;
pub mod error;
pub mod pairplot;
pub mod table;

pub use charts::{LineChart, LineSeries, ScatterChart, ScatterEncoding, ScatterPoint};
pub use error::{PlotError, ViewError, ViewResult};
pub use pairplot::{pearson_correlation, CellContent, PairCell, PairPlot};
pub use table::{
    ComparativeRow, ComparativeTable, ViewRow, ViewTable, COMPARATIVE_COLUMNS, VIEW_COLUMNS,
};
