//! UI Components
//!
//! Reusable Leptos components for the dashboard.

pub mod canvas;
pub mod data_table;
pub mod line_chart;
pub mod loading;
pub mod nav;
pub mod pair_plot;
pub mod scatter_chart;
pub mod sidebar;
pub mod toast;

pub use data_table::{ComparativeTable, DatasetTable};
pub use line_chart::LineChart;
pub use loading::ChartSkeleton;
pub use nav::Nav;
pub use pair_plot::PairPlot;
pub use scatter_chart::ScatterChart;
pub use sidebar::Sidebar;
pub use toast::{Banner, BannerVariant, Toast};
