//! Per-state datasets
//!
//! - **types**: `DatasetRow` and `Dataset`
//! - **loader**: CSV parsing and the per-state read-through cache
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use persimmon::dataset::{DatasetConfig, DatasetLoader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let loader = DatasetLoader::new(DatasetConfig::new("./data"));
//!
//!     let dataset = loader.load("CA").await?;
//!     println!("{:?}", dataset.shape());
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod loader;
pub mod types;

pub use error::{DatasetError, DatasetResult};
pub use loader::{parse_dataset, parse_week, DatasetConfig, DatasetLoader};
pub use types::{Dataset, DatasetRow, COLUMNS};
