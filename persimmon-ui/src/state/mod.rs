//! State Management
//!
//! Global application state and the view types mirrored from the API.

pub mod global;

pub use global::{provide_global_state, use_global_state, GlobalState};
