//! API Client
//!
//! HTTP access to the Persimmon REST API.

pub mod client;

pub use client::*;
