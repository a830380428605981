//! Persimmon Dashboard
//!
//! Elective surgery vs. COVID dashboard built with Leptos (WASM).
//!
//! # Features
//!
//! - State, age group and elective choosers in a sidebar
//! - Weekly line and scatter charts for the chosen procedure
//! - COVID vs. elective pair plot with correlation coefficients
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. Every view is composed by the Persimmon API; the frontend
//! only fetches it and draws it.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
