//! Shared Dioxus components and D3.js bridge for the ORTB dashboard.
//!
//! This crate provides:
//! - `js_bridge`: Rust wrappers for the D3.js map and table functions via `js_sys::eval()`,
//!   plus the runtime data fetches
//! - `state`: Reactive AppState with Dioxus Signals (page, map and raw-data selections)
//! - `selection`: Resolution of the session selections against the loaded data
//! - `tables`: Row and column JSON for the D3.js data tables
//! - `components`: Reusable RSX components (selectors, facets, metrics, containers, etc.)

pub mod js_bridge;
pub mod selection;
pub mod state;
pub mod tables;
pub mod components;
