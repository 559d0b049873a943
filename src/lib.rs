//! Quote Engine library crate.
//!
//! This crate exposes the managed-services quote pricing engine and
//! its HTTP API as reusable modules.  External applications may depend
//! on the `quote_engine` crate and call `engine::calculate_quote`
//! directly or embed the API via `api::build_router`.

pub mod models;
pub mod rates;
pub mod setup;
pub mod legacy;
pub mod engine;
pub mod error;
pub mod config;
pub mod logging;
pub mod api;
