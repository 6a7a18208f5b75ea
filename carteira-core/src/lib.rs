//! Core shared library for the Carteira services.
//!
//! This crate exposes reusable primitives that the timeline service
//! depends on: common errors, configuration loading, database
//! abstractions, application settings and logging setup.

pub mod config;
pub mod db;
pub mod errors;
pub mod logging;
pub mod settings;

pub use errors::{CarteiraError, Result as CoreResult};
pub use settings::{AppSettings, TimelineLayout};
