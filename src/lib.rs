//! Asynchronous data-orchestration layer for a movie discovery UI.
//!
//! This crate owns the control flow between the user's input stream and the
//! remote services a discovery page talks to: the movie-metadata API, the
//! trending-searches counter table, and the browser-only video embed widget.
//! Everything presentational lives in the consuming shell; this layer only
//! debounces input, cancels superseded requests, composes dependent fetches,
//! and publishes state machines over watch channels.

pub mod config;
pub mod error;
pub mod flow;
pub mod models;
pub mod orchestrators;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
