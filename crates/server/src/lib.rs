//! HTTP surface and job orchestration.
//!
//! The binary in `main.rs` wires configuration, the store client and the
//! OCR engine into an [`state::AppState`] and serves [`routes::router`].
//! Splitting the crate this way keeps the whole surface drivable from
//! integration tests with in-memory stores.

pub mod config;
pub mod error;
pub mod routes;
pub mod runner;
pub mod state;

pub use config::Settings;
pub use runner::JobRunner;
pub use state::AppState;
