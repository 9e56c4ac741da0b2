//! Cadenza API Library
//!
//! The admin HTTP surface over the catalog: uploads that go through the ingest
//! pipeline, deletions that go through the cascade coordinator, and read-only
//! serving of stored assets.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use error::{ConflictResponse, ErrorResponse, HttpAppError};
pub use state::AppState;
