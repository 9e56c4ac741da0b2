//! Cadenza Database Layer
//!
//! Catalog persistence behind the [`CatalogStore`] trait, with a PostgreSQL
//! implementation for production and an in-memory one for tests and tooling.

pub mod db;

pub use db::{CatalogStore, InMemoryCatalogStore, PgCatalogStore};
