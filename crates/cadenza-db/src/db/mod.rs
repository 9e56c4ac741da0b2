//! Catalog repositories
//
// Store abstraction used by the integrity engine, the sweeper and the API
pub mod catalog;
//
// Implementations
pub mod memory;
pub mod postgres;

pub use catalog::CatalogStore;
pub use memory::InMemoryCatalogStore;
pub use postgres::PgCatalogStore;
