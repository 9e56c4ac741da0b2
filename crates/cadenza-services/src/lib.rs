//! Cadenza Services Layer
//!
//! Coordination that spans the catalog and the asset store: referential
//! integrity on delete, and collection of assets no record points at. Route
//! handlers stay thin and call into these services.

pub mod cleanup;
pub mod integrity;

pub use cleanup::OrphanSweeper;
pub use integrity::{
    rules_for, CascadeDeleteCoordinator, DeletionOutcome, DeletionReport, DependencyResolver,
};
