//! Referential integrity on delete

pub mod cascade;
pub mod resolver;
pub mod table;

pub use cascade::{CascadeDeleteCoordinator, DeletionOutcome, DeletionReport};
pub use resolver::DependencyResolver;
pub use table::rules_for;
