//! Cascade delete coordinator.
//!
//! Deletion of a catalog entity runs through these states:
//!
//! ```text
//! ResolvingDependents -> Blocked
//! ResolvingDependents -> Cascading -> StorageCleanup -> Done
//! ```
//!
//! A missing parent fails with `NotFound` before any dependent lookup. Records
//! are always removed before storage, and the parent's asset is removed last.

use std::sync::Arc;

use cadenza_core::{AppError, DeleteRequest, DependentConflict, EntityKind};
use cadenza_db::CatalogStore;
use cadenza_storage::AssetStore;
use serde::Serialize;
use uuid::Uuid;

use super::resolver::DependencyResolver;
use super::table::rules_for;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CascadeState {
    ResolvingDependents,
    Blocked,
    Cascading,
    StorageCleanup,
    Done,
}

impl CascadeState {
    fn as_str(&self) -> &'static str {
        match self {
            CascadeState::ResolvingDependents => "resolving_dependents",
            CascadeState::Blocked => "blocked",
            CascadeState::Cascading => "cascading",
            CascadeState::StorageCleanup => "storage_cleanup",
            CascadeState::Done => "done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionReport {
    pub entity: EntityKind,
    pub id: Uuid,
    /// Dependent records removed by a forced cascade, at any depth.
    pub removed_dependents: usize,
    /// False when the parent's asset could not be removed; the record is gone
    /// regardless and the orphan sweeper picks the asset up later.
    pub storage_removed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    /// Dependents exist and the request was not forced. Nothing was changed.
    Blocked(DependentConflict),
    Deleted(DeletionReport),
}

#[derive(Clone)]
pub struct CascadeDeleteCoordinator {
    catalog: Arc<dyn CatalogStore>,
    resolver: DependencyResolver,
    store: Arc<dyn AssetStore>,
}

impl CascadeDeleteCoordinator {
    pub fn new(catalog: Arc<dyn CatalogStore>, store: Arc<dyn AssetStore>) -> Self {
        Self {
            resolver: DependencyResolver::new(Arc::clone(&catalog)),
            catalog,
            store,
        }
    }

    #[tracing::instrument(skip(self, request), fields(entity = %kind, id = %request.id, force = request.force))]
    pub async fn delete(
        &self,
        kind: EntityKind,
        request: DeleteRequest,
    ) -> Result<DeletionOutcome, AppError> {
        let id = request.id;
        let entry = self
            .catalog
            .find_entry(kind, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} not found", kind)))?;

        transition(CascadeState::ResolvingDependents);
        let mut removed_dependents = 0;
        for rule in rules_for(kind) {
            let dependents = self.resolver.find_dependents(rule, id).await?;
            if dependents.is_empty() {
                continue;
            }

            if !request.force {
                transition(CascadeState::Blocked);
                return Ok(DeletionOutcome::Blocked(DependentConflict {
                    dependent_type: rule.dependent,
                    dependents,
                }));
            }

            transition(CascadeState::Cascading);
            for dependent in dependents {
                removed_dependents += self.delete_records(rule.dependent, dependent.id).await?;
            }
        }

        if !self.catalog.delete_entity(kind, id).await? {
            tracing::debug!("Record already removed by a concurrent request");
        }

        transition(CascadeState::StorageCleanup);
        let storage_removed = match entry.asset_key.as_deref() {
            Some(key) => match self.store.remove_file_or_directory(key).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(
                        key = %key,
                        error = %e,
                        "Record deleted but its asset could not be removed"
                    );
                    false
                }
            },
            None => true,
        };

        transition(CascadeState::Done);
        tracing::info!(removed_dependents, storage_removed, "Entity deleted");

        Ok(DeletionOutcome::Deleted(DeletionReport {
            entity: kind,
            id,
            removed_dependents,
            storage_removed,
        }))
    }

    /// Remove a dependent record and, first, every record that depends on it.
    ///
    /// Records only; their assets are left for the orphan sweeper. Returns the
    /// number of records actually removed.
    async fn delete_records(&self, kind: EntityKind, id: Uuid) -> Result<usize, AppError> {
        // Post-order walk: a record is deleted only after its own dependents.
        let mut pending = vec![(kind, id, false)];
        let mut removed = 0;

        while let Some((kind, id, expanded)) = pending.pop() {
            if expanded {
                if self.catalog.delete_entity(kind, id).await? {
                    tracing::debug!(entity = %kind, id = %id, "Dependent record deleted");
                    removed += 1;
                }
                continue;
            }

            pending.push((kind, id, true));
            let mut children = Vec::new();
            for rule in rules_for(kind) {
                for dependent in self.resolver.find_dependents(rule, id).await? {
                    children.push((rule.dependent, dependent.id, false));
                }
            }
            pending.extend(children.into_iter().rev());
        }

        Ok(removed)
    }
}

fn transition(state: CascadeState) {
    tracing::debug!(state = state.as_str(), "Cascade state");
}
