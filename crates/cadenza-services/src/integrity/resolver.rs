use std::sync::Arc;

use cadenza_core::{AppError, DependentRecord, DependentRule};
use cadenza_db::CatalogStore;
use uuid::Uuid;

/// Finds the records of one dependent collection that reference a parent.
#[derive(Clone)]
pub struct DependencyResolver {
    catalog: Arc<dyn CatalogStore>,
}

impl DependencyResolver {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    /// One lookup for one rule, ordered by id. An empty list means no dependents.
    #[tracing::instrument(
        skip(self, rule),
        fields(dependent = %rule.dependent, field = rule.field)
    )]
    pub async fn find_dependents(
        &self,
        rule: &DependentRule,
        parent_id: Uuid,
    ) -> Result<Vec<DependentRecord>, AppError> {
        let dependents = self.catalog.find_dependents(rule, parent_id).await?;
        tracing::debug!(count = dependents.len(), "Resolved dependents");
        Ok(dependents)
    }
}
