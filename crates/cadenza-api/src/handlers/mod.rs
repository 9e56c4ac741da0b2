pub mod album;
pub mod artist;
pub mod delete;
pub mod form;
pub mod genre;
pub mod health;
pub mod track;

use crate::error::HttpAppError;
use cadenza_core::{AppError, EntityKind};
use cadenza_db::CatalogStore;
use serde::Deserialize;
use uuid::Uuid;

/// `?id=` selector of the record a PATCH applies to.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Uuid,
}

/// Reject ids that do not name an existing record of `kind`.
pub(crate) async fn ensure_exists(
    catalog: &dyn CatalogStore,
    kind: EntityKind,
    ids: &[Uuid],
) -> Result<(), HttpAppError> {
    for id in ids {
        if catalog.find_entry(kind, *id).await?.is_none() {
            return Err(AppError::InvalidInput(format!("{} {} does not exist", kind, id)).into());
        }
    }
    Ok(())
}
