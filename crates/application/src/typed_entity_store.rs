use std::marker::PhantomData;

use metaform_core::{AppError, AppResult};
use metaform_domain::{EntityPayload, EntityRecord, EntityType};
use serde::Serialize;

use crate::EntityStore;

/// Statically shaped view of one collection of an [`EntityStore`].
///
/// The underlying store stays keyed by name; this facade only adds serde
/// conversion between records and `E`.
pub struct TypedEntityStore<E> {
    pub(crate) store: EntityStore,
    pub(crate) entity: PhantomData<fn() -> E>,
}

impl<E> Clone for TypedEntityStore<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            entity: PhantomData,
        }
    }
}

impl<E: EntityType> TypedEntityStore<E> {
    /// Fetches the collection.
    pub async fn list(&self) -> AppResult<()> {
        self.store.list(E::COLLECTION).await
    }

    /// Returns the cached records, or `None` before the first list.
    pub async fn records(&self) -> AppResult<Option<Vec<E>>> {
        let Some(collection) = self.store.collection(E::COLLECTION).await else {
            return Ok(None);
        };

        collection
            .items
            .iter()
            .map(decode::<E>)
            .collect::<AppResult<Vec<E>>>()
            .map(Some)
    }

    /// Creates a record from any serializable draft.
    pub async fn create<D: Serialize>(&self, draft: &D) -> AppResult<E> {
        let record = self.store.create(E::COLLECTION, encode(draft)?).await?;
        decode(&record)
    }

    /// Replaces a record from any serializable draft.
    pub async fn update<D: Serialize>(&self, id: &str, draft: &D) -> AppResult<E> {
        let record = self.store.update(E::COLLECTION, id, encode(draft)?).await?;
        decode(&record)
    }

    /// Deletes a record.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.store.delete(E::COLLECTION, id).await
    }
}

fn encode<D: Serialize>(draft: &D) -> AppResult<EntityPayload> {
    let value = serde_json::to_value(draft).map_err(|error| {
        AppError::Validation(format!("failed to serialize entity payload: {error}"))
    })?;
    EntityPayload::from_value(value)
}

fn decode<E: EntityType>(record: &EntityRecord) -> AppResult<E> {
    serde_json::from_value(record.to_json()).map_err(|error| {
        AppError::Validation(format!(
            "record '{}' does not match entity type '{}': {error}",
            record.id(),
            E::COLLECTION
        ))
    })
}
