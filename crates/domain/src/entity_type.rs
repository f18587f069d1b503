use metaform_core::AppResult;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::FieldConfiguration;

/// Compile-time tag binding a record shape to its collection and field configuration.
///
/// Implementors are the full record type (including `id`); the generic store
/// still only sees the collection name.
pub trait EntityType: Serialize + DeserializeOwned + Send + Sync {
    /// Collection name used as the store key and REST path segment.
    const COLLECTION: &'static str;

    /// Returns the field configuration describing the entity.
    fn field_configuration() -> AppResult<FieldConfiguration>;
}
