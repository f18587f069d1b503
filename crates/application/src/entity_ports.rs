use async_trait::async_trait;
use metaform_core::{AppError, AppResult};
use metaform_domain::{EntityPayload, EntityRecord};

/// Remote operation kinds exposed by an entity gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOperation {
    /// Fetch every record of a collection.
    List,
    /// Create a record; the gateway assigns its id.
    Create,
    /// Replace a record.
    Update,
    /// Remove a record.
    Delete,
}

impl GatewayOperation {
    /// Returns a stable name for logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Returns the fixed user-facing failure message for the operation.
    #[must_use]
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::List => "Failed to fetch",
            Self::Create => "Failed to create",
            Self::Update => "Failed to update",
            Self::Delete => "Failed to delete",
        }
    }

    /// Returns the network error reported for a failed operation.
    #[must_use]
    pub fn failure(&self) -> AppError {
        AppError::Network(self.failure_message().to_owned())
    }
}

/// Port for the remote collaborator that persists entity records.
///
/// Implementations are stateless pass-throughs and report every failure as
/// [`GatewayOperation::failure`].
#[async_trait]
pub trait EntityGateway: Send + Sync {
    /// Fetches every record of an entity type.
    async fn list(&self, entity_type: &str) -> AppResult<Vec<EntityRecord>>;

    /// Creates a record and returns it with its assigned id.
    async fn create(&self, entity_type: &str, payload: &EntityPayload) -> AppResult<EntityRecord>;

    /// Replaces a record and returns the stored version.
    async fn update(
        &self,
        entity_type: &str,
        id: &str,
        payload: &EntityPayload,
    ) -> AppResult<EntityRecord>;

    /// Removes a record.
    async fn delete(&self, entity_type: &str, id: &str) -> AppResult<()>;
}
