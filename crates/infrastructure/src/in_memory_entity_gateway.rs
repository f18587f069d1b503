use std::collections::HashMap;

use async_trait::async_trait;
use metaform_application::{EntityGateway, GatewayOperation};
use metaform_core::AppResult;
use metaform_domain::{EntityPayload, EntityRecord};
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

/// In-memory entity gateway, for development and tests.
///
/// Mirrors the REST gateway's contract: ids are assigned on create, unknown
/// ids fail update and delete with the fixed operation message.
#[derive(Debug, Default)]
pub struct InMemoryEntityGateway {
    collections: RwLock<HashMap<String, Vec<EntityRecord>>>,
}

impl InMemoryEntityGateway {
    /// Creates an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a gateway pre-populated with records.
    #[must_use]
    pub fn with_records(entity_type: &str, records: Vec<EntityRecord>) -> Self {
        Self {
            collections: RwLock::new(HashMap::from([(entity_type.to_owned(), records)])),
        }
    }
}

#[async_trait]
impl EntityGateway for InMemoryEntityGateway {
    async fn list(&self, entity_type: &str) -> AppResult<Vec<EntityRecord>> {
        Ok(self
            .collections
            .read()
            .await
            .get(entity_type)
            .cloned()
            .unwrap_or_default())
    }

    async fn create(&self, entity_type: &str, payload: &EntityPayload) -> AppResult<EntityRecord> {
        let record = EntityRecord::from_payload(Uuid::new_v4().to_string(), payload.clone())?;
        self.collections
            .write()
            .await
            .entry(entity_type.to_owned())
            .or_default()
            .push(record.clone());

        Ok(record)
    }

    async fn update(
        &self,
        entity_type: &str,
        id: &str,
        payload: &EntityPayload,
    ) -> AppResult<EntityRecord> {
        let mut collections = self.collections.write().await;
        let Some(stored) = collections
            .get_mut(entity_type)
            .and_then(|records| records.iter_mut().find(|record| record.id() == id))
        else {
            warn!(entity = %entity_type, record_id = %id, "update of unknown record");
            return Err(GatewayOperation::Update.failure());
        };

        *stored = EntityRecord::from_payload(id, payload.clone())?;
        Ok(stored.clone())
    }

    async fn delete(&self, entity_type: &str, id: &str) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        let Some(records) = collections.get_mut(entity_type) else {
            return Err(GatewayOperation::Delete.failure());
        };

        let before = records.len();
        records.retain(|record| record.id() != id);
        if records.len() == before {
            warn!(entity = %entity_type, record_id = %id, "delete of unknown record");
            return Err(GatewayOperation::Delete.failure());
        }

        Ok(())
    }
}
