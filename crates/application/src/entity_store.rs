//! Asynchronous CRUD lifecycle state for any number of named collections.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use metaform_core::AppResult;
use metaform_domain::{EntityPayload, EntityRecord, EntityType};
use tokio::sync::RwLock;
use tracing::debug;

use crate::TypedEntityStore;
use crate::entity_ports::EntityGateway;

/// Cached records of one entity type plus fetch status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionState {
    /// Records in server order, unique by id.
    pub items: Vec<EntityRecord>,
    /// True while a list request is in flight.
    pub loading: bool,
    /// Message of the last failed list request.
    pub error: Option<String>,
}

impl CollectionState {
    /// Finds a record by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&EntityRecord> {
        self.items.iter().find(|item| item.id() == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }
}

#[derive(Debug, Default)]
struct CollectionEntry {
    state: CollectionState,
    // Sequence number of the most recently issued list request.
    latest_list: u64,
    // Bumped on every create, update or delete that succeeds.
    revision: u64,
    // Writes that succeeded while a list was in flight, replayed onto its result.
    pending_writes: Vec<LoggedWrite>,
}

impl CollectionEntry {
    fn apply_write(&mut self, write: Write) {
        write.apply(&mut self.state);
        self.revision = self.revision.saturating_add(1);
        if self.state.loading {
            self.pending_writes.push(LoggedWrite {
                revision: self.revision,
                write,
            });
        }
    }

    fn replay_writes(&mut self, since: u64) {
        for logged in std::mem::take(&mut self.pending_writes) {
            if logged.revision > since {
                logged.write.apply(&mut self.state);
            }
        }
    }
}

#[derive(Debug)]
struct LoggedWrite {
    revision: u64,
    write: Write,
}

#[derive(Debug)]
enum Write {
    Created(EntityRecord),
    Updated(EntityRecord),
    Deleted(String),
}

impl Write {
    fn apply(&self, state: &mut CollectionState) {
        match self {
            Self::Created(record) => match state.position(record.id()) {
                Some(index) => state.items[index] = record.clone(),
                None => state.items.push(record.clone()),
            },
            Self::Updated(record) => {
                if let Some(index) = state.position(record.id()) {
                    state.items[index] = record.clone();
                }
            }
            Self::Deleted(id) => state.items.retain(|item| item.id() != id.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ListTicket {
    sequence: u64,
    revision: u64,
}

/// Generic entity store keyed by entity-type name.
///
/// Cloning yields another handle to the same collections. Operations are not
/// queued against each other: a list response is applied only when it
/// belongs to the latest list request, and writes that succeeded while it was
/// in flight are replayed on top of the fetched items.
#[derive(Clone)]
pub struct EntityStore {
    gateway: Arc<dyn EntityGateway>,
    collections: Arc<RwLock<HashMap<String, CollectionEntry>>>,
}

impl EntityStore {
    /// Creates an empty store backed by a gateway.
    #[must_use]
    pub fn new(gateway: Arc<dyn EntityGateway>) -> Self {
        Self {
            gateway,
            collections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns a typed facade for an entity type tag.
    #[must_use]
    pub fn typed<E: EntityType>(&self) -> TypedEntityStore<E> {
        TypedEntityStore {
            store: self.clone(),
            entity: PhantomData,
        }
    }

    /// Returns a snapshot of a collection, or `None` before its first list.
    pub async fn collection(&self, entity_type: &str) -> Option<CollectionState> {
        self.collections
            .read()
            .await
            .get(entity_type)
            .map(|entry| entry.state.clone())
    }

    /// Fetches all records of an entity type, replacing the cached items.
    ///
    /// Failures are stored in the collection's `error` and also returned.
    pub async fn list(&self, entity_type: &str) -> AppResult<()> {
        let ticket = {
            let mut collections = self.collections.write().await;
            let entry = collections.entry(entity_type.to_owned()).or_default();
            entry.latest_list = entry.latest_list.saturating_add(1);
            entry.state.loading = true;
            entry.state.error = None;
            ListTicket {
                sequence: entry.latest_list,
                revision: entry.revision,
            }
        };

        debug!(entity = %entity_type, sequence = ticket.sequence, "listing entities");
        let result = self.gateway.list(entity_type).await;

        let mut collections = self.collections.write().await;
        let entry = collections.entry(entity_type.to_owned()).or_default();

        if entry.latest_list != ticket.sequence {
            debug!(
                entity = %entity_type,
                sequence = ticket.sequence,
                latest = entry.latest_list,
                "discarding superseded list response"
            );
            return result.map(|_| ());
        }

        entry.state.loading = false;
        match result {
            Ok(items) => {
                debug!(entity = %entity_type, count = items.len(), "replaced collection items");
                entry.state.items = items;
                entry.replay_writes(ticket.revision);
                Ok(())
            }
            Err(error) => {
                entry.pending_writes.clear();
                entry.state.error = Some(error.message().to_owned());
                Err(error)
            }
        }
    }

    /// Creates a record and appends it to the collection.
    ///
    /// Failures are returned to the caller and never stored in the collection.
    pub async fn create(
        &self,
        entity_type: &str,
        payload: EntityPayload,
    ) -> AppResult<EntityRecord> {
        let created = self.gateway.create(entity_type, &payload).await?;

        if let Some(entry) = self.collections.write().await.get_mut(entity_type) {
            entry.apply_write(Write::Created(created.clone()));
        }

        debug!(entity = %entity_type, record_id = %created.id(), "created entity");
        Ok(created)
    }

    /// Replaces a record in place. Unknown ids leave the collection untouched.
    pub async fn update(
        &self,
        entity_type: &str,
        id: &str,
        payload: EntityPayload,
    ) -> AppResult<EntityRecord> {
        let updated = self.gateway.update(entity_type, id, &payload).await?;

        if let Some(entry) = self.collections.write().await.get_mut(entity_type) {
            entry.apply_write(Write::Updated(updated.clone()));
        }

        debug!(entity = %entity_type, record_id = %id, "updated entity");
        Ok(updated)
    }

    /// Deletes a record and removes it from the collection.
    pub async fn delete(&self, entity_type: &str, id: &str) -> AppResult<()> {
        self.gateway.delete(entity_type, id).await?;

        if let Some(entry) = self.collections.write().await.get_mut(entity_type) {
            entry.apply_write(Write::Deleted(id.to_owned()));
        }

        debug!(entity = %entity_type, record_id = %id, "deleted entity");
        Ok(())
    }
}
