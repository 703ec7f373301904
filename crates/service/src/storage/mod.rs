//! Storage abstractions for the service layer
//!
//! `EntityStore` is the contract the entity services consume. `KvEntityStore`
//! implements it on top of `JsonMapStore`, either purely in memory or backed
//! by one JSON file per table.

pub mod json_map_store;
pub mod kv_entity_store;

use async_trait::async_trait;
use models::{Entity, EntityId};

use crate::errors::StoreError;

pub use kv_entity_store::KvEntityStore;

/// Result of a conditional write.
#[derive(Debug, Clone, PartialEq)]
pub enum PutOutcome<E> {
    /// The entity was persisted; carries the stored state including its id.
    Written(E),
    /// Another entity already holds the natural key; nothing was written.
    KeyTaken(E),
    /// The entity carries an id that is no longer stored; nothing was written.
    Missing,
}

/// Key-value collection of one entity type.
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    async fn get_by_id(&self, id: &EntityId) -> Result<Option<E>, StoreError>;
    async fn get_by_natural_key(&self, key: &str) -> Result<Option<E>, StoreError>;
    /// Every stored entity, in no particular order.
    async fn scan_all(&self) -> Result<Vec<E>, StoreError>;
    /// Assigns an id when the entity has none, otherwise overwrites by id.
    async fn put(&self, entity: E) -> Result<E, StoreError>;
    /// Like `put`, but atomically refuses the write when an entity with a
    /// different id already holds the same natural key, or when the entity
    /// carries an id that is not stored anymore.
    async fn put_if_absent_by_natural_key(&self, entity: E) -> Result<PutOutcome<E>, StoreError>;
    /// Returns whether an entity was removed.
    async fn delete(&self, id: &EntityId) -> Result<bool, StoreError>;
}
