use std::path::Path;

use async_trait::async_trait;
use models::{Entity, EntityId};
use tracing::{debug, info};

use super::json_map_store::JsonMapStore;
use super::{EntityStore, PutOutcome};
use crate::errors::StoreError;

/// `EntityStore` over a `JsonMapStore<EntityId, E>`.
/// Natural-key lookups scan the table; there is no secondary index.
#[derive(Clone)]
pub struct KvEntityStore<E> {
    table: JsonMapStore<EntityId, E>,
}

impl<E: Entity> KvEntityStore<E> {
    pub fn in_memory() -> Self {
        Self { table: JsonMapStore::in_memory() }
    }

    /// Open `<dir>/<table>.json`, creating the table file when it does not exist yet.
    pub async fn open(dir: impl AsRef<Path>, table: &str) -> Result<Self, StoreError> {
        let path = dir.as_ref().join(format!("{table}.json"));
        let existed = tokio::fs::try_exists(&path).await.unwrap_or(false);
        let store = JsonMapStore::open(&path).await?;
        if existed {
            debug!(table, path = %path.display(), "table_reused");
        } else {
            info!(table, path = %path.display(), "table_created");
        }
        Ok(Self { table: store })
    }
}

fn with_id<E: Entity>(mut entity: E) -> (EntityId, E) {
    let id = match entity.id() {
        Some(id) => id.clone(),
        None => {
            let id = EntityId::generate();
            entity.assign_id(id.clone());
            id
        }
    };
    (id, entity)
}

#[async_trait]
impl<E: Entity> EntityStore<E> for KvEntityStore<E> {
    async fn get_by_id(&self, id: &EntityId) -> Result<Option<E>, StoreError> {
        Ok(self.table.get(id).await)
    }

    async fn get_by_natural_key(&self, key: &str) -> Result<Option<E>, StoreError> {
        Ok(self.table.find(|e| e.natural_key() == key).await)
    }

    async fn scan_all(&self) -> Result<Vec<E>, StoreError> {
        Ok(self.table.values().await)
    }

    async fn put(&self, entity: E) -> Result<E, StoreError> {
        let (id, entity) = with_id(entity);
        self.table.insert(id, entity.clone()).await?;
        Ok(entity)
    }

    async fn put_if_absent_by_natural_key(&self, entity: E) -> Result<PutOutcome<E>, StoreError> {
        let is_new = entity.id().is_none();
        let (id, entity) = with_id(entity);
        self.table
            .update_map(move |map| {
                if !is_new && !map.contains_key(&id) {
                    return Ok(PutOutcome::Missing);
                }
                let holder = map
                    .values()
                    .find(|other| other.natural_key() == entity.natural_key() && other.id() != Some(&id));
                if let Some(holder) = holder {
                    return Ok(PutOutcome::KeyTaken(holder.clone()));
                }
                map.insert(id, entity.clone());
                Ok(PutOutcome::Written(entity))
            })
            .await
    }

    async fn delete(&self, id: &EntityId) -> Result<bool, StoreError> {
        self.table.remove(id).await
    }
}
