#![cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use models::{Entity, EntityId};

use crate::errors::StoreError;
use crate::storage::{EntityStore, KvEntityStore, PutOutcome};

/// In-memory store that counts write attempts (put, conditional put, delete).
pub struct CountingStore<E> {
    inner: KvEntityStore<E>,
    writes: AtomicUsize,
}

impl<E: Entity> CountingStore<E> {
    pub fn new() -> Self {
        Self { inner: KvEntityStore::in_memory(), writes: AtomicUsize::new(0) }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn count(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for CountingStore<E> {
    async fn get_by_id(&self, id: &EntityId) -> Result<Option<E>, StoreError> {
        self.inner.get_by_id(id).await
    }

    async fn get_by_natural_key(&self, key: &str) -> Result<Option<E>, StoreError> {
        self.inner.get_by_natural_key(key).await
    }

    async fn scan_all(&self) -> Result<Vec<E>, StoreError> {
        self.inner.scan_all().await
    }

    async fn put(&self, entity: E) -> Result<E, StoreError> {
        self.count();
        self.inner.put(entity).await
    }

    async fn put_if_absent_by_natural_key(&self, entity: E) -> Result<PutOutcome<E>, StoreError> {
        self.count();
        self.inner.put_if_absent_by_natural_key(entity).await
    }

    async fn delete(&self, id: &EntityId) -> Result<bool, StoreError> {
        self.count();
        self.inner.delete(id).await
    }
}

/// In-memory store where every entity read by id is removed right after the
/// read, as if a concurrent delete committed before the caller's next write.
pub struct VanishingStore<E> {
    inner: KvEntityStore<E>,
}

impl<E: Entity> VanishingStore<E> {
    pub fn new() -> Self {
        Self { inner: KvEntityStore::in_memory() }
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for VanishingStore<E> {
    async fn get_by_id(&self, id: &EntityId) -> Result<Option<E>, StoreError> {
        let found = self.inner.get_by_id(id).await?;
        self.inner.delete(id).await?;
        Ok(found)
    }

    async fn get_by_natural_key(&self, key: &str) -> Result<Option<E>, StoreError> {
        self.inner.get_by_natural_key(key).await
    }

    async fn scan_all(&self) -> Result<Vec<E>, StoreError> {
        self.inner.scan_all().await
    }

    async fn put(&self, entity: E) -> Result<E, StoreError> {
        self.inner.put(entity).await
    }

    async fn put_if_absent_by_natural_key(&self, entity: E) -> Result<PutOutcome<E>, StoreError> {
        self.inner.put_if_absent_by_natural_key(entity).await
    }

    async fn delete(&self, id: &EntityId) -> Result<bool, StoreError> {
        self.inner.delete(id).await
    }
}

/// Store whose every call fails as if the backend were unreachable.
pub struct FailingStore;

fn unreachable_backend() -> StoreError {
    StoreError::Unavailable("connection refused".into())
}

#[async_trait]
impl<E: Entity> EntityStore<E> for FailingStore {
    async fn get_by_id(&self, _id: &EntityId) -> Result<Option<E>, StoreError> {
        Err(unreachable_backend())
    }

    async fn get_by_natural_key(&self, _key: &str) -> Result<Option<E>, StoreError> {
        Err(unreachable_backend())
    }

    async fn scan_all(&self) -> Result<Vec<E>, StoreError> {
        Err(unreachable_backend())
    }

    async fn put(&self, _entity: E) -> Result<E, StoreError> {
        Err(unreachable_backend())
    }

    async fn put_if_absent_by_natural_key(&self, _entity: E) -> Result<PutOutcome<E>, StoreError> {
        Err(unreachable_backend())
    }

    async fn delete(&self, _id: &EntityId) -> Result<bool, StoreError> {
        Err(unreachable_backend())
    }
}
