use std::sync::Arc;

use models::{EntityId, Product, ProductInput};

use crate::entity_service::{EntityService, NaturalKeyPolicy};
use crate::errors::ServiceError;
use crate::storage::EntityStore;

/// Product operations. A sku may be resubmitted unchanged or moved to a
/// value no other product holds; there is no public lookup by id or sku.
pub struct ProductService<S> {
    inner: EntityService<Product, S>,
}

impl<S: EntityStore<Product>> ProductService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { inner: EntityService::new(store, NaturalKeyPolicy::MutableIfUnique) }
    }

    pub async fn create(&self, input: ProductInput) -> Result<Product, ServiceError> {
        self.inner.create(input).await
    }

    pub async fn find_all(&self) -> Result<Vec<Product>, ServiceError> {
        self.inner.find_all().await
    }

    pub async fn update(&self, id: &EntityId, input: ProductInput) -> Result<Product, ServiceError> {
        self.inner.update(id, input).await
    }

    pub async fn delete(&self, id: &EntityId) -> Result<(), ServiceError> {
        self.inner.delete(id).await
    }
}
