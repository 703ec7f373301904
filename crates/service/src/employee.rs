use std::sync::Arc;

use models::{Employee, EmployeeInput, EntityId};

use crate::entity_service::{EntityService, NaturalKeyPolicy};
use crate::errors::ServiceError;
use crate::storage::EntityStore;

/// Employee operations. The document is fixed once the employee exists.
pub struct EmployeeService<S> {
    inner: EntityService<Employee, S>,
}

impl<S: EntityStore<Employee>> EmployeeService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { inner: EntityService::new(store, NaturalKeyPolicy::Immutable) }
    }

    /// Create an employee; fails with `AlreadyExists` when the document is taken.
    ///
    /// # Examples
    /// ```
    /// use service::{employee::EmployeeService, storage::KvEntityStore};
    /// use models::{Employee, EmployeeInput};
    /// use std::sync::Arc;
    /// let svc = EmployeeService::new(Arc::new(KvEntityStore::<Employee>::in_memory()));
    /// let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    /// let created = rt.block_on(svc.create(EmployeeInput::new("111", "Joao"))).unwrap();
    /// assert!(created.id.is_some());
    /// assert!(rt.block_on(svc.create(EmployeeInput::new("111", "Maria"))).is_err());
    /// ```
    pub async fn create(&self, input: EmployeeInput) -> Result<Employee, ServiceError> {
        self.inner.create(input).await
    }

    pub async fn find_by_id(&self, id: &EntityId) -> Result<Option<Employee>, ServiceError> {
        self.inner.find_by_id(id).await
    }

    /// Unlike `find_by_id`, absence is reported as `NotFound`.
    pub async fn find_by_document(&self, document: &str) -> Result<Employee, ServiceError> {
        self.inner.get_by_natural_key_or_fail(document).await
    }

    pub async fn find_all(&self) -> Result<Vec<Employee>, ServiceError> {
        self.inner.find_all().await
    }

    pub async fn update(&self, id: &EntityId, input: EmployeeInput) -> Result<Employee, ServiceError> {
        self.inner.update(id, input).await
    }

    pub async fn delete(&self, id: &EntityId) -> Result<(), ServiceError> {
        self.inner.delete(id).await
    }
}
