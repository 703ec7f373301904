use std::{marker::PhantomData, sync::Arc};

use models::{Entity, EntityId};
use tracing::{info, instrument, warn};

use crate::errors::{ServiceError, StoreError};
use crate::storage::{EntityStore, PutOutcome};

/// Whether an update may change an entity's natural key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaturalKeyPolicy {
    /// Any attempt to change the key fails with `ImmutableFieldViolation`.
    Immutable,
    /// The key may change as long as no other entity holds the new value.
    MutableIfUnique,
}

/// Application service enforcing natural-key uniqueness, key immutability
/// and existence checks for one entity type.
///
/// Reads report absence as `Ok(None)`; operations that mutate an entity by id
/// fail with `NotFound` when it does not exist. Creates and updates go through
/// the store's conditional write, so two concurrent writers can never both
/// claim the same natural key.
pub struct EntityService<E, S> {
    store: Arc<S>,
    policy: NaturalKeyPolicy,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, S: EntityStore<E>> EntityService<E, S> {
    pub fn new(store: Arc<S>, policy: NaturalKeyPolicy) -> Self {
        Self { store, policy, _entity: PhantomData }
    }

    #[instrument(skip(self, input), fields(kind = E::KIND, key = %E::input_natural_key(&input)))]
    pub async fn create(&self, input: E::Input) -> Result<E, ServiceError> {
        let key = E::input_natural_key(&input).to_string();
        if self.store.get_by_natural_key(&key).await?.is_some() {
            warn!(kind = E::KIND, %key, "create_rejected_key_exists");
            return Err(ServiceError::already_exists::<E>(key));
        }

        match self.store.put_if_absent_by_natural_key(E::from_input(input)).await? {
            PutOutcome::Written(entity) => {
                info!(kind = E::KIND, id = ?entity.id(), %key, "entity_created");
                Ok(entity)
            }
            PutOutcome::KeyTaken(_) => {
                warn!(kind = E::KIND, %key, "create_lost_race_for_key");
                Err(ServiceError::already_exists::<E>(key))
            }
            // a fresh entity has no id, so the store has nothing to miss
            PutOutcome::Missing => {
                Err(StoreError::Unavailable(format!("{} store reported a new entity as missing", E::KIND)).into())
            }
        }
    }

    #[instrument(skip(self), fields(kind = E::KIND))]
    pub async fn find_by_id(&self, id: &EntityId) -> Result<Option<E>, ServiceError> {
        Ok(self.store.get_by_id(id).await?)
    }

    #[instrument(skip(self), fields(kind = E::KIND))]
    pub async fn find_by_natural_key(&self, key: &str) -> Result<Option<E>, ServiceError> {
        Ok(self.store.get_by_natural_key(key).await?)
    }

    /// Fetch-or-fail used by every operation that needs an existing entity.
    pub async fn get_by_id_or_fail(&self, id: &EntityId) -> Result<E, ServiceError> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found_by_id::<E>(id.as_str()))
    }

    pub async fn get_by_natural_key_or_fail(&self, key: &str) -> Result<E, ServiceError> {
        self.find_by_natural_key(key)
            .await?
            .ok_or_else(|| ServiceError::not_found_by_key::<E>(key))
    }

    #[instrument(skip(self), fields(kind = E::KIND))]
    pub async fn find_all(&self) -> Result<Vec<E>, ServiceError> {
        Ok(self.store.scan_all().await?)
    }

    /// Overwrite the mutable fields of an existing entity.
    ///
    /// Checks run in order: existence, key immutability, key uniqueness.
    /// The id never changes; the natural key changes only under
    /// `NaturalKeyPolicy::MutableIfUnique`.
    #[instrument(skip(self, input), fields(kind = E::KIND))]
    pub async fn update(&self, id: &EntityId, input: E::Input) -> Result<E, ServiceError> {
        let mut existing = self.get_by_id_or_fail(id).await?;

        let new_key = E::input_natural_key(&input).to_string();
        if new_key != existing.natural_key() {
            if self.policy == NaturalKeyPolicy::Immutable {
                warn!(kind = E::KIND, %id, from = existing.natural_key(), to = %new_key, "update_rejected_immutable_key");
                return Err(ServiceError::immutable_key::<E>());
            }
            if let Some(holder) = self.store.get_by_natural_key(&new_key).await? {
                if holder.id() != Some(id) {
                    warn!(kind = E::KIND, %id, key = %new_key, "update_rejected_key_exists");
                    return Err(ServiceError::already_exists::<E>(new_key));
                }
            }
        }

        existing.apply(input);
        match self.store.put_if_absent_by_natural_key(existing).await? {
            PutOutcome::Written(entity) => {
                info!(kind = E::KIND, %id, key = entity.natural_key(), "entity_updated");
                Ok(entity)
            }
            PutOutcome::KeyTaken(_) => {
                warn!(kind = E::KIND, %id, key = %new_key, "update_lost_race_for_key");
                Err(ServiceError::already_exists::<E>(new_key))
            }
            PutOutcome::Missing => {
                warn!(kind = E::KIND, %id, "update_lost_race_to_delete");
                Err(ServiceError::not_found_by_id::<E>(id.as_str()))
            }
        }
    }

    #[instrument(skip(self), fields(kind = E::KIND))]
    pub async fn delete(&self, id: &EntityId) -> Result<(), ServiceError> {
        let existing = self.get_by_id_or_fail(id).await?;
        if !self.store.delete(id).await? {
            warn!(kind = E::KIND, %id, "delete_lost_race_to_delete");
            return Err(ServiceError::not_found_by_id::<E>(id.as_str()));
        }
        info!(kind = E::KIND, %id, key = existing.natural_key(), "entity_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::storage::KvEntityStore;
    use crate::test_support::{CountingStore, FailingStore, VanishingStore};
    use models::{Decimal, Employee, EmployeeInput, Product, ProductInput};
    use proptest::prelude::*;

    fn product_input(sku: &str, name: &str, price: i64) -> ProductInput {
        ProductInput::new(sku, name, Decimal::from(price))
    }

    fn products(policy: NaturalKeyPolicy) -> (Arc<CountingStore<Product>>, EntityService<Product, CountingStore<Product>>) {
        let store = Arc::new(CountingStore::new());
        let svc = EntityService::new(store.clone(), policy);
        (store, svc)
    }

    #[tokio::test]
    async fn create_assigns_id_and_writes_once() -> Result<(), anyhow::Error> {
        let (store, svc) = products(NaturalKeyPolicy::MutableIfUnique);
        let created = svc.create(product_input("SKU1", "A", 10)).await?;

        assert!(created.id.is_some());
        assert_eq!(created.sku, "SKU1");
        assert_eq!(store.writes(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_create_fails_without_writing() -> Result<(), anyhow::Error> {
        let (store, svc) = products(NaturalKeyPolicy::MutableIfUnique);
        svc.create(product_input("SKU1", "A", 10)).await?;

        let err = svc.create(product_input("SKU1", "B", 20)).await.unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists { ref key, .. } if key == "SKU1"));
        assert_eq!(store.writes(), 1);
        assert_eq!(svc.find_all().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn update_and_delete_of_unknown_id_fail_without_writing() {
        let (store, svc) = products(NaturalKeyPolicy::MutableIfUnique);
        let missing = EntityId::from("does-not-exist");

        let err = svc.update(&missing, product_input("SKU1", "A", 10)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { by: "id", ref lookup, .. } if lookup == "does-not-exist"));

        let err = svc.delete(&missing).await.unwrap_err();
        assert_eq!(err.code(), "product.not-found-by-id");
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn update_does_not_revive_entity_deleted_meanwhile() -> Result<(), anyhow::Error> {
        let svc = EntityService::new(Arc::new(VanishingStore::<Product>::new()), NaturalKeyPolicy::MutableIfUnique);
        let created = svc.create(product_input("SKU1", "A", 10)).await?;
        let id = created.id.clone().expect("id");

        let err = svc.update(&id, product_input("SKU1", "B", 12)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { by: "id", ref lookup, .. } if lookup == id.as_str()));
        assert!(svc.find_all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn delete_racing_another_delete_reports_not_found() -> Result<(), anyhow::Error> {
        let svc = EntityService::new(Arc::new(VanishingStore::<Product>::new()), NaturalKeyPolicy::MutableIfUnique);
        let created = svc.create(product_input("SKU1", "A", 10)).await?;
        let id = created.id.clone().expect("id");

        let err = svc.delete(&id).await.unwrap_err();
        assert_eq!(err.code(), "product.not-found-by-id");
        Ok(())
    }

    #[tokio::test]
    async fn immutable_policy_rejects_key_change_and_keeps_state() -> Result<(), anyhow::Error> {
        let (store, svc) = products(NaturalKeyPolicy::Immutable);
        let created = svc.create(product_input("SKU1", "A", 10)).await?;
        let id = created.id.clone().expect("id");

        let err = svc.update(&id, product_input("SKU2", "B", 12)).await.unwrap_err();
        assert!(matches!(err, ServiceError::ImmutableFieldViolation { field: "sku", .. }));
        assert_eq!(svc.find_by_id(&id).await?, Some(created));
        assert_eq!(store.writes(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn mutable_policy_allows_fresh_key_but_not_a_taken_one() -> Result<(), anyhow::Error> {
        let (_store, svc) = products(NaturalKeyPolicy::MutableIfUnique);
        let a = svc.create(product_input("SKU1", "A", 10)).await?;
        svc.create(product_input("SKU2", "B", 10)).await?;
        let id = a.id.clone().expect("id");

        let err = svc.update(&id, product_input("SKU2", "A", 10)).await.unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists { ref key, .. } if key == "SKU2"));

        let moved = svc.update(&id, product_input("SKU3", "A", 10)).await?;
        assert_eq!(moved.id, Some(id));
        assert_eq!(moved.sku, "SKU3");
        assert!(svc.find_by_natural_key("SKU1").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_and_second_delete_fails() -> Result<(), anyhow::Error> {
        let (store, svc) = products(NaturalKeyPolicy::MutableIfUnique);
        let created = svc.create(product_input("SKU1", "A", 10)).await?;
        let id = created.id.expect("id");

        svc.delete(&id).await?;
        assert_eq!(svc.find_by_id(&id).await?, None);
        assert!(matches!(svc.delete(&id).await, Err(ServiceError::NotFound { .. })));
        assert_eq!(store.writes(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn find_all_on_empty_store_is_empty() -> Result<(), anyhow::Error> {
        let svc: EntityService<Employee, _> =
            EntityService::new(Arc::new(KvEntityStore::<Employee>::in_memory()), NaturalKeyPolicy::Immutable);
        assert!(svc.find_all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn find_all_is_stable_between_writes() -> Result<(), anyhow::Error> {
        let svc: EntityService<Employee, _> =
            EntityService::new(Arc::new(KvEntityStore::<Employee>::in_memory()), NaturalKeyPolicy::Immutable);
        for doc in ["1", "2", "3"] {
            svc.create(EmployeeInput::new(doc, "Joao")).await?;
        }
        let first: HashSet<String> = svc.find_all().await?.into_iter().map(|e| e.document).collect();
        let second: HashSet<String> = svc.find_all().await?.into_iter().map(|e| e.document).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn store_failures_propagate_as_store_errors() {
        let svc: EntityService<Employee, _> = EntityService::new(Arc::new(FailingStore), NaturalKeyPolicy::Immutable);
        let id = EntityId::from("any");

        for err in [
            svc.create(EmployeeInput::new("111", "Joao")).await.unwrap_err(),
            svc.find_by_id(&id).await.unwrap_err(),
            svc.find_all().await.unwrap_err(),
            svc.update(&id, EmployeeInput::new("111", "Joao")).await.unwrap_err(),
            svc.delete(&id).await.unwrap_err(),
        ] {
            assert!(matches!(err, ServiceError::Store(_)), "unexpected {err:?}");
        }
    }

    #[derive(Debug, Clone)]
    enum Op {
        Create(u8),
        Update(usize, u8),
        Delete(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..4).prop_map(Op::Create),
            (0usize..8, 0u8..4).prop_map(|(slot, key)| Op::Update(slot, key)),
            (0usize..8).prop_map(Op::Delete),
        ]
    }

    async fn run_ops(svc: &EntityService<Product, KvEntityStore<Product>>, ops: Vec<Op>) -> Result<(), ServiceError> {
        let mut ids: Vec<EntityId> = Vec::new();
        for op in ops {
            let result = match op {
                Op::Create(k) => svc
                    .create(product_input(&format!("SKU{k}"), "P", 1))
                    .await
                    .map(|p| ids.extend(p.id)),
                Op::Update(slot, k) if !ids.is_empty() => {
                    let id = ids[slot % ids.len()].clone();
                    svc.update(&id, product_input(&format!("SKU{k}"), "Q", 2)).await.map(|_| ())
                }
                Op::Delete(slot) if !ids.is_empty() => {
                    let id = ids[slot % ids.len()].clone();
                    svc.delete(&id).await
                }
                _ => Ok(()),
            };
            // business rejections are expected here; only store failures abort
            if let Err(ServiceError::Store(e)) = result {
                return Err(e.into());
            }
        }
        Ok(())
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 64, ..ProptestConfig::default() })]

        /// Property: no two stored products share a sku after any sequence of operations.
        #[test]
        fn natural_keys_stay_unique(ops in proptest::collection::vec(op(), 1..40)) {
            let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
            let all = rt.block_on(async {
                let svc = EntityService::new(Arc::new(KvEntityStore::<Product>::in_memory()), NaturalKeyPolicy::MutableIfUnique);
                run_ops(&svc, ops).await.unwrap();
                svc.find_all().await.unwrap()
            });
            let skus: HashSet<&str> = all.iter().map(|p| p.sku.as_str()).collect();
            prop_assert_eq!(skus.len(), all.len());
        }
    }
}
