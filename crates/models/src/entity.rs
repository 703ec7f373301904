use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier assigned by the store on first write.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A record kept in an entity store and guarded by the entity service.
///
/// Every entity has a store-assigned id and one natural key that must be
/// unique among entities of the same type. `apply` copies the mutable fields
/// of an input onto an existing record; whether the natural key may change is
/// decided by the service before `apply` runs.
pub trait Entity: Clone + fmt::Debug + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Client-supplied fields, everything except the id.
    type Input: Clone + fmt::Debug + Send + Sync + 'static;

    /// Lowercase entity name used in error codes and log events.
    const KIND: &'static str;
    /// Wire name of the natural key field.
    const NATURAL_KEY_FIELD: &'static str;

    fn id(&self) -> Option<&EntityId>;
    fn assign_id(&mut self, id: EntityId);
    fn natural_key(&self) -> &str;

    fn input_natural_key(input: &Self::Input) -> &str;
    fn from_input(input: Self::Input) -> Self;
    fn apply(&mut self, input: Self::Input);
}
