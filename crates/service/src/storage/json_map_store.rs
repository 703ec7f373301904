use std::{collections::HashMap, hash::Hash, path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};

use crate::errors::StoreError;

/// Generic key-value map store, optionally persisted to a JSON file.
///
/// Without a file the map lives only in memory. With a file, every mutation
/// rewrites the file while the write lock is still held, so the file always
/// matches the last committed mutation.
#[derive(Clone)]
pub struct JsonMapStore<K, V> {
    inner: Arc<RwLock<HashMap<K, V>>>,
    file_path: Option<PathBuf>,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// A map with no backing file.
    pub fn in_memory() -> Self {
        Self { inner: Arc::new(RwLock::new(HashMap::new())), file_path: None }
    }

    /// Initialize the store from a path. Creates the file with an empty map if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, StoreError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| StoreError::Io(e.to_string()))?;
        }

        let map: HashMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) if bytes.is_empty() => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                StoreError::Serialization(format!("{}: {e}", file_path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty: HashMap<K, V> = HashMap::new();
                write_file(&file_path, &empty).await?;
                empty
            }
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };

        Ok(Self { inner: Arc::new(RwLock::new(map)), file_path: Some(file_path) })
    }

    async fn persist(&self, map: &HashMap<K, V>) -> Result<(), StoreError> {
        match &self.file_path {
            Some(path) => write_file(path, map).await,
            None => Ok(()),
        }
    }

    /// List all values.
    pub async fn values(&self) -> Vec<V> {
        let map = self.inner.read().await;
        map.values().cloned().collect()
    }

    /// Get value by key.
    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    /// First value matching the predicate, in no particular order.
    pub async fn find<F>(&self, pred: F) -> Option<V>
    where
        F: Fn(&V) -> bool,
    {
        let map = self.inner.read().await;
        map.values().find(|v| pred(v)).cloned()
    }

    /// Insert or update a value by key and persist.
    pub async fn insert(&self, key: K, value: V) -> Result<(), StoreError> {
        self.update_map(|m| {
            m.insert(key, value);
            Ok(())
        })
        .await
    }

    /// Remove a key and persist; returns whether it existed.
    pub async fn remove(&self, key: &K) -> Result<bool, StoreError> {
        self.update_map(|m| Ok(m.remove(key).is_some())).await
    }

    /// Apply a mutation under the write lock and persist before releasing it.
    ///
    /// The closure works on a copy; the copy replaces the live map only once it
    /// is on disk. A failing closure or a failing write leaves the map untouched.
    pub async fn update_map<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut HashMap<K, V>) -> Result<T, StoreError>,
    {
        let mut map = self.inner.write().await;
        let mut next = map.clone();
        let out = f(&mut next)?;
        self.persist(&next).await?;
        *map = next;
        Ok(out)
    }
}

async fn write_file<K, V>(path: &PathBuf, map: &HashMap<K, V>) -> Result<(), StoreError>
where
    K: Eq + Hash + serde::Serialize,
    V: serde::Serialize,
{
    let data = serde_json::to_vec(map).map_err(|e| StoreError::Serialization(e.to_string()))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data).await.map_err(|e| StoreError::Io(e.to_string()))?;
    fs::rename(&tmp, path).await.map_err(|e| StoreError::Io(e.to_string()))?;
    Ok(())
}
