use std::{collections::HashMap, hash::Hash, path::{Path, PathBuf}, sync::Arc};
use tokio::{fs, sync::RwLock};

use crate::errors::StoreError;

/// Generic JSON file-backed key-value map store.
///
/// Keeps a `HashMap<K, V>` in memory and rewrites the whole file after every
/// mutation. Writers hold the lock across check, mutate and save, so a
/// mutation either lands in both memory and disk or in neither. Saves go
/// through a sibling temp file that is renamed over the original.
pub struct JsonMapStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
    file_path: PathBuf,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned + Clone + Send + Sync,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone + Send + Sync,
{
    /// Open the store at `path`, creating the file (and parent directories) with an empty map if missing.
    /// An existing file that is not a valid map is an error rather than silently emptied.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, StoreError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(StoreError::backend)?;
        }

        let map: HashMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) if bytes.is_empty() => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(StoreError::backend)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty: HashMap<K, V> = HashMap::new();
                write_map(&file_path, &empty).await?;
                empty
            }
            Err(e) => return Err(StoreError::backend(e)),
        };

        Ok(Arc::new(Self { inner: RwLock::new(map), file_path }))
    }

    pub fn path(&self) -> &Path { &self.file_path }

    /// Get value by key.
    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    /// First value matching `pred`.
    pub async fn find<F>(&self, pred: F) -> Option<V>
    where
        F: Fn(&V) -> bool + Send,
    {
        let map = self.inner.read().await;
        map.values().find(|v| pred(v)).cloned()
    }

    pub async fn len(&self) -> usize { self.inner.read().await.len() }

    pub async fn is_empty(&self) -> bool { self.inner.read().await.is_empty() }

    /// Apply a mutation to a copy of the map and persist it; the in-memory map is
    /// only replaced once the file write succeeds.
    pub async fn update_map<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut HashMap<K, V>) -> Result<R, StoreError> + Send,
    {
        let mut map = self.inner.write().await;
        let mut next = map.clone();
        let out = f(&mut next)?;
        write_map(&self.file_path, &next).await?;
        *map = next;
        Ok(out)
    }
}

async fn write_map<K, V>(path: &Path, map: &HashMap<K, V>) -> Result<(), StoreError>
where
    K: Eq + Hash + serde::Serialize,
    V: serde::Serialize,
{
    let data = serde_json::to_vec_pretty(map).map_err(StoreError::backend)?;
    let tmp = tmp_path_for(path);
    fs::write(&tmp, data).await.map_err(StoreError::backend)?;
    fs::rename(&tmp, path).await.map_err(StoreError::backend)
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
