use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>>;

    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

#[derive(Debug)]
pub struct FileStore {
    pub data_dir: PathBuf,
}

impl FileStore {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        info!(data_dir = %data_dir.display(), "opened file store");
        Ok(Self { data_dir })
    }

    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    #[tracing::instrument(skip(self))]
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.slot_path(key);
        if !path.exists() {
            debug!(file = %path.display(), "slot absent");
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed reading {}", path.display()))?;
        Ok(Some(raw))
    }

    #[tracing::instrument(skip(self, value))]
    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.slot_path(key);
        debug!(file = %path.display(), bytes = value.len(), "writing slot atomically");

        let mut temp = NamedTempFile::new_in(&self.data_dir)?;
        temp.write_all(value.as_bytes())?;
        temp.flush()?;
        temp.persist(&path)
            .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slots: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug)]
pub struct StoredCell<S, T> {
    store: S,
    key: String,
    _value: PhantomData<T>,
}

impl<S, T> StoredCell<S, T>
where
    S: KeyValueStore,
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            _value: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn backup_key(&self) -> String {
        format!("{}.bak", self.key)
    }

    #[tracing::instrument(skip(self, default), fields(key = %self.key))]
    pub fn read(&self, default: T) -> T {
        let Some(raw) = self.load_raw() else {
            return default;
        };

        match serde_json::from_str::<T>(&raw) {
            Ok(value) => value,
            Err(error) => {
                warn!(%error, %raw, "failed decoding stored slot; using default");
                default
            }
        }
    }

    // An undecodable slot is copied to `<key>.bak` before the caller can overwrite it.
    #[tracing::instrument(skip(self, default), fields(key = %self.key))]
    pub fn read_or_backup(&mut self, default: T) -> T {
        let Some(raw) = self.load_raw() else {
            return default;
        };

        match serde_json::from_str::<T>(&raw) {
            Ok(value) => value,
            Err(error) => {
                let backup = self.backup_key();
                warn!(%error, %raw, %backup, "failed decoding stored slot; saving a copy and using default");
                if let Err(error) = self.store.set_item(&backup, &raw) {
                    warn!(%error, %backup, "failed writing backup slot");
                }
                default
            }
        }
    }

    fn load_raw(&self) -> Option<String> {
        match self.store.get_item(&self.key) {
            Ok(raw) => raw,
            Err(error) => {
                warn!(%error, "failed reading stored slot; using default");
                None
            }
        }
    }

    #[tracing::instrument(skip(self, value), fields(key = %self.key))]
    pub fn write(&mut self, value: &T) -> anyhow::Result<()> {
        let encoded = serde_json::to_string(value)
            .with_context(|| format!("failed encoding slot {}", self.key))?;
        self.store.set_item(&self.key, &encoded)
    }
}
