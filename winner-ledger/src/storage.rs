use std::{
    collections::HashMap,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use log::warn;
use parking_lot::{Mutex, RwLock};

use crate::{
    config::{LedgerConfig, RECORD_EXTENSION},
    error::{LedgerError, Result},
};

const TEMP_SUFFIX: &str = "tmp";

/// Durable key-value backend holding serialized records.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        (**self).put(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// One `<key>.json` file per record inside the state directory.
pub struct FileStore {
    config: LedgerConfig,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn open(config: LedgerConfig) -> Result<Self> {
        config.ensure_dirs()?;
        if !config.state_dir().is_dir() {
            return Err(LedgerError::MissingStateDir {
                path: config.state_dir().to_path_buf(),
            });
        }
        Ok(Self {
            config,
            write_lock: Mutex::new(()),
        })
    }

    pub fn state_dir(&self) -> &Path {
        self.config.state_dir()
    }

    pub fn record_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.config.record_path(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.record_path(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let path = self.record_path(key)?;
        let tmp_path = path.with_extension(format!("{RECORD_EXTENSION}.{TEMP_SUFFIX}"));
        let _guard = self.write_lock.lock();
        let written = write_synced(&tmp_path, value).and_then(|()| fs::rename(&tmp_path, &path));
        if let Err(err) = written {
            match fs::remove_file(&tmp_path) {
                Err(cleanup) if cleanup.kind() != io::ErrorKind::NotFound => {
                    warn!("failed to remove {}: {cleanup}", tmp_path.display());
                }
                _ => {}
            }
            return Err(err.into());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.record_path(key)?;
        let _guard = self.write_lock.lock();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-process store; nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records.read().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.records
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.records.write().remove(key);
        Ok(())
    }
}

fn write_synced(path: &Path, value: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(value.as_bytes())?;
    file.sync_data()
}

fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(LedgerError::InvalidKey {
            key: key.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_store_round_trips_and_survives_reopen() {
        let dir = tempdir().unwrap();
        let config = LedgerConfig::new(dir.path().join("state"));
        {
            let store = FileStore::open(config.clone()).unwrap();
            assert_eq!(store.get("alpha").unwrap(), None);
            store.put("alpha", "{\"a\":1}").unwrap();
            store.put("alpha", "{\"a\":2}").unwrap();
        }
        let store = FileStore::open(config).unwrap();
        assert_eq!(store.get("alpha").unwrap().as_deref(), Some("{\"a\":2}"));
        assert!(store.state_dir().join("alpha.json").is_file());
        assert!(!store.state_dir().join("alpha.json.tmp").exists());
    }

    #[test]
    fn failed_put_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(LedgerConfig::new(dir.path().to_path_buf())).unwrap();
        let blocker = store.state_dir().join("gamma.json");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("inner"), b"x").unwrap();

        assert!(matches!(store.put("gamma", "[]"), Err(LedgerError::Io(_))));
        assert!(!store.state_dir().join("gamma.json.tmp").exists());
        assert!(blocker.is_dir());
    }

    #[test]
    fn file_store_remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(LedgerConfig::new(dir.path().to_path_buf())).unwrap();
        store.put("beta", "[]").unwrap();
        store.remove("beta").unwrap();
        store.remove("beta").unwrap();
        assert_eq!(store.get("beta").unwrap(), None);
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(LedgerConfig::new(dir.path().to_path_buf())).unwrap();
        for key in ["", "../escape", "a/b", "a.b"] {
            assert!(matches!(
                store.put(key, "x"),
                Err(LedgerError::InvalidKey { .. })
            ));
        }
    }

    #[test]
    fn open_fails_when_state_dir_is_a_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("occupied");
        fs::write(&path, b"not a dir").unwrap();
        assert!(FileStore::open(LedgerConfig::new(path)).is_err());
    }

    #[test]
    fn memory_store_behaves_like_a_map() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        store.put("k", "v1").unwrap();
        store.put("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
