//! Durable key-value media backing the content store.
//!
//! The store only ever reads and writes whole JSON documents under string
//! keys, so the medium is reduced to the [`KeyValueStorage`] trait. The
//! production medium is an LMDB environment; [`MemoryStorage`] keeps the same
//! contract in a map and is what tests and previews use.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use lmdb::{Database, DatabaseFlags, Environment, Error as LmdbError, Transaction, WriteFlags};
use log::info;

use crate::app_response::AppResponse;

/// String-keyed, text-valued storage.
pub trait KeyValueStorage {
    fn read(&self, key: &str) -> Result<Option<String>, AppResponse>;

    fn write(&mut self, key: &str, value: &str) -> Result<(), AppResponse>;

    /// Writes every entry. Implementations may make this atomic.
    fn write_all(&mut self, entries: &[(String, String)]) -> Result<(), AppResponse> {
        for (key, value) in entries {
            self.write(key, value)?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), AppResponse>;

    /// Forces buffered writes to the medium. Called once before the store is released.
    fn flush(&mut self) -> Result<(), AppResponse> {
        Ok(())
    }
}

/// LMDB environment at `<name>.lmdb` holding a single unnamed database.
pub struct LmdbStorage {
    env: Environment,
    db: Database,
    path: PathBuf,
}

impl LmdbStorage {
    pub fn init(name: &str, map_size: usize) -> Result<Self, AppResponse> {
        let path = PathBuf::from(format!("{name}.lmdb"));

        fs::create_dir_all(&path).map_err(|e| {
            AppResponse::DatabaseError(format!("Could not create {}: {e}", path.display()))
        })?;

        let env = Environment::new()
            .set_max_dbs(1)
            .set_map_size(map_size)
            .open(&path)?;
        let db = env.create_db(None, DatabaseFlags::empty())?;

        info!("LMDB environment opened at {}", path.display());
        Ok(Self { env, db, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStorage for LmdbStorage {
    fn read(&self, key: &str) -> Result<Option<String>, AppResponse> {
        let txn = self.env.begin_ro_txn()?;
        let value = match txn.get(self.db, &key) {
            Ok(bytes) => Some(String::from_utf8(bytes.to_vec()).map_err(|e| {
                AppResponse::SerializationError(format!("Value under '{key}' is not UTF-8: {e}"))
            })?),
            Err(LmdbError::NotFound) => None,
            Err(e) => return Err(e.into()),
        };
        txn.abort();
        Ok(value)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), AppResponse> {
        let mut txn = self.env.begin_rw_txn()?;
        txn.put(self.db, &key, &value, WriteFlags::empty())?;
        txn.commit()?;
        Ok(())
    }

    fn write_all(&mut self, entries: &[(String, String)]) -> Result<(), AppResponse> {
        let mut txn = self.env.begin_rw_txn()?;
        for (key, value) in entries {
            txn.put(self.db, key, value, WriteFlags::empty())?;
        }
        txn.commit()?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), AppResponse> {
        let mut txn = self.env.begin_rw_txn()?;
        txn.clear_db(self.db)?;
        txn.commit()?;
        info!("Cleared all keys in {}", self.path.display());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), AppResponse> {
        self.env.sync(true)?;
        info!("LMDB environment at {} synced", self.path.display());
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, AppResponse> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), AppResponse> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), AppResponse> {
        self.entries.clear();
        Ok(())
    }
}
