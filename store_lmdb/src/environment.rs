//! LMDB environment setup and the key-value store implementation.

use std::path::Path;

use heed::types::Str;
use heed::{Database, Env, EnvOpenOptions};

use tickity_store::{KeyValueStore, StoreError};

use crate::LmdbError;

/// Name of the LMDB database holding all items.
const ITEMS_DB: &str = "items";

/// Default map size: 64 MiB is far beyond what per-event records need.
pub const DEFAULT_MAP_SIZE: usize = 64 * 1024 * 1024;

/// A durable [`KeyValueStore`] backed by an LMDB environment.
pub struct LmdbStore {
    env: Env,
    items: Database<Str, Str>,
}

impl LmdbStore {
    /// Open or create an LMDB environment in `path` with the default map size.
    pub fn open(path: &Path) -> Result<Self, LmdbError> {
        Self::open_with_map_size(path, DEFAULT_MAP_SIZE)
    }

    /// Open or create an LMDB environment in `path`.
    pub fn open_with_map_size(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per path by this process and
        // the backing file is not modified by anything else while open.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(1)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let items: Database<Str, Str> = env.create_database(&mut wtxn, Some(ITEMS_DB))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), "opened LMDB check-in store");
        Ok(Self { env, items })
    }

    /// Number of stored items.
    pub fn len(&self) -> Result<u64, LmdbError> {
        let rtxn = self.env.read_txn()?;
        Ok(self.items.len(&rtxn)?)
    }

    pub fn is_empty(&self) -> Result<bool, LmdbError> {
        Ok(self.len()? == 0)
    }
}

impl KeyValueStore for LmdbStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let value = self
            .items
            .get(&rtxn, key)
            .map_err(LmdbError::from)?
            .map(str::to_owned);
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.items
            .put(&mut wtxn, key, value)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickity_store::CheckInCache;
    use tickity_types::{CheckInRecord, EventId, TxHash, WalletAddress};

    #[test]
    fn missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = LmdbStore::open(dir.path()).unwrap();
        assert_eq!(store.get_item("absent").unwrap(), None);
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn set_item_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = LmdbStore::open(dir.path()).unwrap();
        store.set_item("k", "one").unwrap();
        store.set_item("k", "two").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("two"));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let event = EventId::new("E1").unwrap();
        let record = CheckInRecord {
            wallet_address: WalletAddress::parse("0xABC").unwrap(),
            image_url: None,
            transaction_hash: Some(TxHash::new([3; 32])),
        };

        {
            let cache = CheckInCache::new(LmdbStore::open(dir.path()).unwrap());
            cache.set(&event, &record).unwrap();
        }

        let cache = CheckInCache::new(LmdbStore::open(dir.path()).unwrap());
        assert_eq!(cache.get(&event).unwrap(), Some(record));
    }
}
