//! NVS (Non-Volatile Storage) adapter.
//!
//! [`NvsPersistence`] implements [`PersistencePort`] on top of any
//! key-value [`StoragePort`]: the on-chip NVS partition on the device,
//! [`FileStorage`](super::file_storage::FileStorage) on a host, or the
//! in-memory [`MemoryStorage`] for simulation and tests.
//!
//! | Namespace | Key          | Encoding                              |
//! |-----------|--------------|---------------------------------------|
//! | `nova`    | `counters`   | fixed-offset LE u32 record            |
//! | `nova`    | `flash_dflt` | postcard-encoded `FlashDefaults`      |
//!
//! Storage failures never reach the core: a failed load yields the zeroed
//! record (the core then applies its built-in fallbacks) and a failed save
//! is logged.

use std::collections::HashMap;

use log::{info, warn};

use crate::app::ports::{PersistencePort, StorageError, StoragePort, StorageResult};
use crate::config::FlashDefaults;
use crate::counters::Counters;
use crate::error::{Error, Result};

const NAMESPACE: &str = "nova";
const COUNTERS_KEY: &str = "counters";
const FLASH_DEFAULTS_KEY: &str = "flash_dflt";

/// Read buffer for the counters blob.  Larger than today's record so blobs
/// written by newer firmware (more counters appended) still load.
const COUNTERS_BUF: usize = 64;

/// Upper bound for a postcard-encoded `FlashDefaults` (6 varints).
const FLASH_DEFAULTS_BUF: usize = 16;

pub struct NvsPersistence<S: StoragePort> {
    storage: S,
}

impl<S: StoragePort> NvsPersistence<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Read counters, distinguishing "never written" from failures.
    pub fn try_load_counters(&self) -> Result<Counters> {
        let mut buf = [0u8; COUNTERS_BUF];
        let n = self.storage.read(NAMESPACE, COUNTERS_KEY, &mut buf)?;
        Ok(Counters::from_bytes(&buf[..n]))
    }

    pub fn try_save_counters(&mut self, counters: &Counters) -> Result<()> {
        self.storage
            .write(NAMESPACE, COUNTERS_KEY, &counters.to_bytes())?;
        Ok(())
    }

    pub fn try_load_flash_defaults(&self) -> Result<FlashDefaults> {
        let mut buf = [0u8; FLASH_DEFAULTS_BUF];
        let n = self.storage.read(NAMESPACE, FLASH_DEFAULTS_KEY, &mut buf)?;
        postcard::from_bytes(&buf[..n]).map_err(|_| Error::Corrupted("flash defaults"))
    }

    pub fn try_save_flash_defaults(&mut self, defaults: &FlashDefaults) -> Result<()> {
        let mut buf = [0u8; FLASH_DEFAULTS_BUF];
        let encoded = postcard::to_slice(defaults, &mut buf)
            .map_err(|_| Error::Corrupted("flash defaults"))?;
        self.storage.write(NAMESPACE, FLASH_DEFAULTS_KEY, encoded)?;
        Ok(())
    }

    /// Forget everything this adapter stored.
    pub fn erase(&mut self) -> Result<()> {
        self.storage.delete(NAMESPACE, COUNTERS_KEY)?;
        self.storage.delete(NAMESPACE, FLASH_DEFAULTS_KEY)?;
        Ok(())
    }
}

impl<S: StoragePort> PersistencePort for NvsPersistence<S> {
    fn load_counters(&mut self) -> Counters {
        match self.try_load_counters() {
            Ok(counters) => counters,
            Err(Error::Storage(StorageError::NotFound)) => {
                info!("NvsPersistence: no stored counters, starting from zero");
                Counters::default()
            }
            Err(e) => {
                warn!("NvsPersistence: counters load failed: {}", e);
                Counters::default()
            }
        }
    }

    fn save_counters(&mut self, counters: &Counters) {
        if let Err(e) = self.try_save_counters(counters) {
            warn!("NvsPersistence: counters save failed: {}", e);
        }
    }

    fn load_flash_defaults(&mut self) -> FlashDefaults {
        match self.try_load_flash_defaults() {
            Ok(defaults) => defaults,
            Err(Error::Storage(StorageError::NotFound)) => {
                info!("NvsPersistence: no stored flash defaults");
                FlashDefaults::default()
            }
            Err(e) => {
                warn!("NvsPersistence: flash defaults load failed: {}", e);
                FlashDefaults::default()
            }
        }
    }

    fn save_flash_defaults(&mut self, defaults: &FlashDefaults) {
        if let Err(e) = self.try_save_flash_defaults(defaults) {
            warn!("NvsPersistence: flash defaults save failed: {}", e);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// In-memory backend
// ───────────────────────────────────────────────────────────────

/// [`StoragePort`] held entirely in RAM.  Contents vanish with the value.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    store: HashMap<String, Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }
}

impl StoragePort for MemoryStorage {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> StorageResult<usize> {
        match self.store.get(&Self::composite_key(namespace, key)) {
            Some(v) => {
                let n = v.len().min(buf.len());
                buf[..n].copy_from_slice(&v[..n]);
                Ok(n)
            }
            None => Err(StorageError::NotFound),
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> StorageResult<()> {
        self.store
            .insert(Self::composite_key(namespace, key), data.to_vec());
        Ok(())
    }

    fn delete(&mut self, namespace: &str, key: &str) -> StorageResult<()> {
        self.store.remove(&Self::composite_key(namespace, key));
        Ok(())
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.store.contains_key(&Self::composite_key(namespace, key))
    }
}
