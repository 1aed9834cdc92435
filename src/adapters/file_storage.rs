//! Directory-backed key-value storage for host builds.
//!
//! Each `namespace/key` pair is one file under the root directory.  Writes
//! go to a temporary sibling first and are renamed into place, so a crash
//! mid-write leaves either the old value or the new one, never a torn blob.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::app::ports::{StorageError, StoragePort, StorageResult};

pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Use `root` as the storage directory, creating it if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .with_context(|| format!("creating storage directory {}", root.display()))?;
        info!("FileStorage: using {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, namespace: &str, key: &str) -> PathBuf {
        self.root.join(namespace).join(key)
    }
}

fn map_io(e: &std::io::Error) -> StorageError {
    match e.kind() {
        ErrorKind::NotFound => StorageError::NotFound,
        ErrorKind::StorageFull => StorageError::Full,
        _ => StorageError::IoError,
    }
}

impl StoragePort for FileStorage {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> StorageResult<usize> {
        let data = fs::read(self.path_for(namespace, key)).map_err(|e| map_io(&e))?;
        let n = data.len().min(buf.len());
        buf[..n].copy_from_slice(&data[..n]);
        Ok(n)
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> StorageResult<()> {
        let path = self.path_for(namespace, key);
        let dir = self.root.join(namespace);
        let tmp = dir.join(format!(".{key}.tmp"));

        let res = fs::create_dir_all(&dir)
            .and_then(|()| fs::write(&tmp, data))
            .and_then(|()| fs::rename(&tmp, &path));
        res.map_err(|e| {
            warn!("FileStorage: write {} failed: {}", path.display(), e);
            map_io(&e)
        })
    }

    fn delete(&mut self, namespace: &str, key: &str) -> StorageResult<()> {
        match fs::remove_file(self.path_for(namespace, key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_io(&e)),
        }
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.path_for(namespace, key).is_file()
    }
}
