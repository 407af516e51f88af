//! Key-value persistence collaborator.
//!
//! The store serializes each entity collection independently under its own
//! key. A missing key means an empty default collection, never an error.
//! `DirStore` maps keys to files under a data directory with file locking
//! and atomic replacement.

use crate::Result;
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Flat key-value persistence for opaque serialized blobs
pub trait KeyValueStore {
    /// Load the blob stored under `key`, or `None` if it was never saved
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Save `bytes` under `key`, replacing any previous value
    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<()>;
}

/// Directory-backed store: one file per key
///
/// Saves atomically by:
/// 1. Writing to a temp file in the same directory
/// 2. Syncing to disk
/// 3. Renaming over the previous file
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for DirStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(&path)?;
        // Shared lock for reading
        file.lock_shared()?;

        let mut contents = Vec::new();
        let mut reader = std::io::BufReader::new(&file);
        let read_result = reader.read_to_end(&mut contents);
        file.unlock()?;
        read_result?;

        tracing::debug!("Loaded {} bytes for key '{}'", contents.len(), key);
        Ok(Some(contents))
    }

    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        // Unique temp file in the same directory for atomic rename
        let temp = NamedTempFile::new_in(&self.dir)?;

        // Exclusive lock on the temp file to serialize concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            writer.write_all(bytes)?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        // Atomically replace the old value
        temp.persist(self.path_for(key))
            .map_err(|e| crate::Error::Io(e.error))?;

        tracing::debug!("Saved {} bytes for key '{}'", bytes.len(), key);
        Ok(())
    }
}

/// In-memory store for tests
#[derive(Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}
