use std::collections::HashMap;
use std::path::Path;

use log::debug;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::storage::backend::{BackendKind, StorageBackend};
use crate::storage::file::encode_entry;

/// In-process storage engine.
///
/// Values are kept as the same JSON bytes the filesystem engine would write,
/// so both engines accept and reject exactly the same values. There is no
/// root: path and domain changes are ignored.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, Vec<u8>>,
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

impl StorageBackend for MemoryStorage {
    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    fn path(&self) -> Option<&Path> {
        None
    }

    fn set_path(&mut self, path: &Path) -> Result<()> {
        debug!("Memory storage ignores path {}", path.display());
        Ok(())
    }

    fn scope_domain(&mut self, scope: &str) -> Result<()> {
        debug!("Memory storage ignores domain '{}'", scope);
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Value> {
        let bytes = self.entries.get(id).ok_or_else(|| Error::NotFound {
            id: id.to_string(),
            path: None,
        })?;
        serde_json::from_slice(bytes).map_err(|source| Error::Deserialization { path: None, source })
    }

    fn store(&mut self, id: &str, value: &Value) -> Result<()> {
        let bytes = encode_entry(value)?;
        self.entries.insert(id.to_string(), bytes);
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.entries.remove(id);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }

    fn ids(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self.entries.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
