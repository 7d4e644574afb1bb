use std::fmt::{self, Debug};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Which engine a [`StorageBackend`] is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Entries are files under a domain root
    #[default]
    File,
    /// Entries live in process memory
    Memory,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::File => "file",
            BackendKind::Memory => "memory",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "file" | "fs" => Ok(BackendKind::File),
            "memory" | "mem" => Ok(BackendKind::Memory),
            other => Err(Error::config(None, format!("unknown backend '{}'", other))),
        }
    }
}

/// Trait for engines that persist JSON values under key ids.
///
/// Keys are digested by the caller; backends only ever see key ids.
pub trait StorageBackend: Send + Sync + Debug {
    /// Get the kind of this backend
    fn kind(&self) -> BackendKind;

    /// Current domain root, if the backend has one
    fn path(&self) -> Option<&Path>;

    /// Move the backend to a new root
    fn set_path(&mut self, path: &Path) -> Result<()>;

    /// Re-scope the backend to `scope` under its base root
    fn scope_domain(&mut self, scope: &str) -> Result<()>;

    /// Load the value stored under `id`, failing if it is absent or corrupt
    fn load(&self, id: &str) -> Result<Value>;

    /// Store `value` under `id`, replacing any previous value
    fn store(&mut self, id: &str, value: &Value) -> Result<()>;

    /// Delete the value under `id`; absent ids are ignored
    fn delete(&mut self, id: &str) -> Result<()>;

    /// Remove every value in the current domain
    fn clear(&mut self) -> Result<()>;

    /// List the ids currently stored, sorted
    fn ids(&self) -> Result<Vec<String>>;
}
