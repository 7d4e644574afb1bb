use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

use log::{debug, info, trace};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::constants::{DEFAULT_DIR_NAME, ENTRY_INDENT};
use crate::error::{Error, Result};
use crate::storage::backend::{BackendKind, StorageBackend};
use crate::storage::digest;

/// Filesystem storage engine.
///
/// Every entry is a flat file directly under the domain root, named by the
/// key id and holding the value as pretty-printed JSON. Nothing is cached:
/// every call goes to disk.
///
/// `scope_domain` always re-derives the domain root from the base root, so
/// `scope_domain("a")` followed by `scope_domain("b")` lands in
/// `base_root/b`, never `base_root/a/b`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
    base_root: PathBuf,
}

impl FileStorage {
    /// Open storage rooted at `path`, creating the directory if needed.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let root = resolve(path.as_ref())?;
        create_root(&root)?;
        Ok(Self {
            base_root: root.clone(),
            root,
        })
    }

    /// Open storage in the default location under the platform temp dir.
    pub fn open_default() -> Result<Self> {
        Self::new(default_root())
    }

    /// Current domain root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Root that domains are derived from
    pub fn base_root(&self) -> &Path {
        &self.base_root
    }

    /// Point the storage at a new root. Resets any domain scope.
    pub fn set_root(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let root = resolve(path.as_ref())?;
        create_root(&root)?;
        if root != self.root {
            info!("Storage root set to {}", root.display());
        }
        self.base_root = root.clone();
        self.root = root;
        Ok(())
    }

    /// Scope the storage to `base_root/scope`.
    pub fn scope_domain(&mut self, scope: &str) -> Result<()> {
        let relative = validate_scope(scope)?;
        let root = self.base_root.join(relative);
        create_root(&root)?;
        info!("Storage domain scoped to '{}' ({})", scope, root.display());
        self.root = root;
        Ok(())
    }

    /// Key id for `key`
    pub fn id_of<K: Serialize + ?Sized>(&self, key: &K) -> Result<String> {
        digest::id_of(key)
    }

    /// Path the entry for `key` lives at in the current domain
    pub fn entry_path<K: Serialize + ?Sized>(&self, key: &K) -> Result<PathBuf> {
        Ok(self.root.join(digest::id_of(key)?))
    }

    /// Read the value for `key`, treating a missing or unreadable entry as absent.
    pub fn get<K, V>(&self, key: &K) -> Result<Option<V>>
    where
        K: Serialize + ?Sized,
        V: DeserializeOwned,
    {
        let id = digest::id_of(key)?;
        lenient(self.load_id(&id))
    }

    /// Read the value for `key`, surfacing why it could not be read.
    pub fn try_get<K, V>(&self, key: &K) -> Result<V>
    where
        K: Serialize + ?Sized,
        V: DeserializeOwned,
    {
        let id = digest::id_of(key)?;
        self.load_id(&id)
    }

    pub fn contains<K: Serialize + ?Sized>(&self, key: &K) -> Result<bool> {
        Ok(self.get::<K, Value>(key)?.is_some())
    }

    /// Write `value` for `key`, replacing the whole entry.
    pub fn set<K, V>(&self, key: &K, value: &V) -> Result<()>
    where
        K: Serialize + ?Sized,
        V: Serialize + ?Sized,
    {
        let id = digest::id_of(key)?;
        self.store_id(&id, value)
    }

    /// Delete the entry for `key`. Missing entries are not an error.
    pub fn remove<K: Serialize + ?Sized>(&self, key: &K) -> Result<()> {
        let id = digest::id_of(key)?;
        self.delete_id(&id)
    }

    /// Delete the whole domain root and recreate it empty.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(Error::io(e, "remove_dir_all", &self.root)),
        }
        create_root(&self.root)?;
        info!("Cleared storage at {}", self.root.display());
        Ok(())
    }

    /// Ids of the entries stored in the current domain, sorted.
    pub fn ids(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::io(e, "read_dir", &self.root)),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(e, "read_dir_entry", &self.root))?;
            let file_type = entry
                .file_type()
                .map_err(|e| Error::io(e, "file_type", entry.path()))?;
            if !file_type.is_file() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) if digest::is_key_id(name) => ids.push(name.to_string()),
                _ => trace!("Skipping non-entry file {}", entry.path().display()),
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn load_id<V: DeserializeOwned>(&self, id: &str) -> Result<V> {
        let path = self.root.join(id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::NotFound {
                    id: id.to_string(),
                    path: Some(path),
                });
            }
            Err(e) => return Err(Error::io(e, "read_entry", path)),
        };
        serde_json::from_slice(&bytes).map_err(|source| Error::Deserialization {
            path: Some(path),
            source,
        })
    }

    fn store_id<V: Serialize + ?Sized>(&self, id: &str, value: &V) -> Result<()> {
        let contents = encode_entry(value)?;

        // The root may have been removed behind our back.
        create_root(&self.root)?;

        let path = self.root.join(id);
        let mut temp_file = NamedTempFile::new_in(&self.root)
            .map_err(|e| Error::io(e, "create_temp_file", &self.root))?;
        temp_file
            .write_all(&contents)
            .map_err(|e| Error::io(e, "write_temp_file", temp_file.path()))?;
        temp_file
            .persist(&path)
            .map_err(|e| Error::io(e.error, "persist_temp_file", &path))?;

        debug!("Wrote entry {} ({} bytes)", path.display(), contents.len());
        Ok(())
    }

    fn delete_id(&self, id: &str) -> Result<()> {
        let path = self.root.join(id);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed entry {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io(e, "remove_file", path)),
        }
    }
}

impl StorageBackend for FileStorage {
    fn kind(&self) -> BackendKind {
        BackendKind::File
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.root)
    }

    fn set_path(&mut self, path: &Path) -> Result<()> {
        self.set_root(path)
    }

    fn scope_domain(&mut self, scope: &str) -> Result<()> {
        FileStorage::scope_domain(self, scope)
    }

    fn load(&self, id: &str) -> Result<Value> {
        self.load_id(id)
    }

    fn store(&mut self, id: &str, value: &Value) -> Result<()> {
        self.store_id(id, value)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.delete_id(id)
    }

    fn clear(&mut self) -> Result<()> {
        FileStorage::clear(self)
    }

    fn ids(&self) -> Result<Vec<String>> {
        FileStorage::ids(self)
    }
}

/// `<temp dir>/localstorage`
pub fn default_root() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DIR_NAME)
}

/// Fold read-side failures into `None`.
pub(crate) fn lenient<V>(result: Result<V>) -> Result<Option<V>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_read_failure() => {
            debug!("Treating unreadable entry as absent: {}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Serialize `value` as JSON with a four-space indent.
pub(crate) fn encode_entry<V: Serialize + ?Sized>(value: &V) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(ENTRY_INDENT));
    value
        .serialize(&mut serializer)
        .map_err(|source| Error::Serialization {
            what: "value",
            source,
        })?;
    Ok(buf)
}

/// Absolute form of `path` with `.` and `..` folded lexically. The path
/// need not exist yet, so symlinks are left alone.
pub(crate) fn resolve(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path).map_err(|e| Error::io(e, "resolve_path", path))?;
    let mut resolved = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other),
        }
    }
    Ok(resolved)
}

fn create_root(root: &Path) -> Result<()> {
    fs::create_dir_all(root).map_err(|e| Error::io(e, "create_dir_all", root))
}

fn validate_scope(scope: &str) -> Result<&Path> {
    let invalid = |reason: &str| Error::InvalidScope {
        scope: scope.to_string(),
        reason: reason.to_string(),
    };

    let path = Path::new(scope);
    let mut normal = 0;
    for component in path.components() {
        match component {
            Component::Normal(_) => normal += 1,
            Component::CurDir => {}
            Component::ParentDir => return Err(invalid("must not contain '..'")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("must be a relative path"));
            }
        }
    }
    if normal == 0 {
        return Err(invalid("must name a directory"));
    }
    Ok(path)
}
