use std::path::Path;

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::event::{ChangeDispatcher, ListenerId, StorageEvent};
use crate::storage::backend::{BackendKind, StorageBackend};
use crate::storage::config::StorageConfig;
use crate::storage::digest;
use crate::storage::file::{lenient, FileStorage};
use crate::storage::memory::MemoryStorage;

/// Key-value storage facade.
///
/// Wraps one [`StorageBackend`], chosen when the facade is built, and
/// notifies listeners registered with [`LocalStorage::on`] whenever `set` or
/// `remove` changes a key. Keys may be any serializable value; see
/// [`digest::id_of`] for how they are turned into ids.
#[derive(Debug)]
pub struct LocalStorage {
    backend: Box<dyn StorageBackend>,
    events: ChangeDispatcher,
    origin: String,
}

impl LocalStorage {
    /// Facade over a [`FileStorage`] rooted at `path`
    pub fn file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::with_backend(Box::new(FileStorage::new(path)?)))
    }

    /// Facade over an empty [`MemoryStorage`]
    pub fn memory() -> Self {
        Self::with_backend(Box::new(MemoryStorage::new()))
    }

    /// Facade over whichever backend `config` selects
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        config.open()
    }

    pub fn with_backend(backend: Box<dyn StorageBackend>) -> Self {
        let origin = match backend.kind() {
            BackendKind::File => std::env::current_dir()
                .map(|dir| dir.display().to_string())
                .unwrap_or_else(|_| String::from(".")),
            BackendKind::Memory => String::from("memory"),
        };
        Self {
            backend,
            events: ChangeDispatcher::new(),
            origin,
        }
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn is_file_backed(&self) -> bool {
        self.backend.kind() == BackendKind::File
    }

    /// Current domain root, `None` when not file-backed
    pub fn path(&self) -> Option<&Path> {
        self.backend.path()
    }

    pub fn set_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.backend.set_path(path.as_ref())
    }

    /// Scope storage to `scope` so other consumers on the machine do not
    /// collide with us. Call before any reads or writes.
    pub fn domain(&mut self, scope: &str) -> Result<()> {
        self.backend.scope_domain(scope)
    }

    /// Underlying key id for `key`
    pub fn id<K: Serialize + ?Sized>(&self, key: &K) -> Result<String> {
        digest::id_of(key)
    }

    /// Value for `key`, or `None` if it is missing or unreadable.
    pub fn get<K, V>(&self, key: &K) -> Result<Option<V>>
    where
        K: Serialize + ?Sized,
        V: DeserializeOwned,
    {
        let id = digest::id_of(key)?;
        lenient(self.load(&id))
    }

    /// Value for `key`, with the reason it could not be read as the error.
    pub fn try_get<K, V>(&self, key: &K) -> Result<V>
    where
        K: Serialize + ?Sized,
        V: DeserializeOwned,
    {
        let id = digest::id_of(key)?;
        self.load(&id)
    }

    pub fn includes<K: Serialize + ?Sized>(&self, key: &K) -> Result<bool> {
        Ok(self.get::<K, Value>(key)?.is_some())
    }

    #[deprecated(note = "use `includes` instead")]
    pub fn has<K: Serialize + ?Sized>(&self, key: &K) -> Result<bool> {
        self.includes(key)
    }

    pub fn set<K, V>(&mut self, key: &K, value: &V) -> Result<()>
    where
        K: Serialize + ?Sized,
        V: Serialize + ?Sized,
    {
        let id = digest::id_of(key)?;
        let new_value = serde_json::to_value(value).map_err(|source| Error::Serialization {
            what: "value",
            source,
        })?;
        let old_value = lenient(self.backend.load(&id))?;

        self.backend.store(&id, &new_value)?;
        self.notify(id, old_value, Some(new_value));
        Ok(())
    }

    pub fn remove<K: Serialize + ?Sized>(&mut self, key: &K) -> Result<()> {
        let id = digest::id_of(key)?;
        let old_value = lenient(self.backend.load(&id))?;

        self.backend.delete(&id)?;
        self.notify(id, old_value, None);
        Ok(())
    }

    /// Remove everything in the current domain. Listeners are not notified.
    pub fn clear(&mut self) -> Result<()> {
        self.backend.clear()
    }

    /// Ids of the entries currently stored
    pub fn keys(&self) -> Result<Vec<String>> {
        self.backend.ids()
    }

    /// Listen for changes to `key`.
    pub fn on<K, F>(&mut self, key: &K, listener: F) -> Result<ListenerId>
    where
        K: Serialize + ?Sized,
        F: Fn(&StorageEvent) + Send + Sync + 'static,
    {
        let id = digest::id_of(key)?;
        Ok(self.events.subscribe(&id, Box::new(listener)))
    }

    /// Listen for the next change to `key` only.
    pub fn once<K, F>(&mut self, key: &K, listener: F) -> Result<ListenerId>
    where
        K: Serialize + ?Sized,
        F: Fn(&StorageEvent) + Send + Sync + 'static,
    {
        let id = digest::id_of(key)?;
        Ok(self.events.subscribe_once(&id, Box::new(listener)))
    }

    /// Remove a listener added with `on` or `once`.
    pub fn off(&mut self, listener: ListenerId) -> bool {
        self.events.unsubscribe(listener)
    }

    fn load<V: DeserializeOwned>(&self, id: &str) -> Result<V> {
        let value = self.backend.load(id)?;
        serde_json::from_value(value).map_err(|source| Error::Deserialization {
            path: self.backend.path().map(|root| root.join(id)),
            source,
        })
    }

    fn notify(&mut self, id: String, old_value: Option<Value>, new_value: Option<Value>) {
        if self.events.listener_count(&id) == 0 {
            return;
        }
        let event = StorageEvent {
            id,
            old_value,
            new_value,
            origin: self.origin.clone(),
        };
        let delivered = self.events.emit(&event);
        debug!("Change to {} delivered to {} listener(s)", event.id, delivered);
    }
}
