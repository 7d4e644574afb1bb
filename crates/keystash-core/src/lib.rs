//! # Keystash Core
//!
//! Key-value persistence with JSON values. Keys are hashed (SHA-512) into
//! filesystem-safe ids, and [`FileStorage`] keeps one file per id under a
//! domain root. [`LocalStorage`] puts a backend-agnostic facade with change
//! notifications on top.
//!
//! ```no_run
//! use keystash_core::LocalStorage;
//!
//! # fn main() -> keystash_core::Result<()> {
//! let mut storage = LocalStorage::file(std::env::temp_dir().join("localstorage"))?;
//! storage.domain("my-app")?;
//! storage.set("greeting", "hello")?;
//! let greeting: Option<String> = storage.get("greeting")?;
//! assert_eq!(greeting.as_deref(), Some("hello"));
//! # Ok(())
//! # }
//! ```
pub mod constants;
pub mod error;
pub mod event;
pub mod storage;

pub use error::{Error, Result};
pub use event::{ListenerId, StorageEvent};
pub use storage::{
    BackendKind, ConfigFormat, FileStorage, LocalStorage, MemoryStorage, StorageBackend,
    StorageConfig,
};

#[cfg(test)]
mod tests;
