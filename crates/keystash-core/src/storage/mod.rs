pub mod backend;
pub mod config;
pub mod digest;
pub mod file;
pub mod local;
pub mod memory;

/// Re-export key types
pub use backend::{BackendKind, StorageBackend};
pub use config::{ConfigFormat, StorageConfig};
pub use digest::id_of;
pub use file::FileStorage;
pub use local::LocalStorage;
pub use memory::MemoryStorage;
