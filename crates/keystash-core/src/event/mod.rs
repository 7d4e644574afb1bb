pub mod dispatcher;

use serde_json::Value;

/// Type for listener identifiers
pub type ListenerId = u64;

/// Callback invoked when the value under a key changes
pub type Listener = Box<dyn Fn(&StorageEvent) + Send + Sync>;

/// A change made through the storage facade
#[derive(Debug, Clone, PartialEq)]
pub struct StorageEvent {
    /// Key id the change applies to
    pub id: String,
    /// Value before the change, if there was one
    pub old_value: Option<Value>,
    /// Value after the change; `None` for removals
    pub new_value: Option<Value>,
    /// Where the change came from (the working directory for file storage)
    pub origin: String,
}

impl StorageEvent {
    pub fn is_removal(&self) -> bool {
        self.new_value.is_none()
    }
}

/// Re-export important types
pub use dispatcher::ChangeDispatcher;
