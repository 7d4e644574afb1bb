use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};

use crate::storage::local::LocalStorage;

pub const KEY: &str = "test_key";

/// Value used across the storage scenarios
pub fn sample_value() -> Value {
    json!({ "value": true, "value1": 9, "value3": 9.4, "value4": "test" })
}

/// File-backed storage scoped to `unit-tests`, cleared, with `test` = 1
pub fn setup_test_environment() -> (TempDir, LocalStorage) {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let mut storage = LocalStorage::file(temp_dir.path()).expect("Failed to open storage");

    storage.domain("unit-tests").expect("Failed to scope domain");
    storage.clear().expect("Failed to clear storage");
    storage.set("test", &1).expect("Failed to seed storage");

    (temp_dir, storage)
}
