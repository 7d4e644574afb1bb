use std::fs;

use serde_json::Value;

use crate::error::Result;
use crate::storage::file::FileStorage;
use crate::storage::local::LocalStorage;

use super::common::{sample_value, setup_test_environment, KEY};

#[test]
fn test_storage_lifecycle() -> Result<()> {
    let (temp_dir, mut storage) = setup_test_environment();

    // Path
    assert_eq!(storage.path(), Some(temp_dir.path().join("unit-tests").as_path()));

    // Id
    assert_ne!(storage.id(KEY)?, KEY);

    // Set
    storage.set(KEY, &sample_value())?;
    assert!(storage.includes(KEY)?);

    // Get
    assert_eq!(storage.get::<_, Value>(KEY)?, Some(sample_value()));

    // Remove
    storage.remove("test")?;
    assert!(!storage.includes("test")?);
    assert!(storage.includes(KEY)?);

    // Clear
    storage.clear()?;
    assert!(!storage.includes(KEY)?);

    storage.set("unit_tests", &true)?;
    assert_eq!(storage.get::<_, bool>("unit_tests")?, Some(true));

    Ok(())
}

#[test]
fn test_entries_survive_reopen() -> Result<()> {
    let (temp_dir, mut storage) = setup_test_environment();
    storage.set(KEY, &sample_value())?;
    drop(storage);

    let mut reopened = LocalStorage::file(temp_dir.path())?;
    assert!(!reopened.includes(KEY)?, "Base root does not see scoped entries");

    reopened.domain("unit-tests")?;
    assert_eq!(reopened.get::<_, Value>(KEY)?, Some(sample_value()));
    assert_eq!(reopened.get::<_, i32>("test")?, Some(1));

    Ok(())
}

#[test]
fn test_facade_and_engine_share_layout() -> Result<()> {
    let (temp_dir, mut storage) = setup_test_environment();
    storage.set(KEY, &sample_value())?;

    let mut engine = FileStorage::new(temp_dir.path())?;
    engine.scope_domain("unit-tests")?;

    assert_eq!(engine.get::<_, Value>(KEY)?, Some(sample_value()));
    assert_eq!(engine.ids()?, storage.keys()?);

    let on_disk = fs::read_to_string(engine.entry_path(KEY)?).expect("Failed to read entry");
    assert!(on_disk.starts_with("{\n    \""), "Entries are indented with four spaces");

    Ok(())
}

#[test]
fn test_domains_isolate_consumers() -> Result<()> {
    let (temp_dir, mut first) = setup_test_environment();
    let mut second = LocalStorage::file(temp_dir.path())?;
    second.domain("another-app")?;

    second.set(KEY, "theirs")?;
    first.set(KEY, "ours")?;

    assert_eq!(first.get::<_, String>(KEY)?.as_deref(), Some("ours"));
    assert_eq!(second.get::<_, String>(KEY)?.as_deref(), Some("theirs"));

    first.clear()?;
    assert_eq!(second.get::<_, String>(KEY)?.as_deref(), Some("theirs"));

    Ok(())
}
