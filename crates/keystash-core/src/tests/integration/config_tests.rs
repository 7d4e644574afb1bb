use serde_json::Value;
use tempfile::tempdir;

use crate::constants::{ENV_DOMAIN, ENV_ROOT};
use crate::error::Result;
use crate::storage::backend::BackendKind;
use crate::storage::config::StorageConfig;

use super::common::{sample_value, KEY};

#[test]
fn test_config_file_then_env_then_open() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("keystash.json");
    let file_root = temp_dir.path().join("from-file");
    let env_root = temp_dir.path().join("from-env");

    let json = serde_json::json!({ "root": file_root, "domain": "file-scope" });
    std::fs::write(&config_path, json.to_string()).expect("Failed to write config");

    let mut config = StorageConfig::load(&config_path)?;
    let env_root_text = env_root.display().to_string();
    config.apply_env_with(|name| match name {
        n if n == ENV_ROOT => Some(env_root_text.clone()),
        n if n == ENV_DOMAIN => Some("env-scope".to_string()),
        _ => None,
    })?;

    assert_eq!(config.backend, BackendKind::File);
    let mut storage = config.open()?;
    assert_eq!(storage.path(), Some(env_root.join("env-scope").as_path()));

    storage.set(KEY, &sample_value())?;
    assert_eq!(storage.get::<_, Value>(KEY)?, Some(sample_value()));
    assert!(!file_root.exists(), "The file root was overridden");

    Ok(())
}
