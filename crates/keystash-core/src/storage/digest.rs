//! Key digest: maps any serializable key to a fixed-length, filesystem-safe id.
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha512};

use crate::constants::DIGEST_HEX_LEN;
use crate::error::{Error, Result};

/// Compute the key id for `key`.
///
/// Strings are hashed as their raw text. Any other key is first rendered as
/// canonical JSON (object members sorted by name) and that text is hashed, so
/// structurally equal keys share an id.
pub fn id_of<K: Serialize + ?Sized>(key: &K) -> Result<String> {
    let value = serde_json::to_value(key).map_err(|source| Error::Serialization {
        what: "key",
        source,
    })?;

    let canonical = match value {
        Value::String(text) => text,
        other => serde_json::to_string(&other).map_err(|source| Error::Serialization {
            what: "key",
            source,
        })?,
    };

    Ok(hash_hex(canonical.as_bytes()))
}

/// SHA-512 of `bytes`, lowercase hex.
pub fn hash_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha512::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Check whether `name` has the shape of a key id.
pub fn is_key_id(name: &str) -> bool {
    name.len() == DIGEST_HEX_LEN
        && name
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
