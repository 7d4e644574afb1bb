/// Directory created under the platform temp dir when no root is configured
pub const DEFAULT_DIR_NAME: &str = "localstorage";

/// Length of a hex-encoded SHA-512 key id
pub const DIGEST_HEX_LEN: usize = 128;

/// Indentation used when writing entries
pub const ENTRY_INDENT: &[u8] = b"    ";

/// Environment variable overriding the storage root
pub const ENV_ROOT: &str = "KEYSTASH_ROOT";

/// Environment variable selecting the domain scope
pub const ENV_DOMAIN: &str = "KEYSTASH_DOMAIN";

/// Environment variable selecting the backend (`file` or `memory`)
pub const ENV_BACKEND: &str = "KEYSTASH_BACKEND";
