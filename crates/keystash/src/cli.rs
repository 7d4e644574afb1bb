use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Keystash: inspect and edit a keystash store from the shell
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Storage root (overrides the config file and KEYSTASH_ROOT)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Domain scope under the root
    #[arg(long, global = true)]
    pub domain: Option<String>,

    /// Configuration file (.json, .yaml or .toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Use throwaway in-memory storage
    #[arg(long, global = true)]
    pub memory: bool,

    /// Parse KEY arguments as JSON instead of plain text
    #[arg(long, global = true)]
    pub json_key: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the active domain root
    Path,
    /// Print the id (and file name) a key maps to
    Id {
        key: String,
    },
    /// Print the value stored for a key
    Get {
        key: String,
        /// Report why a value could not be read instead of treating it as absent
        #[arg(long)]
        strict: bool,
    },
    /// Store a value; text that is not valid JSON is stored as a string
    Set {
        key: String,
        value: String,
    },
    /// Remove a key
    Remove {
        key: String,
    },
    /// Remove every entry in the active domain
    Clear,
    /// List the ids stored in the active domain
    Keys,
}
