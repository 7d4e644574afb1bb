mod cli; // Declare the cli module

use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use keystash_core::{BackendKind, StorageConfig};
use log::{debug, info};
use serde_json::Value;

use cli::{CliArgs, Commands};

type CliResult<T> = Result<T, Box<dyn Error>>;

/// Exit code for `get` when the key is absent
const EXIT_ABSENT: u8 = 1;
/// Exit code for any error
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    env_logger::init();

    let args = CliArgs::parse();
    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(args: CliArgs) -> CliResult<ExitCode> {
    let config = build_config(&args)?;
    debug!("Opening storage with {:?}", config);
    let mut storage = config.open()?;

    match &args.command {
        Commands::Path => match storage.path() {
            Some(path) => println!("{}", path.display()),
            None => println!("<memory>"),
        },
        Commands::Id { key } => {
            println!("{}", storage.id(&parse_key(&args, key)?)?);
        }
        Commands::Get { key, strict } => {
            let key = parse_key(&args, key)?;
            let value: Option<Value> = if *strict {
                Some(storage.try_get(&key)?)
            } else {
                storage.get(&key)?
            };
            match value {
                Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                None => return Ok(ExitCode::from(EXIT_ABSENT)),
            }
        }
        Commands::Set { key, value } => {
            let key = parse_key(&args, key)?;
            let value = parse_value(value);
            storage.set(&key, &value)?;
            info!("Stored {}", storage.id(&key)?);
        }
        Commands::Remove { key } => {
            storage.remove(&parse_key(&args, key)?)?;
        }
        Commands::Clear => {
            storage.clear()?;
        }
        Commands::Keys => {
            for id in storage.keys()? {
                println!("{}", id);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Config file, then environment, then command-line flags.
fn build_config(args: &CliArgs) -> CliResult<StorageConfig> {
    let mut config = match &args.config {
        Some(path) => StorageConfig::load(path)?,
        None => StorageConfig::new(),
    };
    config.apply_env()?;

    if let Some(root) = &args.root {
        config.root = Some(root.clone());
    }
    if let Some(domain) = &args.domain {
        config.domain = Some(domain.clone());
    }
    if args.memory {
        config.backend = BackendKind::Memory;
    }
    Ok(config)
}

fn parse_key(args: &CliArgs, raw: &str) -> CliResult<Value> {
    if args.json_key {
        serde_json::from_str(raw).map_err(|e| format!("Invalid JSON key '{}': {}", raw, e).into())
    } else {
        Ok(Value::String(raw.to_string()))
    }
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
