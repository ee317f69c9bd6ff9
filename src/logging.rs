//! Debug log setup. The terminal belongs to the UI, so events go to a file.

use crate::cache::CacheManager;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG` when set, else `fallback` (the configured `debug.log_level`).
pub fn env_filter(fallback: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(fallback)
            .map_err(|e| eyre!("Invalid log level '{}': {}", fallback, e)),
    }
}

/// Install a global subscriber appending to the cache log file. Returns the log path.
pub fn init_file_logging(cache: &CacheManager, level: &str) -> Result<PathBuf> {
    cache.ensure_cache_dir()?;
    let path = cache.log_file();
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level)?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

    Ok(path)
}

/// Non-interactive runs log to stderr.
pub fn init_stderr_logging(level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| eyre!("Failed to initialize logging: {}", e))
}
