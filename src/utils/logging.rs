//! File-backed tracing setup. The terminal belongs to the UI, so log lines
//! go to ~/.demo-walkthrough/demo.log.

use super::persistence;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "demo.log";

/// Environment variable holding the filter directive (e.g. `debug`).
pub const LOG_ENV: &str = "DEMO_LOG";

/// Installs the global subscriber. Returns the log file path.
pub fn init() -> io::Result<PathBuf> {
    let path = persistence::save_path(LOG_FILE)?;
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    Ok(path)
}
