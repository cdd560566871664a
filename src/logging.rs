//! Logging init: file under the XDG state dir, or stderr when unavailable.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,pacer=debug"))
}

/// Initialize structured logging to `~/.local/state/pacer/pacer.log`,
/// falling back to stderr when the state dir cannot be used.
pub fn init() {
    match open_log_file() {
        Ok((file, path)) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(BoxMakeWriter::new(Mutex::new(file)))
                .with_ansi(false)
                .init();
            tracing::info!("pacer logging initialized at {}", path.display());
        }
        Err(err) => {
            init_stderr();
            tracing::warn!(error = %err, "log file unavailable, logging to stderr");
        }
    }
}

/// Initialize logging to stderr only (no file).
pub fn init_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn open_log_file() -> Result<(fs::File, PathBuf)> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pacer")?;
    let log_dir = xdg_dirs.get_state_home();
    fs::create_dir_all(&log_dir)?;
    let path = log_dir.join("pacer.log");
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    Ok((file, path))
}
