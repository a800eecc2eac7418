//! Tracing setup
//!
//! The dashboard owns the terminal, so in interactive mode log output goes
//! to `<cache dir>/allgit/allgit.log` instead of stderr.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init(verbose: bool, interactive: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if !interactive {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
        return Ok(());
    }

    let Some(path) = log_file_path() else {
        // nowhere to write; stay silent rather than corrupt the display
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(filter)
        .init();

    Ok(())
}

/// Returns `~/.cache/allgit/allgit.log` on Unix
pub fn log_file_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|p| p.join("allgit").join("allgit.log"))
}
