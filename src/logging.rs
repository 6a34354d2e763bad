//! Log setup.
//!
//! Logging is off unless a file is configured: writing to stdout/stderr
//! would corrupt the terminal UI.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "LIVESCROLL_LOG";

/// `LIVESCROLL_LOG` wins over the config file's `log_file`.
pub fn log_path(configured: Option<&Path>) -> Option<PathBuf> {
    std::env::var_os(LOG_ENV)
        .map(PathBuf::from)
        .or_else(|| configured.map(Path::to_path_buf))
}

/// Install a file-backed subscriber.  The filter defaults to `info` and
/// follows `RUST_LOG` when set.
pub fn init(path: Option<PathBuf>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = std::fs::File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
    Ok(())
}
