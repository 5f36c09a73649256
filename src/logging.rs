//! Logging setup for the `dfx` binary.
//!
//! Console output goes to stderr so rendered describer output on stdout stays
//! clean. Files rotate daily in the platform data directory:
//!
//! - `dfx.<date>.log`: everything the filter lets through
//! - `error.<date>.log`: warnings and errors only
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! dfx::logging::init("info")?;
//! tracing::info!("ready");
//! # Ok(())
//! # }
//! ```

use crate::config::APP_DIR;
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

/// Log directory, created on demand.
///
/// - Windows: `%APPDATA%/dfx/logs`
/// - macOS: `~/Library/Application Support/dfx/logs`
/// - Linux: `~/.local/share/dfx/logs`
pub fn get_log_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to determine data directory")?;
    let log_dir = base_dir.join(APP_DIR).join("logs");

    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    }

    Ok(log_dir)
}

fn appender(log_dir: &Path, prefix: &str) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(10)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(log_dir)
        .with_context(|| format!("Failed to create {prefix} log appender"))
}

/// Install the global subscriber. `RUST_LOG` wins over `default_filter`.
///
/// # Errors
///
/// Fails if the log directory or the file appenders cannot be created, or if
/// `default_filter` is not a valid filter directive.
pub fn init(default_filter: &str) -> Result<()> {
    let log_dir = get_log_dir()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .context("Failed to create env filter")?;

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_writer(std::io::stderr)
        .pretty();

    let all_logs_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(appender(&log_dir, APP_DIR)?);

    let error_logs_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false)
        .with_writer(appender(&log_dir, "error")?)
        .with_filter(EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(all_logs_layer)
        .with(error_logs_layer)
        .init();

    tracing::debug!(log_dir = %log_dir.display(), "Logging initialized");
    Ok(())
}
