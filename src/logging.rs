//! Logging setup for CliniPick
//!
//! The terminal UI owns stdout and stderr while it runs, so log lines go to
//! `clinipick.log` next to the executable. The file is truncated on every run.
//!
//! Filter priority: `CLINIPICK_LOG`, then `RUST_LOG`, then the level chosen
//! from the `--verbose` flag.

use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "clinipick.log";
const LOG_ENV_VAR: &str = "CLINIPICK_LOG";

/// Get the log file path (same directory as executable)
pub fn log_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(LOG_FILE_NAME)
}

fn open_log_file(path: &PathBuf) -> Option<File> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .ok()
}

fn build_env_filter(verbose: bool) -> EnvFilter {
    if let Ok(directives) = std::env::var(LOG_ENV_VAR) {
        if let Ok(filter) = EnvFilter::try_new(&directives) {
            return filter;
        }
    }

    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let level = if verbose { "debug" } else { "info" };
    EnvFilter::new(format!("clinipick={level},warn"))
}

/// Initialize the global subscriber.
///
/// Silently does nothing if the log file cannot be opened or a subscriber is
/// already installed; logging must never stop the program from starting.
pub fn init(verbose: bool) {
    let mut path = log_path();
    let file = match open_log_file(&path) {
        Some(file) => file,
        None => {
            path = PathBuf::from(LOG_FILE_NAME);
            match open_log_file(&path) {
                Some(file) => file,
                None => return,
            }
        }
    };

    let writer = Arc::new(Mutex::new(file));
    let fmt_layer = fmt::layer()
        .with_writer(move || LogWriter(Arc::clone(&writer)))
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    let installed = tracing_subscriber::registry()
        .with(build_env_filter(verbose))
        .with(fmt_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(path = %path.display(), "logging initialised");
    }
}

/// Write a separator line for readability
pub fn separator(label: &str) {
    tracing::info!("========== {} ==========", label);
}

/// Shared handle to the log file, one per formatted event
struct LogWriter(Arc<Mutex<File>>);

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().flush()
    }
}
