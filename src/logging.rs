//! Log output setup
//!
//! The TUI owns the terminal, so logs go to a file. The filter defaults to
//! `portalscope=info` and can be overridden with `RUST_LOG`.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "portalscope=info";

/// Default log file location (`~/.cache/portalscope/portalscope.log` on Linux)
///
/// Returns `None` if no home directory can be determined.
pub fn default_log_path() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "portalscope")?;
    Some(project_dirs.cache_dir().join("portalscope.log"))
}

/// Opens `path` for appending, creating parent directories as needed
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global tracing subscriber writing to `path`.
///
/// Logging is best effort: if the file cannot be opened or a subscriber is
/// already installed, the application runs without logs.
pub fn init(path: &Path) {
    let file = match open_log_file(path) {
        Ok(file) => file,
        Err(_) => return,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();

    tracing::info!(path = %path.display(), "logging initialized");
}
