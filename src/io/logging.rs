use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Path of the diagnostic log inside a data directory
pub fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join("jot.log")
}

/// Route `tracing` output to `<data_dir>/jot.log`.
///
/// The terminal belongs to the TUI, so nothing is ever written to stdout or
/// stderr. `RUST_LOG` directives are honoured on top of the base level.
/// Failure to set up logging is reported to the caller but is never fatal.
pub fn init_logging(data_dir: &Path, verbose: bool) -> std::io::Result<()> {
    fs::create_dir_all(data_dir)?;
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path(data_dir))?;

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    let subscriber = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .finish();

    // A second init (e.g. in tests) leaves the first subscriber in place
    let _ = tracing::subscriber::set_global_default(subscriber);
    Ok(())
}
