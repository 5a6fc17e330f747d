//! Diagnostic logging setup.
//!
//! The interactive UI owns the terminal, so log output only ever goes to a
//! file named on the command line. Without one, no subscriber is installed
//! and `tracing` macros are no-ops.

use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "SHADOWCODER_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

pub fn init_tracing(log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| err.to_string())?;
    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_file_means_no_subscriber() {
        assert!(init_tracing(None).is_ok());
    }

    #[test]
    fn unwritable_path_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("no-such-dir").join("debug.log");
        assert!(init_tracing(Some(&missing)).is_err());
    }
}
