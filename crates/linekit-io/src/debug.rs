//! Debug logging to a file.
//!
//! The editor logs through the `log` facade. Setting `LINEKIT_DEBUG=1` (or
//! `true`) routes those records to `tmp/linekit-debug.log` when a `tmp/`
//! directory exists, otherwise to `/tmp/linekit-debug.log`. The terminal
//! itself is never written to, since it belongs to the line being edited.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Once;

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

static INIT: Once = Once::new();

pub const ENV_ENABLE_LOG: &str = "LINEKIT_DEBUG";

/// Whether an `LINEKIT_DEBUG` value turns logging on.
pub fn is_enabled_value(value: &str) -> bool {
    value == "true" || value == "1"
}

/// Where the log file goes.
pub fn log_path() -> PathBuf {
    if Path::new("tmp").exists() {
        PathBuf::from("tmp/linekit-debug.log")
    } else {
        PathBuf::from("/tmp/linekit-debug.log")
    }
}

/// Install the file logger if `LINEKIT_DEBUG` asks for it.
///
/// Safe to call more than once; only the first call has any effect. Does
/// nothing when another logger is already installed.
pub fn init_debug_logging() {
    INIT.call_once(|| {
        let enabled = std::env::var(ENV_ENABLE_LOG)
            .map(|value| is_enabled_value(&value))
            .unwrap_or(false);
        if !enabled {
            return;
        }

        let path = log_path();
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => {
                let config = ConfigBuilder::new().set_time_format_rfc3339().build();
                if WriteLogger::init(LevelFilter::Trace, config, file).is_ok() {
                    eprintln!("linekit debug log enabled: {}", path.display());
                }
            }
            Err(e) => {
                eprintln!("Failed to open debug log file {}: {e}", path.display());
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_values() {
        assert!(is_enabled_value("1"));
        assert!(is_enabled_value("true"));
        assert!(!is_enabled_value("0"));
        assert!(!is_enabled_value("yes"));
    }

    #[test]
    fn test_log_path_file_name() {
        assert_eq!(
            log_path().file_name().and_then(|n| n.to_str()),
            Some("linekit-debug.log")
        );
    }
}
