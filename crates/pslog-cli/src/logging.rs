//! Logging setup
//!
//! Logs go to the configured log file, or to stderr when none is set.

use std::fs::OpenOptions;
use std::sync::Mutex;

use pslog_core::Config;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber; later calls are ignored
pub fn init(config: &Config) {
    let env_filter = filter_for(&config.log_level);

    match &config.log_file {
        Some(path) => {
            let log_file = match OpenOptions::new().create(true).append(true).open(path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not open log file {:?}: {}", path, e);
                    return;
                }
            };

            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(log_file))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }

    debug!("Logging initialized at level {}", config.log_level);
}

/// Filter for our own crates at `level`, falling back to warn if unparseable
fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_new(format!("pslog_core={},pslog_cli={}", level, level))
        .unwrap_or_else(|_| EnvFilter::new("pslog_core=warn,pslog_cli=warn"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_for_levels() {
        let filter = filter_for("debug").to_string();
        assert!(filter.contains("pslog_core=debug"));
        assert!(filter.contains("pslog_cli=debug"));
    }

    #[test]
    fn test_filter_for_bad_level_falls_back() {
        let filter = filter_for("banana").to_string();
        assert!(filter.contains("pslog_core=warn"));
    }
}
