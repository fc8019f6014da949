//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins when it is set and parses; otherwise the level passed by
//! the caller applies to this crate and everything else stays at `warn`.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Output shape of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable, one line per event
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Filter directive used when `RUST_LOG` is absent
#[must_use]
pub fn default_directive(level: Level) -> String {
    format!("warn,formprobe={level},formprobe_cli={level}")
}

/// Build the filter from the environment or the fallback level
#[must_use]
pub fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(level)))
}

/// Install the global subscriber, writing to stderr.
///
/// Returns `false` when a subscriber was already installed, which happens
/// when several tests or an embedding binary initialise logging first.
pub fn init(level: Level, format: LogFormat) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Pretty => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    };

    if installed {
        tracing::debug!(%level, ?format, "logging initialised");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_scopes_crates() {
        let directive = default_directive(Level::DEBUG);
        assert_eq!(directive, "warn,formprobe=DEBUG,formprobe_cli=DEBUG");
        assert!(directive.parse::<EnvFilter>().is_ok());
    }

    #[test]
    fn test_init_is_idempotent() {
        let _ = init(Level::INFO, LogFormat::Pretty);
        assert!(!init(Level::INFO, LogFormat::Json));
    }
}
