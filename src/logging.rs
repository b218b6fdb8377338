//! Process-wide tracing setup
//!
//! Transfer events carry their context as fields (`sender`, `receiver`,
//! `amount`, `idempotency_key`, `stage`). JSON output flattens those fields to
//! top-level keys so a single transfer can be followed by key.

use anyhow::{Context, Result, bail};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::AppConfig;

/// sqlx logs every statement at info; a transfer issues several
const QUIET_DEPENDENCIES: &str = "sqlx=warn";

pub fn log_rotation(name: &str) -> Result<Rotation> {
    Ok(match name {
        "hourly" => Rotation::HOURLY,
        "daily" => Rotation::DAILY,
        "never" => Rotation::NEVER,
        other => bail!("unknown log rotation '{other}' (expected hourly, daily or never)"),
    })
}

/// Configured level with dependency noise turned down. `RUST_LOG` wins.
pub fn default_filter(log_level: &str) -> String {
    format!("{log_level},{QUIET_DEPENDENCIES}")
}

/// Install the global subscriber. Hold the returned guard for the life of
/// the process or buffered file output is lost.
pub fn init_logging(config: &AppConfig) -> Result<WorkerGuard> {
    let file_appender = RollingFileAppender::builder()
        .rotation(log_rotation(&config.rotation)?)
        .filename_prefix(&config.log_file)
        .build(&config.log_dir)
        .with_context(|| format!("Failed to open log directory {}", config.log_dir))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&config.log_level)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.use_json {
        let file_layer = fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .with_target(true)
            .with_writer(non_blocking);
        registry.with(file_layer).init();
    } else {
        let file_layer = fmt::layer()
            .with_target(true)
            .with_writer(non_blocking)
            .with_ansi(false);
        let stdout_layer = fmt::layer().compact().with_target(false);
        registry.with(file_layer).with(stdout_layer).init();
    }

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_rotations() {
        assert_eq!(log_rotation("hourly").unwrap(), Rotation::HOURLY);
        assert_eq!(log_rotation("daily").unwrap(), Rotation::DAILY);
        assert_eq!(log_rotation("never").unwrap(), Rotation::NEVER);
    }

    #[test]
    fn test_unknown_rotation_rejected() {
        let err = log_rotation("weekly").unwrap_err();
        assert!(err.to_string().contains("weekly"));
    }

    #[test]
    fn test_default_filter_parses() {
        let directives = default_filter("info,wallet_engine=debug");
        assert_eq!(directives, "info,wallet_engine=debug,sqlx=warn");
        assert!(EnvFilter::try_new(&directives).is_ok());
    }
}
