//! crates/logging/src/init.rs
//! Subscriber installation for binaries.

use std::io;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::VerbosityConfig;

/// Environment variable whose `EnvFilter` directives replace the
/// verbosity-derived filter when set.
pub const LOG_ENV: &str = "DELTASYNC_LOG";

/// Builds the filter for `config`, honouring [`LOG_ENV`] when present.
#[must_use]
pub fn build_filter(config: &VerbosityConfig) -> EnvFilter {
    match std::env::var(LOG_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(&directives)
            .unwrap_or_else(|_| EnvFilter::new(config.directives())),
        _ => EnvFilter::new(config.directives()),
    }
}

/// Installs a stderr fmt subscriber filtered by `config`.
///
/// Returns `false` if a global subscriber was already installed, which
/// happens when tests or embedders set up their own.
pub fn init_tracing(config: &VerbosityConfig) -> bool {
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .without_time();

    tracing_subscriber::registry()
        .with(build_filter(config))
        .with(layer)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_renders_config_directives() {
        let config = VerbosityConfig::from_verbose_level(1);
        let filter = build_filter(&config);
        if std::env::var(LOG_ENV).is_err() {
            assert!(filter.to_string().contains("deltasync::stats=info"));
        }
    }

    #[test]
    fn second_init_reports_existing_subscriber() {
        let config = VerbosityConfig::default();
        let _ = init_tracing(&config);
        assert!(!init_tracing(&config));
    }
}
