//! Tracing initialization.
//!
//! Sets up tracing-subscriber with an env filter and a compact fmt layer
//! on stderr. `RUST_LOG` wins over the configured level when set; an
//! invalid `RUST_LOG` is an error, not a silent fallback.

pub mod work;

use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Configuration for telemetry initialization.
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. "info", "workq=debug").
    pub log_level: String,
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the filter directive is invalid or a global
/// subscriber was already installed.
pub fn init_telemetry(config: TelemetryConfig) -> Result<()> {
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let env_filter = build_filter(std::env::var("RUST_LOG").ok(), &config.log_level)?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| Error::Other(format!("failed to init tracing subscriber: {e}")))
}

/// Filter from `RUST_LOG` if it is set, else from `log_level`.
fn build_filter(rust_log: Option<String>, log_level: &str) -> Result<EnvFilter> {
    let (source, directives) = match rust_log.as_deref() {
        Some(directives) if !directives.trim().is_empty() => ("RUST_LOG", directives),
        _ => ("log level", log_level),
    };
    EnvFilter::try_new(directives)
        .map_err(|e| Error::Config(format!("invalid {source} {directives:?}: {e}")))
}
