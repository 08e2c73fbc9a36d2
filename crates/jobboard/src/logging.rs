//! Logging setup.
//!
//! The library logs through the `log` macros and opens `tracing` spans around
//! board operations. `init_logging` installs a `tracing-subscriber` registry
//! and bridges `log` records into it with `tracing_log::LogTracer`.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::{LogFormat, LoggingConfig};

/// Noisy dependencies capped regardless of the configured level.
const QUIET_TARGETS: &[(&str, &str)] = &[
    ("hyper", "warn"),
    ("hyper_util", "warn"),
    ("reqwest", "warn"),
    ("rustls", "warn"),
    ("h2", "warn"),
];

/// Builds the filter: `RUST_LOG` wins when set, otherwise the configured
/// level plus the quiet-target caps.
pub fn build_env_filter(level: &str) -> Result<EnvFilter, String> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut directives = vec![level.to_string()];
    for (target, lvl) in QUIET_TARGETS {
        directives.push(format!("{}={}", target, lvl));
    }

    let filter_str = directives.join(",");
    EnvFilter::try_new(&filter_str)
        .map_err(|e| format!("Invalid log filter '{}': {}", filter_str, e))
}

/// Installs the global subscriber. Calling it twice is an error from the
/// second call on, which callers may ignore.
pub fn init_logging(config: &LoggingConfig) -> Result<(), String> {
    let filter = build_env_filter(&config.level)?;
    let layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_span_list(true)
            .with_writer(std::io::stderr)
            .with_filter(filter)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_filter(filter)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| format!("Failed to install log subscriber: {}", e))?;

    // Already installed when tracing-subscriber carries its tracing-log feature.
    tracing_log::LogTracer::init().ok();
    Ok(())
}
