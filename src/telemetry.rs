//! Logging setup.

use serde::Deserialize;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Compact,
    /// One JSON object per line.
    Json,
}

/// Initialize the global subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set.
pub fn init(format: LogFormat, default_filter: &str) {
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(filter_layer);
    match format {
        LogFormat::Compact => registry
            .with(fmt::layer().with_target(true).with_line_number(true).compact())
            .init(),
        LogFormat::Json => registry.with(fmt::layer().with_target(true).json()).init(),
    }
}
