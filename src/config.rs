//! Application configuration.
//!
//! Layering, lowest priority first: built-in defaults, a config file
//! (`--config`/`CONFIG_FILE`, or `./config.{yaml,toml,json}` when present),
//! `LANDING_` prefixed environment variables (`LANDING_SERVER__PORT=8000`),
//! then CLI flags.
//!
//! The chat endpoint is fixed and has no setting here.

use std::time::Duration;

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::telemetry::LogFormat;
use crate::widget::WidgetSettings;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "HOST")]
    pub host: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub widget: WidgetConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Compact,
            filter: "info,landing_chat=debug".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// Directory served under `/static`.
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WidgetConfig {
    pub greeting_min_ms: u64,
    pub greeting_max_ms: u64,
    /// Widgets without activity for this long are unmounted.
    pub idle_timeout_secs: u64,
    pub sweep_interval_secs: u64,
    /// Per-widget change event buffer.
    pub event_buffer: usize,
}

impl WidgetConfig {
    #[must_use]
    pub fn settings(&self) -> WidgetSettings {
        WidgetSettings {
            greeting_delay_min: Duration::from_millis(self.greeting_min_ms),
            greeting_delay_max: Duration::from_millis(self.greeting_max_ms),
            event_buffer: self.event_buffer,
        }
    }

    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.static_dir", "static")?
            .set_default("widget.greeting_min_ms", 1000)?
            .set_default("widget.greeting_max_ms", 3000)?
            .set_default("widget.idle_timeout_secs", 30 * 60)?
            .set_default("widget.sweep_interval_secs", 60)?
            .set_default("widget.event_buffer", 64)?
            .set_default("logging.format", "compact")?
            .set_default("logging.filter", "info,landing_chat=debug")?;

        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path)),
            None => builder.add_source(File::with_name("config").required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix("LANDING")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // Priority: CLI flag > CLI env var > LANDING_ env > config file > defaults.
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(host) = cli.host {
            builder = builder.set_override("server.host", host)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        let widget = &self.widget;
        if widget.greeting_min_ms > widget.greeting_max_ms {
            return Err(config::ConfigError::Message(format!(
                "widget.greeting_min_ms ({}) exceeds widget.greeting_max_ms ({})",
                widget.greeting_min_ms, widget.greeting_max_ms
            )));
        }
        if widget.event_buffer == 0 {
            return Err(config::ConfigError::Message(
                "widget.event_buffer must be positive".to_string(),
            ));
        }
        if widget.sweep_interval_secs == 0 {
            return Err(config::ConfigError::Message(
                "widget.sweep_interval_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
