//! Console logging for the crudkit CLI

use std::io;

use crudkit_core::TOOL_NAME;
use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration for the CLI
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for crudkit targets (e.g. "info", "debug")
    pub level: String,
    /// Emit JSON lines instead of plain text
    pub json_format: bool,
    /// Include file and line number information
    pub include_location: bool,
    /// Full filter directive, overrides `level` (e.g. "crudkit=debug,sqlx=warn")
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            include_location: false,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Debug output for crudkit, catalog queries included
    pub fn verbose() -> Self {
        Self {
            level: "debug".to_string(),
            include_location: true,
            ..Self::default()
        }
    }

    pub fn with_json(mut self, json_format: bool) -> Self {
        self.json_format = json_format;
        self
    }

    pub fn with_env_filter<S: Into<String>>(mut self, filter: S) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Directive used when `RUST_LOG` is not set
    pub fn directive(&self) -> String {
        match &self.env_filter {
            Some(filter) => filter.clone(),
            None => {
                let targets = [TOOL_NAME, "crudkit_core", "crudkit_introspect", "crudkit_codegen"];
                targets
                    .iter()
                    .map(|target| format!("{}={}", target, self.level))
                    .collect::<Vec<_>>()
                    .join(",")
            }
        }
    }
}

/// Initialize logging on stderr so command output on stdout stays clean.
///
/// `RUST_LOG` takes precedence over the configuration.
pub fn init_logging(config: LoggingConfig) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(config.directive()))?;

    let layer = Layer::new()
        .with_writer(io::stderr)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    if config.json_format {
        tracing_subscriber::registry().with(filter).with(layer.json()).try_init()?;
    } else {
        tracing_subscriber::registry().with(filter).with(layer).try_init()?;
    }

    tracing::debug!(
        target: "crudkit::logging",
        "Logging initialized (level: {}, format: {})",
        config.level,
        if config.json_format { "JSON" } else { "text" }
    );

    Ok(())
}
