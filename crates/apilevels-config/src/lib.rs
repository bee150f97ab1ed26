//! Configuration for API-levels generation (`apilevels.toml`) and process-wide `tracing` setup.

#![forbid(unsafe_code)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};

use apilevels_history::{Api, ApiVersion, CleanupOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

mod diagnostics;

pub use diagnostics::{
    ConfigDiagnostics, ConfigValidationError, ConfigWarning, ValidationDiagnostics,
};

/// Top-level configuration. Every table is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiLevelsConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub versions: VersionsConfig,

    #[serde(default)]
    pub cleanup: CleanupConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// A level (`info`, `debug`, ...) or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json: bool,

    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,

    /// Append logs to this file as well. If it cannot be opened, the other sinks stay active.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    /// `level` as filter directives. A bare level in any spelling (`WARNING`, `Debug`, `3`)
    /// becomes its canonical name; anything else is taken as a directive string.
    pub(crate) fn directives(&self) -> String {
        let level = self.level.trim();
        if level.is_empty() {
            return Self::default_level();
        }
        if level.eq_ignore_ascii_case("warning") {
            return "warn".to_owned();
        }
        match level.parse::<LevelFilter>() {
            Ok(filter) => filter.to_string(),
            Err(_) => level.to_owned(),
        }
    }

    /// The effective filter: `level` followed by any `RUST_LOG` directives, which win on
    /// conflict. Falls back to `level` alone, then to `info`, when parsing fails.
    pub fn env_filter(&self) -> EnvFilter {
        let configured = self.directives();
        let combined = match std::env::var("RUST_LOG") {
            Ok(env) if !env.trim().is_empty() => format!("{configured},{}", env.trim()),
            _ => configured.clone(),
        };
        EnvFilter::try_new(combined)
            .or_else(|_| EnvFilter::try_new(configured))
            .unwrap_or_else(|_| EnvFilter::default().add_directive(LevelFilter::INFO.into()))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
            file: None,
        }
    }
}

/// Bounds of the generated API. Observed versions outside them widen the bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionsConfig {
    #[serde(default = "VersionsConfig::default_min")]
    pub min: ApiVersion,

    /// Defaults to `min`.
    #[serde(default)]
    pub max: Option<ApiVersion>,
}

impl VersionsConfig {
    fn default_min() -> ApiVersion {
        1
    }

    pub fn effective_max(&self) -> ApiVersion {
        self.max.unwrap_or(self.min)
    }
}

impl Default for VersionsConfig {
    fn default() -> Self {
        Self {
            min: Self::default_min(),
            max: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupConfig {
    #[serde(default = "enabled")]
    pub remove_implicit_interfaces: bool,

    #[serde(default = "enabled")]
    pub remove_overriding_methods: bool,

    #[serde(default = "enabled")]
    pub inline_hidden_super_classes: bool,

    #[serde(default = "enabled")]
    pub prune_package_private: bool,
}

fn enabled() -> bool {
    true
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            remove_implicit_interfaces: true,
            remove_overriding_methods: true,
            inline_hidden_super_classes: true,
            prune_package_private: true,
        }
    }
}

impl From<&CleanupConfig> for CleanupOptions {
    fn from(config: &CleanupConfig) -> Self {
        CleanupOptions {
            remove_implicit_interfaces: config.remove_implicit_interfaces,
            remove_overriding_methods: config.remove_overriding_methods,
            inline_hidden_super_classes: config.inline_hidden_super_classes,
            prune_package_private: config.prune_package_private,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` includes a snippet of the input; keep only the message.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl ApiLevelsConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = read_config(path.as_ref())?;
        Ok(toml::from_str(&text)?)
    }

    /// Load a config file and report unknown keys and validation failures.
    pub fn load_from_path_with_diagnostics(
        path: impl AsRef<Path>,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let text = read_config(path.as_ref())?;
        Self::load_from_str_with_diagnostics(&text)
    }

    pub fn load_from_str_with_diagnostics(
        text: &str,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let (config, unknown_keys) =
            diagnostics::deserialize_toml_with_unknown_keys::<ApiLevelsConfig>(text)?;

        let mut diagnostics = ConfigDiagnostics {
            unknown_keys,
            ..ConfigDiagnostics::default()
        };
        diagnostics.extend_validation(config.validate());

        for key in &diagnostics.unknown_keys {
            tracing::warn!(target: "apilevels.config", key = %key, "unknown config key");
        }
        Ok((config, diagnostics))
    }

    pub fn validate(&self) -> ValidationDiagnostics {
        let mut out = ValidationDiagnostics::default();

        let normalized = self.logging.directives();
        if EnvFilter::try_new(&normalized).is_err() {
            out.warnings.push(ConfigWarning::LoggingLevelInvalid {
                value: self.logging.level.clone(),
                normalized,
            });
        }

        if self.versions.min == 0 {
            out.errors.push(ConfigValidationError::InvalidValue {
                toml_path: "versions.min".to_owned(),
                message: "must be >= 1".to_owned(),
            });
        }
        if let Some(max) = self.versions.max.filter(|&max| max < self.versions.min) {
            out.errors.push(ConfigValidationError::InvalidValue {
                toml_path: "versions.max".to_owned(),
                message: format!("must be >= versions.min ({}), got {max}", self.versions.min),
            });
        }

        let cleanup = &self.cleanup;
        if !(cleanup.remove_implicit_interfaces
            || cleanup.remove_overriding_methods
            || cleanup.inline_hidden_super_classes
            || cleanup.prune_package_private)
        {
            out.warnings.push(ConfigWarning::CleanupDisabled);
        }

        out
    }

    /// An empty [`Api`] spanning the configured versions.
    pub fn new_api(&self) -> Api {
        Api::new(self.versions.min, self.versions.effective_max())
    }

    pub fn cleanup_options(&self) -> CleanupOptions {
        CleanupOptions::from(&self.cleanup)
    }
}

fn read_config(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

static TRACING_INIT: Once = Once::new();

/// Install the global `tracing` subscriber described by `config`.
///
/// Only the first call has an effect.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();

        let file = config
            .file
            .as_ref()
            .and_then(|path| {
                std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .ok()
            })
            .map(Arc::new);
        let file_open_failed = config.file.is_some() && file.is_none();

        let mut make_writer: Option<BoxMakeWriter> = None;
        if config.stderr {
            // Test output capture only sees `eprint!`, which `TestWriter` goes through.
            make_writer = Some(if cfg!(debug_assertions) {
                BoxMakeWriter::new(tracing_subscriber::fmt::writer::TestWriter::with_stderr)
            } else {
                BoxMakeWriter::new(io::stderr)
            });
        }
        // Each event is formatted before it is written, so a shared `&File` never interleaves
        // lines.
        if let Some(file) = file {
            make_writer = Some(match make_writer {
                Some(writer) => BoxMakeWriter::new(writer.and(file)),
                None => BoxMakeWriter::new(file),
            });
        }
        let make_writer = make_writer.unwrap_or_else(|| BoxMakeWriter::new(io::sink));

        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry().with(filter).with(layer);
        if tracing::subscriber::set_global_default(subscriber).is_ok() && file_open_failed {
            if let Some(path) = config.file.as_ref() {
                tracing::warn!(
                    target: "apilevels.config",
                    path = %path.display(),
                    "failed to open log file; file logging is disabled"
                );
            }
        }
    });
}
