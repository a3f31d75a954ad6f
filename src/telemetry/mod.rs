//! Telemetry
//!
//! Subscriber setup for the crate's `tracing` instrumentation. Library code
//! only emits events; installing a subscriber is left to the application.

use std::str::FromStr;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const ENV_LOG_LEVEL: &str = "HUBSTAFF_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "HUBSTAFF_LOG_FORMAT";

/// Minimum level to record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, with colors.
    Pretty,
    /// One JSON object per event.
    Json,
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(format!("unknown log format: {}", other)),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Include the event target (module path).
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            include_target: true,
        }
    }
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `HUBSTAFF_LOG_LEVEL` / `HUBSTAFF_LOG_FORMAT`, ignoring values
    /// that do not parse.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(level) = std::env::var(ENV_LOG_LEVEL)
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.level = level;
        }
        if let Some(format) = std::env::var(ENV_LOG_FORMAT)
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.format = format;
        }
        config
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_target(mut self, include: bool) -> Self {
        self.include_target = include;
        self
    }

    /// Install a global subscriber. `RUST_LOG` directives are honored on top
    /// of the configured level.
    ///
    /// # Errors
    ///
    /// Fails if a global subscriber is already installed.
    pub fn init(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::from(self.level).into())
            .from_env_lossy();

        let registry = tracing_subscriber::registry().with(filter);
        match self.format {
            LogFormat::Pretty => registry
                .with(fmt::layer().with_ansi(true).with_target(self.include_target))
                .try_init()?,
            LogFormat::Json => registry
                .with(fmt::layer().json().with_target(self.include_target))
                .try_init()?,
            LogFormat::Compact => registry
                .with(fmt::layer().compact().with_target(self.include_target))
                .try_init()?,
        }

        Ok(())
    }
}
