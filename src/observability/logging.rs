//! Logging configuration and request/response logging.

use serde_json::Value;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::{SumUpError, SumUpResult};

/// Replacement for masked values.
pub const REDACTED: &str = "[REDACTED]";

/// Payload fields that never appear in logs.
const SENSITIVE_FIELDS: [&str; 5] = [
    "client_secret",
    "password",
    "code",
    "refresh_token",
    "access_token",
];

/// Headers that never appear in logs.
const SENSITIVE_HEADERS: [&str; 2] = ["authorization", "cookie"];

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// The minimum log level to capture
    pub level: LogLevel,
    /// The output format for log messages
    pub format: LogFormat,
    /// Whether to include the module target in log output
    pub include_target: bool,
    /// Whether to include file and line number in log output
    pub include_file_line: bool,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Trace-level logging (most verbose)
    Trace,
    /// Debug-level logging
    Debug,
    /// Info-level logging
    Info,
    /// Warning-level logging
    Warn,
    /// Error-level logging (least verbose)
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl From<LogLevel> for tracing::level_filters::LevelFilter {
    fn from(level: LogLevel) -> Self {
        Level::from(level).into()
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors
    Pretty,
    /// JSON format
    Json,
    /// Compact single-line format
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            include_target: true,
            include_file_line: false,
        }
    }
}

impl LoggingConfig {
    /// Creates a new logging configuration with default settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumup_client::observability::{LoggingConfig, LogLevel, LogFormat};
    ///
    /// let config = LoggingConfig::new();
    /// assert_eq!(config.level, LogLevel::Info);
    /// assert_eq!(config.format, LogFormat::Pretty);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the log level.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the log format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets whether to include the module target.
    pub fn with_target(mut self, include: bool) -> Self {
        self.include_target = include;
        self
    }

    /// Sets whether to include file and line number.
    pub fn with_file_line(mut self, include: bool) -> Self {
        self.include_file_line = include;
        self
    }

    /// Installs a global subscriber with this configuration.
    ///
    /// `RUST_LOG` directives are honoured on top of the configured level.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sumup_client::observability::{LoggingConfig, LogLevel};
    ///
    /// LoggingConfig::new()
    ///     .with_level(LogLevel::Debug)
    ///     .init()
    ///     .expect("logging already initialized");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a global subscriber is already set.
    pub fn init(self) -> SumUpResult<()> {
        let filter = EnvFilter::from_default_env()
            .add_directive(tracing::level_filters::LevelFilter::from(self.level).into());

        let result = match self.format {
            LogFormat::Pretty => tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_ansi(true)
                        .with_target(self.include_target)
                        .with_file(self.include_file_line)
                        .with_line_number(self.include_file_line),
                )
                .try_init(),
            LogFormat::Json => tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_target(self.include_target))
                .try_init(),
            LogFormat::Compact => tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().compact().with_target(self.include_target))
                .try_init(),
        };

        result.map_err(|e| SumUpError::configuration(format!("Failed to initialize logging: {}", e)))
    }
}

/// Returns a copy of a JSON payload with credential fields masked.
pub fn redact_payload(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    let value = if SENSITIVE_FIELDS.contains(&key.as_str()) {
                        Value::String(REDACTED.to_string())
                    } else {
                        redact_payload(value)
                    };
                    (key.clone(), value)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_payload).collect()),
        other => other.clone(),
    }
}

/// Returns headers with credential values masked.
pub fn redact_headers(headers: &[(String, String)]) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let sensitive = SENSITIVE_HEADERS
                .iter()
                .any(|h| name.eq_ignore_ascii_case(h));
            let value = if sensitive {
                REDACTED.to_string()
            } else {
                value.clone()
            };
            (name.clone(), value)
        })
        .collect()
}

/// Logs an outgoing request with secrets masked.
pub fn log_request(method: &str, url: &str, headers: &[(String, String)], body: Option<&Value>) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let body = body
        .map(|b| redact_payload(b).to_string())
        .unwrap_or_else(|| "<empty>".to_string());

    tracing::debug!(
        method = method,
        url = url,
        headers = ?redact_headers(headers),
        body = %body,
        "Outgoing request"
    );
}

/// Logs an incoming response.
pub fn log_response(status: u16, body_len: usize, elapsed: Duration) {
    tracing::debug!(
        status = status,
        body_len = body_len,
        duration_ms = elapsed.as_millis() as u64,
        "Incoming response"
    );
}
