//! Error types for the SumUp client.
//!
//! One variant per failure kind: configuration and argument problems are
//! raised before any network call, connection problems come from the
//! transport, and the HTTP-derived kinds are produced by response
//! classification.

use thiserror::Error;

/// Result type alias for SumUp operations.
pub type SumUpResult<T> = Result<T, SumUpError>;

/// Prefix of every validation error message.
pub const VALIDATION_ERROR_BASE: &str = "Validation error in: ";

/// Comprehensive error type for SumUp client operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SumUpError {
    /// Invalid or missing credential fields, invalid grant type, or a grant
    /// that lacks its required parameters.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },

    /// Missing or invalid argument passed to a service method.
    #[error("Invalid argument: {message}")]
    Argument {
        /// Error message describing the argument issue.
        message: String,
    },

    /// Network-level failure (DNS, TLS, timeout, connection refused).
    #[error("Connection error: {message}")]
    Connection {
        /// Error message from the transport.
        message: String,
    },

    /// The API rejected the credentials or the access token.
    #[error("Authentication error (HTTP {status_code}): {message}")]
    Authentication {
        /// Error message from the API.
        message: String,
        /// HTTP status code.
        status_code: u16,
    },

    /// The API rejected one or more input fields.
    #[error("{}{}", VALIDATION_ERROR_BASE, .fields.join(", "))]
    Validation {
        /// Names of the offending fields, in the order reported by the API.
        fields: Vec<String>,
        /// HTTP status code.
        status_code: u16,
    },

    /// Server error (5xx status codes).
    #[error("Server error (HTTP {status_code}): {message}")]
    Server {
        /// Error message.
        message: String,
        /// HTTP status code.
        status_code: u16,
    },

    /// Uncategorized client error (4xx status codes).
    #[error("Response error (HTTP {status_code}): {message}")]
    Response {
        /// Error message.
        message: String,
        /// HTTP status code.
        status_code: u16,
    },

    /// Any other failure raised by the underlying HTTP stack.
    #[error("SDK error: {message}")]
    Sdk {
        /// Error message.
        message: String,
        /// HTTP status code, when one was available.
        code: Option<u16>,
    },
}

impl SumUpError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        SumUpError::Configuration {
            message: message.into(),
        }
    }

    /// Creates an argument error.
    pub fn argument(message: impl Into<String>) -> Self {
        SumUpError::Argument {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        SumUpError::Connection {
            message: message.into(),
        }
    }

    /// Creates an SDK error.
    pub fn sdk(message: impl Into<String>, code: Option<u16>) -> Self {
        SumUpError::Sdk {
            message: message.into(),
            code,
        }
    }

    /// Argument error for a missing service parameter.
    pub fn missing_argument(name: &str) -> Self {
        Self::argument(missing_param_message(name))
    }

    /// Configuration error for a missing credential parameter.
    pub fn missing_configuration(name: &str) -> Self {
        Self::configuration(missing_param_message(name))
    }

    /// Returns the HTTP status code carried by the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SumUpError::Authentication { status_code, .. }
            | SumUpError::Validation { status_code, .. }
            | SumUpError::Server { status_code, .. }
            | SumUpError::Response { status_code, .. } => Some(*status_code),
            SumUpError::Sdk { code, .. } => *code,
            _ => None,
        }
    }

    /// Returns the bare message, without the kind prefix added by `Display`.
    pub fn message(&self) -> String {
        match self {
            SumUpError::Configuration { message }
            | SumUpError::Argument { message }
            | SumUpError::Connection { message }
            | SumUpError::Authentication { message, .. }
            | SumUpError::Server { message, .. }
            | SumUpError::Response { message, .. }
            | SumUpError::Sdk { message, .. } => message.clone(),
            SumUpError::Validation { .. } => self.to_string(),
        }
    }

    /// Returns the fields rejected by the API for validation errors.
    pub fn invalid_fields(&self) -> Option<&[String]> {
        match self {
            SumUpError::Validation { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            SumUpError::Configuration { .. } => "SUMUP_CONFIG",
            SumUpError::Argument { .. } => "SUMUP_ARGUMENT",
            SumUpError::Connection { .. } => "SUMUP_CONNECTION",
            SumUpError::Authentication { .. } => "SUMUP_AUTHENTICATION",
            SumUpError::Validation { .. } => "SUMUP_VALIDATION",
            SumUpError::Server { .. } => "SUMUP_SERVER",
            SumUpError::Response { .. } => "SUMUP_RESPONSE",
            SumUpError::Sdk { .. } => "SUMUP_SDK",
        }
    }

    /// Returns true if the error was raised from an HTTP response rather
    /// than from local validation or the network.
    pub fn is_api_error(&self) -> bool {
        matches!(
            self,
            SumUpError::Authentication { .. }
                | SumUpError::Validation { .. }
                | SumUpError::Server { .. }
                | SumUpError::Response { .. }
        )
    }
}

/// Formats the message used for a missing parameter.
pub fn missing_param_message(name: &str) -> String {
    format!("Missing parameter: \"{}\".", name)
}

impl From<serde_json::Error> for SumUpError {
    fn from(err: serde_json::Error) -> Self {
        SumUpError::Sdk {
            message: format!("Serialization error: {}", err),
            code: None,
        }
    }
}

impl From<url::ParseError> for SumUpError {
    fn from(err: url::ParseError) -> Self {
        SumUpError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}
