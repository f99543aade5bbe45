//! Observability for the SumUp client.
//!
//! Structured logging through `tracing`, with secrets masked before they
//! reach any subscriber.

mod logging;

pub use logging::{
    log_request, log_response, redact_headers, redact_payload, LogFormat, LogLevel,
    LoggingConfig, REDACTED,
};
