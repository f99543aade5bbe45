//! Global subscriber installation.

use sumup_client::observability::{log_request, LogFormat, LogLevel, LoggingConfig};
use sumup_client::SumUpError;

#[test]
fn test_init_installs_subscriber_once() {
    LoggingConfig::new()
        .with_level(LogLevel::Debug)
        .with_format(LogFormat::Json)
        .with_target(false)
        .init()
        .unwrap();

    assert!(tracing::enabled!(tracing::Level::DEBUG));
    log_request(
        "POST",
        "https://api.sumup.com/token",
        &[("Authorization".to_string(), "Bearer tok".to_string())],
        Some(&serde_json::json!({"client_secret": "sec"})),
    );

    let err = LoggingConfig::new()
        .with_format(LogFormat::Compact)
        .init()
        .unwrap_err();
    assert!(matches!(err, SumUpError::Configuration { .. }));
    assert!(err.to_string().contains("Failed to initialize logging"));
}
