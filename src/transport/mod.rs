//! HTTP transport layer for the SumUp client.
//!
//! A transport performs one request/response cycle against the API base
//! URL and hands the decoded result to [`Response::new`], so a successful
//! exchange can still end in a typed API error. Two interchangeable
//! implementations exist: [`SocketTransport`] speaks HTTP/1.1 directly over
//! TCP/TLS, [`ReqwestTransport`] delegates to reqwest.

mod headers;
mod http;
mod socket;
mod tls;

pub use headers::{auth_header, merge_headers, standard_headers, SDK_IDENTIFIER};
pub use http::ReqwestTransport;
pub use socket::SocketTransport;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::Credentials;
use crate::errors::{SumUpError, SumUpResult};
use crate::response::Response;

/// HTTP method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET request.
    Get,
    /// POST request.
    Post,
    /// PUT request.
    Put,
    /// DELETE request.
    Delete,
}

impl HttpMethod {
    /// Methods accepted by the API.
    pub const ALL: [HttpMethod; 4] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
    ];

    /// Returns the method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = SumUpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::ALL.iter().map(HttpMethod::as_str).collect();
                SumUpError::argument(format!(
                    "Not allowed method provided: {}. Allowed values: {}.",
                    s,
                    allowed.join(", ")
                ))
            })
    }
}

/// HTTP request definition.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path relative to the base URL, optionally with a query string.
    pub path: String,
    /// JSON payload. `None`, `null` and `{}` all mean "no body".
    pub body: Option<Value>,
    /// Request headers, merged with the transport's custom headers.
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Creates a request without body or headers.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: Vec::new(),
        }
    }

    /// Sets the JSON payload.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Appends headers.
    pub fn with_headers<I>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.headers.extend(headers);
        self
    }

    /// Appends a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Serializes the payload, or returns `None` when there is nothing to send.
    pub fn payload(&self) -> SumUpResult<Option<Vec<u8>>> {
        match &self.body {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) if map.is_empty() => Ok(None),
            Some(Value::Array(items)) if items.is_empty() => Ok(None),
            Some(body) => Ok(Some(serde_json::to_vec(body)?)),
        }
    }
}

/// HTTP transport interface.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a request and classifies the result.
    async fn send(&self, request: HttpRequest) -> SumUpResult<Response>;
}

/// Builds the transport selected by the credentials.
pub fn create_transport(credentials: &Credentials) -> SumUpResult<Arc<dyn HttpTransport>> {
    let custom_headers = credentials.custom_headers().to_vec();

    if credentials.use_alternate_transport() {
        tracing::debug!(base_url = %credentials.base_url(), "Using reqwest transport");
        Ok(Arc::new(ReqwestTransport::new(
            credentials.base_url(),
            custom_headers,
            credentials.ca_bundle_path(),
        )?))
    } else {
        tracing::debug!(base_url = %credentials.base_url(), "Using socket transport");
        Ok(Arc::new(SocketTransport::new(
            credentials.base_url(),
            custom_headers,
            credentials.ca_bundle_path(),
        )?))
    }
}

/// Joins a base URL and a request path.
pub(crate) fn build_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_method_as_str() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
        assert_eq!(HttpMethod::Put.as_str(), "PUT");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
    }

    #[test]
    fn test_http_method_parse() {
        assert_eq!("PUT".parse::<HttpMethod>().unwrap(), HttpMethod::Put);

        let err = "PATCH".parse::<HttpMethod>().unwrap_err();
        assert_eq!(
            err,
            SumUpError::argument(
                "Not allowed method provided: PATCH. Allowed values: GET, POST, PUT, DELETE."
            )
        );
        assert!("get".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_empty_payloads_are_not_sent() {
        let request = HttpRequest::new(HttpMethod::Get, "/v0.1/me");
        assert_eq!(request.payload().unwrap(), None);
        assert_eq!(request.clone().with_body(json!({})).payload().unwrap(), None);
        assert_eq!(request.clone().with_body(Value::Null).payload().unwrap(), None);
        assert_eq!(request.with_body(json!([])).payload().unwrap(), None);
    }

    #[test]
    fn test_payload_serialized_as_json() {
        let request = HttpRequest::new(HttpMethod::Post, "/token").with_body(json!({"a": 1}));
        assert_eq!(request.payload().unwrap(), Some(br#"{"a":1}"#.to_vec()));
    }

    #[test]
    fn test_build_url() {
        assert_eq!(
            build_url("https://api.sumup.com/", "/token"),
            "https://api.sumup.com/token"
        );
        assert_eq!(
            build_url("http://localhost:1234", "v0.1/checkouts?checkout_reference=x"),
            "http://localhost:1234/v0.1/checkouts?checkout_reference=x"
        );
    }

    #[test]
    fn test_factory_selects_transport() {
        let socket = Credentials::builder()
            .client_id("id")
            .client_secret("sec")
            .build()
            .unwrap();
        assert!(create_transport(&socket).is_ok());

        let reqwest = Credentials::builder()
            .client_id("id")
            .client_secret("sec")
            .use_alternate_transport(true)
            .build()
            .unwrap();
        assert!(create_transport(&reqwest).is_ok());
    }

    #[test]
    fn test_factory_rejects_missing_ca_bundle() {
        let creds = Credentials::builder()
            .client_id("id")
            .client_secret("sec")
            .ca_bundle_path("/nonexistent/bundle.pem")
            .build()
            .unwrap();

        let err = create_transport(&creds).err().unwrap();
        assert!(matches!(err, SumUpError::Configuration { .. }));
    }
}
