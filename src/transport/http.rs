//! Transport backed by reqwest.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::path::Path;
use std::time::Instant;
use tracing::instrument;

use super::{build_url, merge_headers, tls, HttpMethod, HttpRequest, HttpTransport};
use crate::errors::{SumUpError, SumUpResult};
use crate::observability::{log_request, log_response};
use crate::response::{Response, ResponseBody};

/// HTTP transport implementation using reqwest.
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
    custom_headers: Vec<(String, String)>,
}

impl ReqwestTransport {
    /// Creates a new transport.
    pub fn new(
        base_url: impl Into<String>,
        custom_headers: Vec<(String, String)>,
        ca_bundle_path: Option<&Path>,
    ) -> SumUpResult<Self> {
        // 3xx responses go back to the caller unfollowed.
        let mut builder = ClientBuilder::new().redirect(reqwest::redirect::Policy::none());

        if let Some(path) = ca_bundle_path {
            for cert in tls::load_pem_certificates(path)? {
                let cert = reqwest::Certificate::from_der(cert.as_ref()).map_err(|e| {
                    SumUpError::configuration(format!("Invalid CA certificate: {}", e))
                })?;
                builder = builder.add_root_certificate(cert);
            }
        }

        let client = builder.build().map_err(|e| {
            SumUpError::configuration(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            custom_headers,
        })
    }

    fn map_error(error: reqwest::Error) -> SumUpError {
        if error.is_connect() || error.is_timeout() {
            SumUpError::connection(error.to_string())
        } else {
            SumUpError::sdk(error.to_string(), error.status().map(|s| s.as_u16()))
        }
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("base_url", &self.base_url)
            .field("custom_headers", &self.custom_headers.len())
            .finish()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: HttpRequest) -> SumUpResult<Response> {
        let url = build_url(&self.base_url, &request.path);
        let payload = request.payload()?;

        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut req_builder = self.client.request(method, &url);

        let headers = merge_headers(&request.headers, &self.custom_headers);
        log_request(request.method.as_str(), &url, &headers, request.body.as_ref());

        for (name, value) in headers {
            req_builder = req_builder.header(name, value);
        }

        if let Some(payload) = payload {
            req_builder = req_builder.body(payload);
        }

        let started = Instant::now();
        let response = req_builder.send().await.map_err(Self::map_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(Self::map_error)?;

        log_response(status, body.len(), started.elapsed());

        Response::new(status, ResponseBody::from_bytes(body.to_vec()))
    }
}
