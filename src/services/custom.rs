//! Requests to arbitrary API endpoints.

use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

use super::authorized_headers;
use crate::auth::AccessToken;
use crate::errors::SumUpResult;
use crate::response::Response;
use crate::transport::{HttpMethod, HttpRequest, HttpTransport};

/// Sends authorized requests to endpoints without a dedicated service.
pub struct Custom {
    transport: Arc<dyn HttpTransport>,
    access_token: AccessToken,
}

impl Custom {
    /// Creates a new custom service.
    pub fn new(transport: Arc<dyn HttpTransport>, access_token: AccessToken) -> Self {
        Self {
            transport,
            access_token,
        }
    }

    /// Sends `method` to `path` relative to the base URL.
    ///
    /// `method` must be one of `GET`, `POST`, `PUT` or `DELETE`, in upper case.
    #[instrument(skip(self, payload))]
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        payload: Option<Value>,
    ) -> SumUpResult<Response> {
        let method: HttpMethod = method.parse()?;

        let mut request = HttpRequest::new(method, path)
            .with_headers(authorized_headers(&self.access_token));
        request.body = payload;

        self.transport.send(request).await
    }
}
