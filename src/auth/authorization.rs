//! Token acquisition and refresh.

use secrecy::ExposeSecret;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::instrument;

use super::token::{AccessToken, TokenResponse};
use crate::config::{Credentials, Grant};
use crate::errors::{SumUpError, SumUpResult};
use crate::transport::{standard_headers, HttpMethod, HttpRequest, HttpTransport};

/// Token endpoint path.
pub const TOKEN_PATH: &str = "/token";

const REFRESH_TOKEN_GRANT: &str = "refresh_token";

/// Obtains access tokens for a set of credentials.
///
/// [`get_token`](Self::get_token) picks exactly one strategy, in order:
/// a preset access token, a preset refresh token, then the configured grant.
/// Preset tokens never touch the network.
pub struct Authorization {
    credentials: Arc<Credentials>,
    transport: Arc<dyn HttpTransport>,
}

impl Authorization {
    /// Creates a new authorization flow.
    pub fn new(credentials: Arc<Credentials>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            credentials,
            transport,
        }
    }

    /// Returns the credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns an access token for the credentials.
    #[instrument(skip(self), fields(grant_type = %self.credentials.grant_type()))]
    pub async fn get_token(&self) -> SumUpResult<AccessToken> {
        let scopes = self.credentials.scopes().to_vec();
        let preset_refresh = self.credentials.refresh_token().map(String::from);

        if let Some(access_token) = self.credentials.access_token() {
            tracing::debug!("Using preset access token");
            return Ok(AccessToken::new(access_token, "", 0, scopes, preset_refresh));
        }

        if preset_refresh.is_some() {
            tracing::debug!("Using preset refresh token");
            return Ok(AccessToken::new("", "", 0, scopes, preset_refresh));
        }

        match self.credentials.grant() {
            Grant::AuthorizationCode { code } => {
                let code = code
                    .as_ref()
                    .ok_or_else(|| SumUpError::missing_configuration("code"))?;
                let body = self.token_request_body(
                    "authorization_code",
                    [("code", code.expose_secret().as_str())],
                );
                let response = self.request_token(body).await?;
                Ok(AccessToken::from_response(response))
            }
            Grant::ClientCredentials => {
                let body = self.token_request_body("client_credentials", []);
                let response = self.request_token(body).await?;
                Ok(AccessToken::from_response_without_grants(response))
            }
            Grant::Password { username, password } => {
                let username = username
                    .as_deref()
                    .ok_or_else(|| SumUpError::missing_configuration("username"))?;
                let password = password
                    .as_ref()
                    .ok_or_else(|| SumUpError::missing_configuration("password"))?;
                let body = self.token_request_body(
                    "password",
                    [
                        ("username", username),
                        ("password", password.expose_secret().as_str()),
                    ],
                );
                let response = self.request_token(body).await?;
                Ok(AccessToken::from_response(response))
            }
        }
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// Always hits the token endpoint, whatever preset tokens are configured.
    #[instrument(skip_all)]
    pub async fn refresh_token(&self, refresh_token: &str) -> SumUpResult<AccessToken> {
        if refresh_token.is_empty() {
            return Err(SumUpError::missing_configuration("refresh token"));
        }

        let body = self.token_request_body(REFRESH_TOKEN_GRANT, [("refresh_token", refresh_token)]);
        let response = self.request_token(body).await?;
        Ok(AccessToken::from_response(response))
    }

    fn token_request_body<const N: usize>(
        &self,
        grant_type: &str,
        extra: [(&str, &str); N],
    ) -> Value {
        let mut body = Map::new();
        body.insert("grant_type".into(), json!(grant_type));
        body.insert("client_id".into(), json!(self.credentials.client_id()));
        body.insert("client_secret".into(), json!(self.credentials.client_secret()));
        body.insert("scope".into(), json!(self.credentials.formatted_scopes()));
        for (key, value) in extra {
            body.insert(key.into(), json!(value));
        }
        Value::Object(body)
    }

    async fn request_token(&self, body: Value) -> SumUpResult<TokenResponse> {
        let request = HttpRequest::new(HttpMethod::Post, TOKEN_PATH)
            .with_body(body)
            .with_headers(standard_headers());

        let response = self.transport.send(request).await?;
        let token = response.json::<TokenResponse>()?;

        tracing::info!(
            token_type = %token.token_type,
            expires_in = token.expires_in,
            "Access token issued"
        );

        Ok(token)
    }
}

impl std::fmt::Debug for Authorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorization")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
