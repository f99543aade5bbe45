//! SumUp API client.
//!
//! Ties credentials, transport and the current access token together and
//! hands out services bound to that token.

use std::sync::Arc;

use crate::auth::{AccessToken, Authorization};
use crate::config::Credentials;
use crate::errors::{SumUpError, SumUpResult};
use crate::services::{Checkouts, Custom};
use crate::transport::{create_transport, HttpTransport};

/// The main SumUp client.
///
/// # Example
///
/// ```rust,no_run
/// use sumup_client::{Credentials, SumUpClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let credentials = Credentials::builder()
///         .client_id("app-id")
///         .client_secret("app-secret")
///         .grant_type("client_credentials")
///         .build()?;
///
///     let client = SumUpClient::builder().credentials(credentials).build().await?;
///     let checkout = client.checkouts().find_by_id("chk-123").await?;
///     println!("{:?}", checkout.body());
///     Ok(())
/// }
/// ```
pub struct SumUpClient {
    authorization: Authorization,
    transport: Arc<dyn HttpTransport>,
    access_token: AccessToken,
}

impl SumUpClient {
    /// Creates a new client builder.
    pub fn builder() -> SumUpClientBuilder {
        SumUpClientBuilder::new()
    }

    /// Creates a client from `SUMUP_*` environment variables.
    pub async fn from_env() -> SumUpResult<Self> {
        Self::builder()
            .credentials(Credentials::from_env()?)
            .build()
            .await
    }

    /// Returns the credentials.
    pub fn credentials(&self) -> &Credentials {
        self.authorization.credentials()
    }

    /// Returns the current access token.
    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    /// Replaces the current token with one obtained from a refresh token.
    ///
    /// Uses `refresh_token` when given, otherwise the refresh token of the
    /// current access token.
    pub async fn refresh_token(&mut self, refresh_token: Option<&str>) -> SumUpResult<&AccessToken> {
        let refresh_token = match refresh_token {
            Some(token) => token.to_string(),
            None => self
                .access_token
                .refresh_token()
                .map(String::from)
                .ok_or_else(|| SumUpError::missing_configuration("refresh token"))?,
        };

        self.access_token = self.authorization.refresh_token(&refresh_token).await?;
        Ok(&self.access_token)
    }

    /// Returns the custom request service bound to the current token.
    pub fn custom(&self) -> Custom {
        self.custom_with_token(&self.access_token)
    }

    /// Returns the custom request service bound to `token`.
    pub fn custom_with_token(&self, token: &AccessToken) -> Custom {
        Custom::new(self.transport.clone(), token.clone())
    }

    /// Returns the checkouts service bound to the current token.
    pub fn checkouts(&self) -> Checkouts {
        self.checkouts_with_token(&self.access_token)
    }

    /// Returns the checkouts service bound to `token`.
    pub fn checkouts_with_token(&self, token: &AccessToken) -> Checkouts {
        Checkouts::new(self.transport.clone(), token.clone())
    }
}

impl std::fmt::Debug for SumUpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SumUpClient")
            .field("credentials", self.credentials())
            .field("access_token", &self.access_token)
            .finish_non_exhaustive()
    }
}

/// Builder for the SumUp client.
#[derive(Default)]
pub struct SumUpClientBuilder {
    credentials: Option<Credentials>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl SumUpClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the credentials.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets a custom transport instead of the one selected by the credentials.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builds the client and acquires the initial access token.
    pub async fn build(self) -> SumUpResult<SumUpClient> {
        let credentials = self
            .credentials
            .ok_or_else(|| SumUpError::configuration("Credentials are required"))?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => create_transport(&credentials)?,
        };

        let authorization = Authorization::new(Arc::new(credentials), transport.clone());
        let access_token = authorization.get_token().await?;

        tracing::debug!(
            grant_type = %authorization.credentials().grant_type(),
            "SumUp client initialized"
        );

        Ok(SumUpClient {
            authorization,
            transport,
            access_token,
        })
    }
}
