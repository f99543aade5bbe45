//! Configuration module for the SumUp client.
//!
//! `Credentials` holds the client identity, the grant used to obtain a token,
//! the resolved scope set and the transport settings. It is validated once
//! when built and never changes afterwards.

mod grant;

pub use grant::{Grant, GrantType};

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::errors::{SumUpError, SumUpResult};

/// Default base URL for the SumUp API.
pub const DEFAULT_BASE_URL: &str = "https://api.sumup.com";

/// Scopes requested on every token call, whatever the caller asks for.
pub const DEFAULT_SCOPES: [&str; 4] = [
    "payments",
    "transactions.history",
    "user.app-settings",
    "user.profile_readonly",
];

/// Environment variable prefix used by [`Credentials::from_env`].
pub const ENV_PREFIX: &str = "SUMUP_";

/// Validated client configuration.
#[derive(Clone)]
pub struct Credentials {
    client_id: String,
    client_secret: SecretString,
    grant: Grant,
    scopes: Vec<String>,
    base_url: String,
    access_token: Option<SecretString>,
    refresh_token: Option<SecretString>,
    use_alternate_transport: bool,
    custom_headers: Vec<(String, String)>,
    ca_bundle_path: Option<PathBuf>,
}

impl Credentials {
    /// Creates a new credentials builder.
    pub fn builder() -> CredentialsBuilder {
        CredentialsBuilder::new()
    }

    /// Builds credentials from a flat key/value mapping.
    ///
    /// Recognised keys: `app_id`, `app_secret`, `grant_type`, `base_uri`,
    /// `scopes`, `code`, `username`, `password`, `access_token`,
    /// `refresh_token`, `use_alternate_transport`, `custom_headers` and
    /// `ca_bundle_path`. Unknown keys are ignored.
    pub fn from_map(config: &serde_json::Value) -> SumUpResult<Self> {
        let source = CredentialsSource::deserialize(config).map_err(|e| {
            SumUpError::configuration(format!("Invalid configuration mapping: {}", e))
        })?;
        source.into_builder().build()
    }

    /// Builds credentials from `SUMUP_*` environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SUMUP_APP_ID`, `SUMUP_APP_SECRET` (required)
    /// - `SUMUP_GRANT_TYPE` (defaults to `authorization_code`)
    /// - `SUMUP_BASE_URL`, `SUMUP_SCOPES` (space separated)
    /// - `SUMUP_CODE`, `SUMUP_USERNAME`, `SUMUP_PASSWORD`
    /// - `SUMUP_ACCESS_TOKEN`, `SUMUP_REFRESH_TOKEN`
    pub fn from_env() -> SumUpResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> SumUpResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| {
            lookup(&format!("{}{}", ENV_PREFIX, suffix)).filter(|value| !value.is_empty())
        };

        let mut builder = CredentialsBuilder::new();
        if let Some(app_id) = var("APP_ID") {
            builder = builder.client_id(app_id);
        }
        if let Some(app_secret) = var("APP_SECRET") {
            builder = builder.client_secret(app_secret);
        }
        if let Some(grant_type) = var("GRANT_TYPE") {
            builder = builder.grant_type(grant_type);
        }
        if let Some(base_url) = var("BASE_URL") {
            builder = builder.base_url(base_url);
        }
        if let Some(scopes) = var("SCOPES") {
            builder = builder.scopes(scopes.split_whitespace());
        }
        if let Some(code) = var("CODE") {
            builder = builder.code(code);
        }
        if let Some(username) = var("USERNAME") {
            builder = builder.username(username);
        }
        if let Some(password) = var("PASSWORD") {
            builder = builder.password(password);
        }
        if let Some(token) = var("ACCESS_TOKEN") {
            builder = builder.access_token(token);
        }
        if let Some(token) = var("REFRESH_TOKEN") {
            builder = builder.refresh_token(token);
        }

        builder.build()
    }

    /// Returns the client ID.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the client secret (exposing the secret).
    pub(crate) fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }

    /// Returns the configured grant.
    pub fn grant(&self) -> &Grant {
        &self.grant
    }

    /// Returns the configured grant type.
    pub fn grant_type(&self) -> GrantType {
        self.grant.grant_type()
    }

    /// Returns the resolved scopes: the defaults followed by any extra
    /// caller-supplied scopes, without duplicates.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Returns the scopes formatted as they appear in token requests.
    pub fn formatted_scopes(&self) -> String {
        self.scopes.join(" ")
    }

    /// Returns the base URL of the API.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the preset access token, if any.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_ref().map(|t| t.expose_secret().as_str())
    }

    /// Returns the preset refresh token, if any.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_ref().map(|t| t.expose_secret().as_str())
    }

    /// Returns true when the reqwest-based transport should be used instead
    /// of the socket transport.
    pub fn use_alternate_transport(&self) -> bool {
        self.use_alternate_transport
    }

    /// Returns the headers added to every outbound request.
    pub fn custom_headers(&self) -> &[(String, String)] {
        &self.custom_headers
    }

    /// Returns the PEM bundle trusted in addition to the built-in roots.
    pub fn ca_bundle_path(&self) -> Option<&Path> {
        self.ca_bundle_path.as_deref()
    }

    /// Returns the full URL for an endpoint.
    pub fn endpoint_url(&self, path: &str) -> String {
        crate::transport::build_url(&self.base_url, path)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("grant", &self.grant)
            .field("scopes", &self.scopes)
            .field("base_url", &self.base_url)
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("use_alternate_transport", &self.use_alternate_transport)
            .field("custom_headers", &self.custom_headers)
            .field("ca_bundle_path", &self.ca_bundle_path)
            .finish()
    }
}

/// Builder for [`Credentials`].
#[derive(Default)]
pub struct CredentialsBuilder {
    client_id: Option<String>,
    client_secret: Option<String>,
    grant_type: Option<String>,
    scopes: Vec<String>,
    base_url: Option<String>,
    code: Option<String>,
    username: Option<String>,
    password: Option<String>,
    access_token: Option<String>,
    refresh_token: Option<String>,
    use_alternate_transport: bool,
    custom_headers: Vec<(String, String)>,
    ca_bundle_path: Option<PathBuf>,
}

impl CredentialsBuilder {
    /// Creates a new credentials builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the client ID.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the client secret.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Sets the grant type by name. Validated in [`build`](Self::build).
    pub fn grant_type(mut self, grant_type: impl Into<String>) -> Self {
        self.grant_type = Some(grant_type.into());
        self
    }

    /// Sets the grant type.
    pub fn grant(mut self, grant_type: GrantType) -> Self {
        self.grant_type = Some(grant_type.as_str().to_string());
        self
    }

    /// Adds extra scopes on top of the defaults.
    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes.extend(scopes.into_iter().map(Into::into));
        self
    }

    /// Adds a single extra scope.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the authorization code.
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the merchant username for the password grant.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the merchant password for the password grant.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets a preset access token.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Sets a preset refresh token.
    pub fn refresh_token(mut self, token: impl Into<String>) -> Self {
        self.refresh_token = Some(token.into());
        self
    }

    /// Selects the reqwest-based transport instead of the socket transport.
    pub fn use_alternate_transport(mut self, enabled: bool) -> Self {
        self.use_alternate_transport = enabled;
        self
    }

    /// Adds a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Sets a PEM bundle of additional trusted certificates.
    pub fn ca_bundle_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_bundle_path = Some(path.into());
        self
    }

    /// Builds the credentials.
    pub fn build(self) -> SumUpResult<Credentials> {
        let client_id = self
            .client_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| SumUpError::configuration("Missing mandatory parameter app_id"))?;

        let client_secret = self
            .client_secret
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| SumUpError::configuration("Missing mandatory parameter app_secret"))?;

        let grant_type = match self.grant_type.as_deref() {
            Some(name) => name.parse::<GrantType>()?,
            None => GrantType::AuthorizationCode,
        };

        let grant = match grant_type {
            GrantType::AuthorizationCode => Grant::AuthorizationCode {
                code: non_empty_secret(self.code),
            },
            GrantType::ClientCredentials => Grant::ClientCredentials,
            GrantType::Password => Grant::Password {
                username: self.username.filter(|u| !u.is_empty()),
                password: non_empty_secret(self.password),
            },
        };

        let base_url = self
            .base_url
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        url::Url::parse(&base_url)?;

        Ok(Credentials {
            client_id,
            client_secret: SecretString::new(client_secret),
            grant,
            scopes: resolve_scopes(self.scopes),
            base_url,
            access_token: non_empty_secret(self.access_token),
            refresh_token: non_empty_secret(self.refresh_token),
            use_alternate_transport: self.use_alternate_transport,
            custom_headers: self.custom_headers,
            ca_bundle_path: self.ca_bundle_path,
        })
    }
}

fn non_empty_secret(value: Option<String>) -> Option<SecretString> {
    value.filter(|v| !v.is_empty()).map(SecretString::new)
}

/// Union of the default scopes and the extra ones, first occurrence wins.
fn resolve_scopes(extra: Vec<String>) -> Vec<String> {
    let mut scopes: Vec<String> = DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect();
    for scope in extra {
        if !scope.is_empty() && !scopes.contains(&scope) {
            scopes.push(scope);
        }
    }
    scopes
}

/// Raw key/value configuration as supplied by the caller.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CredentialsSource {
    app_id: Option<String>,
    app_secret: Option<String>,
    grant_type: Option<String>,
    base_uri: Option<String>,
    scopes: Vec<String>,
    code: Option<String>,
    username: Option<String>,
    password: Option<String>,
    access_token: Option<String>,
    refresh_token: Option<String>,
    use_alternate_transport: bool,
    custom_headers: BTreeMap<String, String>,
    ca_bundle_path: Option<PathBuf>,
}

impl CredentialsSource {
    fn into_builder(self) -> CredentialsBuilder {
        CredentialsBuilder {
            client_id: self.app_id,
            client_secret: self.app_secret,
            grant_type: self.grant_type,
            scopes: self.scopes,
            base_url: self.base_uri,
            code: self.code,
            username: self.username,
            password: self.password,
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            use_alternate_transport: self.use_alternate_transport,
            custom_headers: self.custom_headers.into_iter().collect(),
            ca_bundle_path: self.ca_bundle_path,
        }
    }
}
