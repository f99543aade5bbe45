//! Access tokens.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

/// Token endpoint response.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Token type (usually "Bearer").
    #[serde(default, deserialize_with = "null_as_default")]
    pub token_type: String,
    /// Lifetime in seconds.
    #[serde(default, deserialize_with = "null_as_default")]
    pub expires_in: u64,
    /// Granted scopes, space separated.
    #[serde(default)]
    pub scope: Option<String>,
    /// Refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl TokenResponse {
    /// Splits the granted scopes into a list (empty when absent).
    pub fn scopes(&self) -> Vec<String> {
        self.scope
            .as_deref()
            .map(|s| s.split(' ').filter(|s| !s.is_empty()).map(String::from).collect())
            .unwrap_or_default()
    }
}

/// Bearer credential used by every resource call.
///
/// Immutable once built. `expires_in` is descriptive only: nothing in the
/// client tracks expiry, callers refresh when the API rejects the token.
#[derive(Clone)]
pub struct AccessToken {
    value: SecretString,
    token_type: String,
    expires_in: u64,
    scopes: Vec<String>,
    refresh_token: Option<SecretString>,
}

impl AccessToken {
    /// Creates a new access token.
    pub fn new(
        value: impl Into<String>,
        token_type: impl Into<String>,
        expires_in: u64,
        scopes: Vec<String>,
        refresh_token: Option<String>,
    ) -> Self {
        Self {
            value: SecretString::new(value.into()),
            token_type: token_type.into(),
            expires_in,
            scopes,
            refresh_token: refresh_token
                .filter(|t| !t.is_empty())
                .map(SecretString::new),
        }
    }

    /// Builds a token from a full token response, including granted scopes
    /// and refresh token.
    pub fn from_response(response: TokenResponse) -> Self {
        let scopes = response.scopes();
        Self::new(
            response.access_token,
            response.token_type,
            response.expires_in,
            scopes,
            response.refresh_token,
        )
    }

    /// Builds a token from the value, type and lifetime of a response only.
    pub fn from_response_without_grants(response: TokenResponse) -> Self {
        Self::new(
            response.access_token,
            response.token_type,
            response.expires_in,
            Vec::new(),
            None,
        )
    }

    /// Returns the token value (exposing the secret).
    pub fn value(&self) -> &str {
        self.value.expose_secret()
    }

    /// Returns the token type.
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Returns the lifetime in seconds reported when the token was issued.
    pub fn expires_in(&self) -> u64 {
        self.expires_in
    }

    /// Returns the scopes of the token.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Returns the refresh token, if any (exposing the secret).
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_ref().map(|t| t.expose_secret().as_str())
    }

    /// Returns the value of the `Authorization` header for this token.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.value.expose_secret())
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scopes", &self.scopes)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
