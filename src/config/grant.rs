//! Grant types.

use secrecy::SecretString;
use std::fmt;
use std::str::FromStr;

use crate::errors::SumUpError;

/// The OAuth2 grant types a client can be configured with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GrantType {
    /// Exchange of an authorization code.
    AuthorizationCode,
    /// Client credentials of the application itself.
    ClientCredentials,
    /// Merchant username and password.
    Password,
}

impl GrantType {
    /// All configurable grant types.
    pub const ALL: [GrantType; 3] = [
        GrantType::AuthorizationCode,
        GrantType::ClientCredentials,
        GrantType::Password,
    ];

    /// Wire name of the grant type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthorizationCode => "authorization_code",
            Self::ClientCredentials => "client_credentials",
            Self::Password => "password",
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GrantType {
    type Err = SumUpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|grant| grant.as_str() == s)
            .ok_or_else(|| {
                SumUpError::configuration(format!(
                    "Invalid parameter for grant_type: '{}'. Allowed values are: 'authorization_code'|'client_credentials'|'password'",
                    s
                ))
            })
    }
}

/// A configured grant together with the parameters it needs.
///
/// Parameters stay optional here: their presence is checked when a token is
/// requested, since a preset token makes them unnecessary.
#[derive(Clone)]
pub enum Grant {
    /// Authorization code grant.
    AuthorizationCode {
        /// The authorization code.
        code: Option<SecretString>,
    },
    /// Client credentials grant.
    ClientCredentials,
    /// Password grant.
    Password {
        /// Merchant username.
        username: Option<String>,
        /// Merchant password.
        password: Option<SecretString>,
    },
}

impl Grant {
    /// Returns the grant type.
    pub fn grant_type(&self) -> GrantType {
        match self {
            Grant::AuthorizationCode { .. } => GrantType::AuthorizationCode,
            Grant::ClientCredentials => GrantType::ClientCredentials,
            Grant::Password { .. } => GrantType::Password,
        }
    }
}

impl fmt::Debug for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grant::AuthorizationCode { code } => f
                .debug_struct("AuthorizationCode")
                .field("code", &code.as_ref().map(|_| "[REDACTED]"))
                .finish(),
            Grant::ClientCredentials => f.write_str("ClientCredentials"),
            Grant::Password { username, password } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &password.as_ref().map(|_| "[REDACTED]"))
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("authorization_code", GrantType::AuthorizationCode)]
    #[test_case("client_credentials", GrantType::ClientCredentials)]
    #[test_case("password", GrantType::Password)]
    fn test_parse_grant_type(input: &str, expected: GrantType) {
        assert_eq!(input.parse::<GrantType>().unwrap(), expected);
        assert_eq!(expected.to_string(), input);
    }

    #[test]
    fn test_parse_unknown_grant_type() {
        let err = "refresh_token".parse::<GrantType>().unwrap_err();
        assert!(matches!(err, SumUpError::Configuration { .. }));
        assert!(err.to_string().contains("refresh_token"));
    }

    #[test]
    fn test_grant_debug_redacts_password() {
        let grant = Grant::Password {
            username: Some("merchant".to_string()),
            password: Some(SecretString::new("hunter2".to_string())),
        };
        let debug_str = format!("{:?}", grant);
        assert!(debug_str.contains("merchant"));
        assert!(!debug_str.contains("hunter2"));
    }
}
