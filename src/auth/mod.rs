//! OAuth2 token acquisition.
//!
//! [`Authorization`] turns [`Credentials`](crate::config::Credentials) into an
//! [`AccessToken`], either from preset tokens or through the token endpoint.

mod authorization;
mod token;

pub use authorization::{Authorization, TOKEN_PATH};
pub use token::{AccessToken, TokenResponse};
