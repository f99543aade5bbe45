//! SumUp API Client Library
//!
//! A Rust client for the SumUp payments API: OAuth2 token acquisition and
//! refresh, typed classification of the API's error envelopes, and a
//! pluggable HTTP transport with two interchangeable backends.
//!
//! # Features
//!
//! - **Grants**: authorization code, client credentials and password, or
//!   preset access/refresh tokens that skip the network entirely
//! - **Error envelopes**: `NOT_AUTHORIZED`, `MISSING` and `INVALID` bodies are
//!   turned into typed errors even when the API answers with a 2xx status
//! - **Transports**: a raw HTTP/1.1 socket client (rustls for HTTPS) or
//!   reqwest, selected by configuration or injected
//! - **Observability**: `tracing` spans and events with secrets redacted
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sumup_client::{Credentials, CreateCheckout, SumUpClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Credentials::builder()
//!         .client_id("app-id")
//!         .client_secret("app-secret")
//!         .grant_type("password")
//!         .username("merchant@example.com")
//!         .password("secret")
//!         .build()?;
//!
//!     let client = SumUpClient::builder().credentials(credentials).build().await?;
//!
//!     let checkout = CreateCheckout::new(10.0, "EUR", "order-42", "MC123")
//!         .description("Two coffees");
//!     let response = client.checkouts().create(checkout).await?;
//!     println!("{:?}", response.body());
//!     Ok(())
//! }
//! ```
//!
//! # Error handling
//!
//! ```rust,no_run
//! use sumup_client::{SumUpClient, SumUpError};
//!
//! # async fn run(client: SumUpClient) {
//! match client.checkouts().find_by_id("chk-1").await {
//!     Ok(response) => println!("{:?}", response.body()),
//!     Err(SumUpError::Authentication { .. }) => println!("refresh the token"),
//!     Err(SumUpError::Validation { fields, .. }) => println!("invalid: {:?}", fields),
//!     Err(other) => println!("{}", other),
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod observability;
pub mod response;
pub mod services;
pub mod transport;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use auth::{AccessToken, Authorization};
pub use client::{SumUpClient, SumUpClientBuilder};
pub use config::{Credentials, CredentialsBuilder, Grant, GrantType};
pub use errors::{SumUpError, SumUpResult};
pub use response::{Response, ResponseBody};
pub use services::{Checkouts, CreateCheckout, Custom};
pub use transport::{
    create_transport, HttpMethod, HttpRequest, HttpTransport, ReqwestTransport, SocketTransport,
};
