//! Resource services.
//!
//! Each service is bound to a transport and an access token, validates its
//! arguments locally and sends one request per call.

mod checkouts;
mod custom;

pub use checkouts::{Checkouts, CreateCheckout, CHECKOUTS_PATH};
pub use custom::Custom;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

use crate::auth::AccessToken;
use crate::transport::{auth_header, standard_headers};

/// Characters escaped in path segments and query values (RFC 3986 unreserved are kept).
pub(crate) const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Standard headers plus the bearer token.
pub(crate) fn authorized_headers(token: &AccessToken) -> Vec<(String, String)> {
    let mut headers = standard_headers();
    headers.push(auth_header(token));
    headers
}
