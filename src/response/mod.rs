//! API responses and error-envelope classification.
//!
//! The API reports some failures with a 2xx status and an error body, so the
//! status code alone is not enough. [`classify`] inspects the decoded body
//! first and falls back to the status range; [`Response::new`] refuses to
//! build a response for anything it classifies as an error.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::errors::{SumUpError, SumUpResult};

/// `error_code` reported when the token or credentials are rejected.
pub const NOT_AUTHORIZED: &str = "NOT_AUTHORIZED";

/// `error_code` reported for a missing field.
pub const MISSING: &str = "MISSING";

/// `error_code` reported for an invalid field.
pub const INVALID: &str = "INVALID";

const GENERIC_SERVER_ERROR: &str = "Server error";
const GENERIC_CLIENT_ERROR: &str = "Client error";
const GENERIC_AUTH_ERROR: &str = "Not authorized";

/// Keys probed, in order, for a human readable error message.
const MESSAGE_KEYS: [&str; 4] = ["message", "error_message", "error_description", "error"];

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Body that decoded as JSON.
    Json(Value),
    /// Body that is not JSON (or is empty).
    Raw(Vec<u8>),
}

impl ResponseBody {
    /// Decodes a body as JSON when possible, otherwise keeps the raw bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Null) | Err(_) => ResponseBody::Raw(bytes),
            Ok(value) => ResponseBody::Json(value),
        }
    }

    /// Returns the JSON value, if the body is JSON.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Raw(_) => None,
        }
    }

    /// Returns the raw bytes, if the body is not JSON.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ResponseBody::Json(_) => None,
            ResponseBody::Raw(bytes) => Some(bytes),
        }
    }

    /// Returns true for an empty raw body.
    pub fn is_empty(&self) -> bool {
        matches!(self, ResponseBody::Raw(bytes) if bytes.is_empty())
    }
}

impl From<Value> for ResponseBody {
    fn from(value: Value) -> Self {
        ResponseBody::Json(value)
    }
}

/// A response that passed error classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: u16,
    body: ResponseBody,
}

impl Response {
    /// Classifies a status and body, returning the response only when no
    /// error shape matched.
    pub fn new(status: u16, body: ResponseBody) -> SumUpResult<Self> {
        if let Some(error) = classify(status, &body) {
            return Err(error);
        }
        Ok(Self { status, body })
    }

    /// Returns the HTTP status code.
    pub fn http_response_code(&self) -> u16 {
        self.status
    }

    /// Returns the decoded body.
    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    /// Consumes the response, returning the body.
    pub fn into_body(self) -> ResponseBody {
        self.body
    }

    /// Deserializes the JSON body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> SumUpResult<T> {
        match &self.body {
            ResponseBody::Json(value) => T::deserialize(value).map_err(|e| {
                SumUpError::sdk(
                    format!("Unexpected response body: {}", e),
                    Some(self.status),
                )
            }),
            ResponseBody::Raw(_) => Err(SumUpError::sdk(
                "Expected a JSON response body",
                Some(self.status),
            )),
        }
    }
}

/// Returns the most specific error encoded by a status and body, or `None`
/// when the response is usable.
pub fn classify(status: u16, body: &ResponseBody) -> Option<SumUpError> {
    if let ResponseBody::Json(value) = body {
        if let Some(error) = classify_envelope(status, value) {
            return Some(error);
        }
    }

    if status >= 500 {
        return Some(SumUpError::Server {
            message: extract_message(body).unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string()),
            status_code: status,
        });
    }

    if (400..500).contains(&status) {
        return Some(SumUpError::Response {
            message: extract_message(body).unwrap_or_else(|| GENERIC_CLIENT_ERROR.to_string()),
            status_code: status,
        });
    }

    None
}

fn classify_envelope(status: u16, value: &Value) -> Option<SumUpError> {
    match value {
        Value::Object(object) => match error_code(object) {
            Some(code) if code.eq_ignore_ascii_case(NOT_AUTHORIZED) => {
                Some(SumUpError::Authentication {
                    message: string_field(object, "error_message")
                        .unwrap_or_else(|| GENERIC_AUTH_ERROR.to_string()),
                    status_code: status,
                })
            }
            Some(code) if is_validation_code(code) => Some(SumUpError::Validation {
                fields: string_field(object, "param").into_iter().collect(),
                status_code: status,
            }),
            _ => None,
        },
        Value::Array(items) => {
            let first = items.first()?.as_object()?;
            if !error_code(first).is_some_and(is_validation_code) {
                return None;
            }
            let fields = items
                .iter()
                .filter_map(Value::as_object)
                .filter_map(|item| string_field(item, "param"))
                .collect();
            Some(SumUpError::Validation {
                fields,
                status_code: status,
            })
        }
        _ => None,
    }
}

fn error_code(object: &Map<String, Value>) -> Option<&str> {
    object.get("error_code").and_then(Value::as_str)
}

fn is_validation_code(code: &str) -> bool {
    code.eq_ignore_ascii_case(MISSING) || code.eq_ignore_ascii_case(INVALID)
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

fn extract_message(body: &ResponseBody) -> Option<String> {
    let object = body.as_json()?.as_object()?;
    MESSAGE_KEYS.iter().find_map(|key| match object.get(*key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    })
}
