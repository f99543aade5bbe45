//! Mock implementations for testing.
//!
//! [`MockTransport`] replays queued responses in order and records every
//! request it receives, so flows can be tested without a network.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::errors::{SumUpError, SumUpResult};
use crate::response::{Response, ResponseBody};
use crate::transport::{HttpRequest, HttpTransport};

/// A queued mock outcome.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// A response reaching the classifier.
    Reply {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: ResponseBody,
    },
    /// A transport-level failure.
    Failure(SumUpError),
}

impl MockResponse {
    /// A JSON response.
    pub fn json(status: u16, body: Value) -> Self {
        Self::Reply {
            status,
            body: ResponseBody::from(body),
        }
    }

    /// A raw, non-JSON response.
    pub fn raw(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::Reply {
            status,
            body: ResponseBody::Raw(body.into()),
        }
    }
}

/// Mock HTTP transport for testing.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<MockResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    /// Creates a mock with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a JSON response.
    pub fn with_json(self, status: u16, body: Value) -> Self {
        self.queue(MockResponse::json(status, body));
        self
    }

    /// Queues a raw response.
    pub fn with_raw(self, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.queue(MockResponse::raw(status, body));
        self
    }

    /// Queues a transport failure.
    pub fn with_error(self, error: SumUpError) -> Self {
        self.queue(MockResponse::Failure(error));
        self
    }

    /// Queues an outcome.
    pub fn queue(&self, response: MockResponse) {
        lock(&self.responses).push_back(response);
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    /// Returns the most recent request.
    pub fn last_request(&self) -> Option<HttpRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Number of requests received.
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> SumUpResult<Response> {
        lock(&self.requests).push(request);

        match lock(&self.responses).pop_front() {
            Some(MockResponse::Reply { status, body }) => Response::new(status, body),
            Some(MockResponse::Failure(error)) => Err(error),
            None => Err(SumUpError::connection("No mock response queued")),
        }
    }
}
