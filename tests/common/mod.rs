//! Shared test support: a scripted transport standing in for the
//! network.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use aniscope::{FetchError, Transport};

/// One scripted response for a URL. Responses are consumed in order,
/// one per fetch.
pub enum Scripted {
    /// Succeed with the given body.
    Body(Vec<u8>),
    /// Fail with an HTTP status.
    Status(u16),
    /// Sleep for the given duration, then succeed with the body.
    /// Cancellation during the sleep fails the fetch.
    DelayedBody(Duration, Vec<u8>),
}

impl Scripted {
    pub fn html(body: &str) -> Self {
        Self::Body(body.as_bytes().to_vec())
    }
}

/// Transport double that replays scripted responses and records calls.
pub struct MockTransport {
    responses: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn script(&self, url: &str, response: Scripted) {
        self.responses
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == url).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch(&self, url: &str, token: CancellationToken) -> Result<Bytes, FetchError> {
        if token.is_cancelled() {
            return Err(FetchError::Cancelled {
                url: url.to_string(),
            });
        }

        self.calls.lock().unwrap().push(url.to_string());

        let next = self
            .responses
            .lock()
            .unwrap()
            .get_mut(url)
            .and_then(|queue| queue.pop_front());

        match next {
            Some(Scripted::Body(body)) => Ok(Bytes::from(body)),
            Some(Scripted::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
            Some(Scripted::DelayedBody(delay, body)) => {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => Ok(Bytes::from(body)),
                    _ = token.cancelled() => Err(FetchError::Cancelled {
                        url: url.to_string(),
                    }),
                }
            }
            // Unscripted URL: behave like a missing resource
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
