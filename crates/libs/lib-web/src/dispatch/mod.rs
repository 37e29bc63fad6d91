//! # Worker Dispatch
//!
//! Forward call to the external AI worker webhook.
//!
//! The dispatch handler persists the human message first; this module only
//! covers the outbound HTTP leg. The forward call is bounded by a fixed
//! timeout and never retried — on failure the caller reports
//! `ServiceUnavailable` and the pending reply is marked failed. The eventual
//! reply text arrives out-of-band through the callback endpoint.

use async_trait::async_trait;
use lib_core::error::{AppError, Result};
use shared::WorkerForwardRequest;
use std::time::Duration;
use tracing::{debug, warn};

/// Outbound seam to the AI worker.
///
/// Trait object so handler tests can substitute a scripted worker.
#[async_trait]
pub trait WorkerForwarder: Send + Sync {
    /// Forward a human message to the worker. Success means the worker
    /// accepted the job, not that a reply exists yet.
    async fn forward(&self, request: &WorkerForwardRequest) -> Result<()>;
}

/// Production forwarder: HTTP POST to the worker webhook with the shared
/// secret in `X-API-KEY`.
pub struct HttpWorkerForwarder {
    client: reqwest::Client,
    webhook_url: String,
    api_key: String,
}

impl HttpWorkerForwarder {
    /// Build a forwarder with the configured timeout (60s in the default
    /// deployment).
    pub fn new(webhook_url: String, api_key: String, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build worker HTTP client: {}", e)))?;

        Ok(Self {
            client,
            webhook_url,
            api_key,
        })
    }
}

#[async_trait]
impl WorkerForwarder for HttpWorkerForwarder {
    async fn forward(&self, request: &WorkerForwardRequest) -> Result<()> {
        debug!(
            "[DISPATCH] Forwarding message {} for session {} to worker",
            request.message_id, request.session_id
        );

        let response = self
            .client
            .post(&self.webhook_url)
            .header("X-API-KEY", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!("[DISPATCH] Worker unreachable: {}", e);
                AppError::ServiceUnavailable(format!("Worker unreachable: {}", e))
            })?;

        if !response.status().is_success() {
            warn!(
                "[DISPATCH] Worker rejected forward call: HTTP {}",
                response.status()
            );
            return Err(AppError::ServiceUnavailable(format!(
                "Worker returned HTTP {}",
                response.status()
            )));
        }

        debug!("[DISPATCH] Worker accepted message {}", request.message_id);
        Ok(())
    }
}

/// Constant-time byte comparison for the shared secret.
///
/// Avoids leaking the secret's matching prefix length through timing.
pub fn secrets_match(provided: &str, expected: &str) -> bool {
    let a = provided.as_bytes();
    let b = expected.as_bytes();
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
