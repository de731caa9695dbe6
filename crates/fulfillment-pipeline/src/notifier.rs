//! # Notifier
//!
//! Delivery of `order_processed` events after a commit. The pipeline never
//! fails an order because of a notifier error; it logs and moves on.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use fulfillment_core::validation::validate_http_url;
use fulfillment_core::OrderEvent;

use crate::error::{PipelineError, PipelineResult};

/// Sends order events to whoever is listening.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, event: &OrderEvent) -> PipelineResult<()>;
}

// =============================================================================
// Webhook
// =============================================================================

/// Posts events as JSON to an HTTP endpoint.
///
/// ## Request
/// ```text
/// POST {url}
/// Content-Type: application/json
///
/// { "event": "order_processed", "order_id": "ord-1", "total": 11500 }
/// ```
/// Any non-2xx response is an error.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    /// Builds a notifier with a per-request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> PipelineResult<Self> {
        let url = url.into();
        validate_http_url("webhook_url", &url)?;

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(WebhookNotifier { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, event: &OrderEvent) -> PipelineResult<()> {
        debug!(url = %self.url, order_id = %event.order_id, "Posting order event");

        let resp = self.client.post(&self.url).json(event).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Notify(format!(
                "webhook returned {}: {}",
                status, body
            )));
        }

        Ok(())
    }
}

// =============================================================================
// No-op
// =============================================================================

/// Drops every event. Used when no webhook is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send(&self, event: &OrderEvent) -> PipelineResult<()> {
        debug!(order_id = %event.order_id, "No notifier configured, dropping event");
        Ok(())
    }
}
