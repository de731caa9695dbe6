//! # Batch Outcomes
//!
//! Result values produced by [`FulfillmentPipeline::process`].
//!
//! ## JSON Shape
//! ```json
//! {
//!   "processed": [{ "order_id": "ord-1", "total": 11500, "status": "processed" }],
//!   "failed": [{ "order": { "id": "ord-2", ... }, "reason": { "kind": "customer_banned" } }],
//!   "summary": { "total": 1, "failed": 1 }
//! }
//! ```
//!
//! [`FulfillmentPipeline::process`]: crate::FulfillmentPipeline::process

use serde::{Deserialize, Serialize};

use fulfillment_core::{FailureReason, Money, Order, OrderStatus};

/// An order that made it through every stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedOrder {
    pub order_id: String,
    /// Computed total, not the declared one.
    pub total: Money,
    pub status: OrderStatus,
}

/// An order that stopped at some stage, with the input order untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedOrder {
    pub order: Order,
    pub reason: FailureReason,
}

/// What happened to a single input slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingOutcome {
    /// Absent or not pending. Reported nowhere.
    Skipped,
    Processed(ProcessedOrder),
    Failed(FailedOrder),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Number of processed orders.
    pub total: usize,
    /// Number of failed orders.
    pub failed: usize,
}

/// Aggregate result of one batch. Lists keep input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub processed: Vec<ProcessedOrder>,
    pub failed: Vec<FailedOrder>,
    pub summary: BatchSummary,
}

impl BatchResult {
    /// Adds one outcome, keeping `summary` in step with the lists.
    pub fn record(&mut self, outcome: ProcessingOutcome) {
        match outcome {
            ProcessingOutcome::Skipped => {}
            ProcessingOutcome::Processed(processed) => {
                self.processed.push(processed);
                self.summary.total = self.processed.len();
            }
            ProcessingOutcome::Failed(failed) => {
                self.failed.push(failed);
                self.summary.failed = self.failed.len();
            }
        }
    }

    /// IDs of processed orders, in input order.
    pub fn processed_ids(&self) -> Vec<&str> {
        self.processed.iter().map(|p| p.order_id.as_str()).collect()
    }

    /// IDs of failed orders, in input order.
    pub fn failed_ids(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.order.id.as_str()).collect()
    }
}

impl FromIterator<ProcessingOutcome> for BatchResult {
    fn from_iter<I: IntoIterator<Item = ProcessingOutcome>>(iter: I) -> Self {
        let mut result = BatchResult::default();
        for outcome in iter {
            result.record(outcome);
        }
        result
    }
}
