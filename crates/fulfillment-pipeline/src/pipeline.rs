//! # Fulfillment Pipeline
//!
//! Runs each order of a batch through a fixed sequence of stages.
//!
//! ## Per-Order Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Option<Order>                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. skip filter ───── None / not pending ──────────────► Skipped        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. total > 0 ? ───────────────────────────────────────► InvalidTotal   │
//! │     no negative qty / price ? ───────────────────────► InvalidItem(sku) │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. customer exists, not banned ? ─────────► CustomerNotFound/Banned    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. every item in stock ? (first miss wins) ──► InsufficientStock(sku)  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  5. |computed − declared| ≤ 1¢ ? ──────────────────────► TotalMismatch  │
//! │     amounts fit in i64 cents ? ───────────────────► AmountOutOfRange    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  6. commit (skipped in dry run)                                         │
//! │     decrement each item → save processed copy → notify → append log    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Processed { order_id, total, status }                                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Orders run one at a time in input order and every collaborator call is
//! awaited before the next starts. Nothing locks the store between the stock
//! check and the decrement, so a store shared with other writers can still
//! oversell.
//!
//! ## Partial Commits
//! A store or log failure during commit fails that order only. Decrements,
//! saves or notifications already done for it stay done.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use fulfillment_core::validation::{
    check_customer, check_declared_total, check_item_stock, check_items,
};
use fulfillment_core::{
    FailureReason, Money, Order, OrderEvent, OrderStatus, PriceBreakdown, PricingPolicy,
};

use crate::config::FulfillmentConfig;
use crate::error::PipelineError;
use crate::notifier::Notifier;
use crate::order_log::OrderLog;
use crate::outcome::{BatchResult, FailedOrder, ProcessedOrder, ProcessingOutcome};
use crate::store::OrderStore;

/// Per-call switches for [`FulfillmentPipeline::process`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Send `order_processed` events after commit.
    pub notify: bool,
    /// Validate and price only; no decrement, save, notify or log.
    pub dry_run: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        ProcessOptions {
            notify: true,
            dry_run: false,
        }
    }
}

impl ProcessOptions {
    pub fn dry_run() -> Self {
        ProcessOptions {
            dry_run: true,
            ..Self::default()
        }
    }

    pub fn without_notify() -> Self {
        ProcessOptions {
            notify: false,
            ..Self::default()
        }
    }
}

/// Batch order processor.
///
/// ## Usage
/// ```rust,ignore
/// let pipeline = FulfillmentPipeline::new(
///     Arc::new(db),
///     Arc::new(NoopNotifier),
///     Arc::new(FileOrderLog),
///     &config,
/// );
/// let result = pipeline.process(&orders, ProcessOptions::default()).await;
/// ```
pub struct FulfillmentPipeline {
    store: Arc<dyn OrderStore>,
    notifier: Arc<dyn Notifier>,
    order_log: Arc<dyn OrderLog>,
    pricing: PricingPolicy,
    log_destination: PathBuf,
}

impl FulfillmentPipeline {
    pub fn new(
        store: Arc<dyn OrderStore>,
        notifier: Arc<dyn Notifier>,
        order_log: Arc<dyn OrderLog>,
        config: &FulfillmentConfig,
    ) -> Self {
        FulfillmentPipeline {
            store,
            notifier,
            order_log,
            pricing: config.pricing_policy(),
            log_destination: config.log_destination(),
        }
    }

    pub fn pricing(&self) -> &PricingPolicy {
        &self.pricing
    }

    /// Processes a batch. Never fails: every problem ends up in the result.
    ///
    /// `None` entries and orders that are not `pending` are skipped and
    /// appear in neither list.
    pub async fn process(&self, orders: &[Option<Order>], options: ProcessOptions) -> BatchResult {
        info!(
            orders = orders.len(),
            dry_run = options.dry_run,
            notify = options.notify,
            "Processing order batch"
        );

        let mut result = BatchResult::default();
        let mut skipped = 0usize;

        for slot in orders {
            let outcome = match slot {
                Some(order) => self.process_order(order, options).await,
                None => ProcessingOutcome::Skipped,
            };

            if outcome == ProcessingOutcome::Skipped {
                skipped += 1;
            }
            result.record(outcome);
        }

        info!(
            processed = result.summary.total,
            failed = result.summary.failed,
            skipped,
            "Order batch complete"
        );

        result
    }

    /// Runs one order through every stage.
    pub async fn process_order(&self, order: &Order, options: ProcessOptions) -> ProcessingOutcome {
        if !order.is_pending() {
            debug!(order_id = %order.id, status = %order.status, "Skipping non-pending order");
            return ProcessingOutcome::Skipped;
        }

        match self.run_stages(order, options).await {
            Ok(total) => {
                debug!(order_id = %order.id, total = %total, "Order processed");
                ProcessingOutcome::Processed(ProcessedOrder {
                    order_id: order.id.clone(),
                    total,
                    status: OrderStatus::Processed,
                })
            }
            Err(reason) => {
                warn!(order_id = %order.id, reason = %reason, "Order failed");
                ProcessingOutcome::Failed(FailedOrder {
                    order: order.clone(),
                    reason,
                })
            }
        }
    }

    async fn run_stages(&self, order: &Order, options: ProcessOptions) -> Result<Money, FailureReason> {
        check_declared_total(order)?;
        check_items(order)?;
        self.check_customer(order).await?;
        self.check_inventory(order).await?;

        let breakdown = self.pricing.reconcile(order)?;
        debug!(
            order_id = %order.id,
            subtotal = %breakdown.subtotal,
            tax = %breakdown.tax,
            shipping = %breakdown.shipping,
            total = %breakdown.total,
            "Totals reconciled"
        );

        if options.dry_run {
            debug!(order_id = %order.id, "Dry run, skipping commit");
        } else {
            self.commit(order, &breakdown, options).await?;
        }

        Ok(breakdown.total)
    }

    // =========================================================================
    // Stages
    // =========================================================================

    async fn check_customer(&self, order: &Order) -> Result<(), FailureReason> {
        let customer = self
            .store
            .lookup_customer(&order.customer_id)
            .await
            .map_err(store_failure)?;

        check_customer(customer.as_ref())?;
        Ok(())
    }

    /// Stops at the first item that can't be covered.
    async fn check_inventory(&self, order: &Order) -> Result<(), FailureReason> {
        for item in &order.items {
            let stock = self
                .store
                .lookup_inventory(&item.sku)
                .await
                .map_err(store_failure)?;

            check_item_stock(item, stock.as_ref())?;
        }
        Ok(())
    }

    async fn commit(
        &self,
        order: &Order,
        breakdown: &PriceBreakdown,
        options: ProcessOptions,
    ) -> Result<(), FailureReason> {
        for item in &order.items {
            self.store
                .decrement_inventory(&item.sku, item.quantity)
                .await
                .map_err(store_failure)?;
        }

        let now = Utc::now();
        let processed = order.mark_processed(now);
        self.store
            .save_processed_order(&processed)
            .await
            .map_err(store_failure)?;

        if options.notify {
            let event = OrderEvent::order_processed(&order.id, breakdown.total);
            if let Err(e) = self.notifier.send(&event).await {
                warn!(order_id = %order.id, error = %e, "Order notification failed, continuing");
            }
        }

        self.order_log
            .append_line(&self.log_destination, &log_line(now, &order.id, breakdown.total))
            .await
            .map_err(|e| match e {
                PipelineError::LogWrite(message) => FailureReason::log_write(message),
                other => FailureReason::log_write(other),
            })?;

        Ok(())
    }
}

fn store_failure(err: PipelineError) -> FailureReason {
    match err {
        PipelineError::Store(message) => FailureReason::store(message),
        other => FailureReason::store(other),
    }
}

/// `"{timestamp} - Processed order {id} for {total}"`
fn log_line(at: DateTime<Utc>, order_id: &str, total: Money) -> String {
    format!(
        "{} - Processed order {} for {}",
        at.format("%Y-%m-%d %H:%M:%S%.6f"),
        order_id,
        total
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineResult;
    use crate::store::InMemoryStore;
    use async_trait::async_trait;
    use fulfillment_core::{Customer, InventoryRecord, OrderItem};
    use std::path::Path;
    use std::sync::Mutex;

    // -------------------------------------------------------------------------
    // Doubles
    // -------------------------------------------------------------------------

    #[derive(Default)]
    struct RecordingNotifier {
        events: Mutex<Vec<OrderEvent>>,
        fail: bool,
    }

    impl RecordingNotifier {
        fn failing() -> Self {
            RecordingNotifier {
                fail: true,
                ..Default::default()
            }
        }

        fn events(&self) -> Vec<OrderEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, event: &OrderEvent) -> PipelineResult<()> {
            self.events.lock().unwrap().push(event.clone());
            if self.fail {
                return Err(PipelineError::Notify("connection refused".into()));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingLog {
        lines: Mutex<Vec<(PathBuf, String)>>,
        fail: bool,
    }

    impl RecordingLog {
        fn failing() -> Self {
            RecordingLog {
                fail: true,
                ..Default::default()
            }
        }

        fn lines(&self) -> Vec<(PathBuf, String)> {
            self.lines.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl OrderLog for RecordingLog {
        async fn append_line(&self, destination: &Path, line: &str) -> PipelineResult<()> {
            if self.fail {
                return Err(PipelineError::LogWrite("disk full".into()));
            }
            self.lines
                .lock()
                .unwrap()
                .push((destination.to_path_buf(), line.to_string()));
            Ok(())
        }
    }

    /// Reads delegate to an in-memory store; saves always fail.
    struct SaveFailingStore(InMemoryStore);

    #[async_trait]
    impl OrderStore for SaveFailingStore {
        async fn lookup_customer(&self, id: &str) -> PipelineResult<Option<Customer>> {
            self.0.lookup_customer(id).await
        }

        async fn lookup_inventory(&self, sku: &str) -> PipelineResult<Option<InventoryRecord>> {
            self.0.lookup_inventory(sku).await
        }

        async fn decrement_inventory(&self, sku: &str, quantity: i64) -> PipelineResult<()> {
            self.0.decrement_inventory(sku, quantity).await
        }

        async fn save_processed_order(&self, _order: &Order) -> PipelineResult<()> {
            Err(PipelineError::Store("database is locked".into()))
        }
    }

    // -------------------------------------------------------------------------
    // Fixtures
    // -------------------------------------------------------------------------

    /// 10% tax, free shipping strictly above $100.00, $5.00 shipping.
    fn config() -> FulfillmentConfig {
        let mut config = FulfillmentConfig::default();
        config.log.dir = PathBuf::from("/var/log/fulfillment");
        config
    }

    fn store() -> Arc<InMemoryStore> {
        Arc::new(
            InMemoryStore::new()
                .with_customer(Customer::active("c-1"))
                .with_customer(Customer::banned("c-banned"))
                .with_stock("A", 10)
                .with_stock("B", 1),
        )
    }

    struct Harness {
        store: Arc<InMemoryStore>,
        notifier: Arc<RecordingNotifier>,
        log: Arc<RecordingLog>,
        pipeline: FulfillmentPipeline,
    }

    fn harness_with(notifier: RecordingNotifier, log: RecordingLog) -> Harness {
        let store = store();
        let notifier = Arc::new(notifier);
        let log = Arc::new(log);
        let pipeline =
            FulfillmentPipeline::new(store.clone(), notifier.clone(), log.clone(), &config());
        Harness {
            store,
            notifier,
            log,
            pipeline,
        }
    }

    fn harness() -> Harness {
        harness_with(RecordingNotifier::default(), RecordingLog::default())
    }

    /// Items [A: $50.00 × 2], declared $115.00.
    fn good_order(id: &str) -> Order {
        Order::pending(id, "c-1", 11_500).with_item(OrderItem::new("A", 5_000, 2))
    }

    // -------------------------------------------------------------------------
    // Skip filter + validation stages
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_absent_and_non_pending_orders_are_skipped() {
        let h = harness();
        let mut done = good_order("o-done");
        done.status = OrderStatus::Processed;

        let result = h
            .pipeline
            .process(&[None, Some(done), None], ProcessOptions::default())
            .await;

        assert!(result.processed.is_empty());
        assert!(result.failed.is_empty());
        assert_eq!(result.summary.total, 0);
        assert_eq!(result.summary.failed, 0);
    }

    #[tokio::test]
    async fn test_non_positive_total_is_invalid() {
        let h = harness();
        let orders = vec![
            Some(Order::pending("zero", "c-1", 0).with_item(OrderItem::new("A", 100, 1))),
            Some(Order::pending("neg", "c-1", -500)),
        ];

        let result = h.pipeline.process(&orders, ProcessOptions::default()).await;

        assert_eq!(result.failed_ids(), vec!["zero", "neg"]);
        assert!(result
            .failed
            .iter()
            .all(|f| f.reason == FailureReason::InvalidTotal));
    }

    #[tokio::test]
    async fn test_negative_item_is_invalid_and_leaves_stock() {
        let h = harness();
        let bad = Order::pending("o-neg", "c-1", 500)
            .with_item(OrderItem::new("A", 100, 1))
            .with_item(OrderItem::new("B", 100, -5));

        let result = h
            .pipeline
            .process(&[Some(bad), Some(good_order("o-1"))], ProcessOptions::default())
            .await;

        assert_eq!(
            result.failed[0].reason,
            FailureReason::InvalidItem { sku: "B".to_string() }
        );
        assert_eq!(result.processed_ids(), vec!["o-1"]);
        assert_eq!(h.store.stock_of("A"), Some(8));
        assert_eq!(h.store.stock_of("B"), Some(1));
    }

    #[tokio::test]
    async fn test_customer_checks() {
        let h = harness();
        let mut unknown = good_order("o-unknown");
        unknown.customer_id = "nobody".to_string();
        let mut banned = good_order("o-banned");
        banned.customer_id = "c-banned".to_string();

        let result = h
            .pipeline
            .process(&[Some(unknown), Some(banned)], ProcessOptions::default())
            .await;

        assert_eq!(result.failed[0].reason, FailureReason::CustomerNotFound);
        assert_eq!(result.failed[1].reason, FailureReason::CustomerBanned);
        assert_eq!(h.store.stock_of("A"), Some(10));
    }

    #[tokio::test]
    async fn test_insufficient_stock_short_circuits_without_decrement() {
        let h = harness();
        // A is covered, B has 1 left but 2 are requested, C is never reached.
        let order = Order::pending("o-1", "c-1", 10_000)
            .with_item(OrderItem::new("A", 1_000, 2))
            .with_item(OrderItem::new("B", 1_000, 2))
            .with_item(OrderItem::new("C", 1_000, 1));

        let result = h.pipeline.process(&[Some(order.clone())], ProcessOptions::default()).await;

        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].reason, FailureReason::insufficient_stock("B"));
        assert_eq!(result.failed[0].order, order);
        assert_eq!(h.store.stock_of("A"), Some(10));
        assert_eq!(h.store.stock_of("B"), Some(1));
        assert!(h.store.saved_orders().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_sku_is_insufficient_stock() {
        let h = harness();
        let order = Order::pending("o-1", "c-1", 1_000).with_item(OrderItem::new("ZZZ", 1_000, 1));

        let result = h.pipeline.process(&[Some(order)], ProcessOptions::default()).await;

        assert_eq!(result.failed[0].reason, FailureReason::insufficient_stock("ZZZ"));
    }

    // -------------------------------------------------------------------------
    // Pricing
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_matching_total_is_processed() {
        let h = harness();

        let result = h
            .pipeline
            .process(&[Some(good_order("o-1"))], ProcessOptions::default())
            .await;

        assert_eq!(
            result.processed,
            vec![ProcessedOrder {
                order_id: "o-1".to_string(),
                total: Money::from_cents(11_500),
                status: OrderStatus::Processed,
            }]
        );
        assert_eq!(result.summary.total, 1);
    }

    #[tokio::test]
    async fn test_free_shipping_total_mismatch() {
        let h = harness();
        // $120 subtotal ships free: 120 + 12 = 132, declared 126.
        let order = Order::pending("o-1", "c-1", 12_600).with_item(OrderItem::new("A", 6_000, 2));

        let result = h.pipeline.process(&[Some(order)], ProcessOptions::default()).await;

        assert_eq!(
            result.failed[0].reason,
            FailureReason::TotalMismatch {
                computed: Money::from_cents(13_200),
                declared: Money::from_cents(12_600),
            }
        );
        assert_eq!(h.store.stock_of("A"), Some(10));
    }

    #[tokio::test]
    async fn test_subtotal_at_threshold_pays_shipping() {
        let h = harness();
        // Exactly $100: 100 + 10 + 5.
        let order = Order::pending("o-1", "c-1", 11_500).with_item(OrderItem::new("A", 10_000, 1));

        let result = h.pipeline.process(&[Some(order)], ProcessOptions::default()).await;

        assert_eq!(result.processed[0].total, Money::from_cents(11_500));
    }

    #[tokio::test]
    async fn test_amount_overflow_fails_only_that_order() {
        let h = harness();
        let huge = Order::pending("o-huge", "c-1", 100)
            .with_item(OrderItem::new("A", i64::MAX / 2, 3));

        let result = h
            .pipeline
            .process(&[Some(huge), Some(good_order("o-1"))], ProcessOptions::default())
            .await;

        assert_eq!(result.failed_ids(), vec!["o-huge"]);
        assert_eq!(result.failed[0].reason, FailureReason::AmountOutOfRange);
        assert_eq!(result.processed_ids(), vec!["o-1"]);
        assert_eq!(h.store.stock_of("A"), Some(8));
    }

    #[tokio::test]
    async fn test_half_cent_tax_is_not_rounded_into_tolerance() {
        let h = harness();
        // 5¢ + 0.5¢ tax + 500¢ shipping = 505.5¢; 507¢ is 1.5¢ away
        let order = Order::pending("o-1", "c-1", 507).with_item(OrderItem::new("A", 5, 1));

        let result = h.pipeline.process(&[Some(order)], ProcessOptions::default()).await;

        assert_eq!(
            result.failed[0].reason,
            FailureReason::TotalMismatch {
                computed: Money::from_cents(506),
                declared: Money::from_cents(507),
            }
        );
        assert_eq!(h.store.stock_of("A"), Some(10));
    }

    #[tokio::test]
    async fn test_one_cent_tolerance() {
        let h = harness();
        let within = Order::pending("within", "c-1", 11_501).with_item(OrderItem::new("A", 5_000, 2));
        let outside = Order::pending("outside", "c-1", 11_502).with_item(OrderItem::new("A", 5_000, 2));

        let result = h
            .pipeline
            .process(&[Some(within), Some(outside)], ProcessOptions::dry_run())
            .await;

        assert_eq!(result.processed_ids(), vec!["within"]);
        assert_eq!(result.processed[0].total, Money::from_cents(11_500));
        assert_eq!(result.failed_ids(), vec!["outside"]);
    }

    // -------------------------------------------------------------------------
    // Commit
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_commit_side_effects() {
        let h = harness();
        let input = good_order("o-1");

        let result = h.pipeline.process(&[Some(input.clone())], ProcessOptions::default()).await;
        assert_eq!(result.summary.total, 1);

        assert_eq!(h.store.stock_of("A"), Some(8));

        let saved = h.store.saved_orders();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].status, OrderStatus::Processed);
        assert!(saved[0].processed_at.is_some());
        assert_eq!(saved[0].items, input.items);

        assert_eq!(
            h.notifier.events(),
            vec![OrderEvent::order_processed("o-1", Money::from_cents(11_500))]
        );

        let lines = h.log.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, PathBuf::from("/var/log/fulfillment/orders.log"));
        assert!(lines[0].1.ends_with(" - Processed order o-1 for $115.00"));
    }

    #[tokio::test]
    async fn test_input_orders_are_not_mutated() {
        let h = harness();
        let orders = vec![Some(good_order("o-1"))];
        let before = orders.clone();

        h.pipeline.process(&orders, ProcessOptions::default()).await;

        assert_eq!(orders, before);
    }

    #[tokio::test]
    async fn test_notify_disabled_sends_nothing() {
        let h = harness();

        let result = h
            .pipeline
            .process(&[Some(good_order("o-1"))], ProcessOptions::without_notify())
            .await;

        assert_eq!(result.summary.total, 1);
        assert!(h.notifier.events().is_empty());
        assert_eq!(h.log.lines().len(), 1);
    }

    #[tokio::test]
    async fn test_notifier_failure_is_swallowed() {
        let h = harness_with(RecordingNotifier::failing(), RecordingLog::default());

        let result = h
            .pipeline
            .process(&[Some(good_order("o-1"))], ProcessOptions::default())
            .await;

        assert_eq!(result.processed_ids(), vec!["o-1"]);
        assert!(result.failed.is_empty());
        assert_eq!(h.notifier.events().len(), 1);
        assert_eq!(h.log.lines().len(), 1);
    }

    #[tokio::test]
    async fn test_log_failure_fails_only_that_order() {
        let h = harness_with(RecordingNotifier::default(), RecordingLog::failing());

        let result = h
            .pipeline
            .process(
                &[Some(good_order("o-1")), Some(good_order("o-2"))],
                ProcessOptions::default(),
            )
            .await;

        assert!(result.processed.is_empty());
        assert_eq!(result.failed_ids(), vec!["o-1", "o-2"]);
        assert_eq!(
            result.failed[0].reason,
            FailureReason::LogWriteFailed {
                message: "disk full".to_string()
            }
        );
        // Earlier commit steps are not undone.
        assert_eq!(h.store.stock_of("A"), Some(6));
        assert_eq!(h.store.saved_orders().len(), 2);
    }

    #[tokio::test]
    async fn test_store_failure_fails_only_that_order() {
        let inner = InMemoryStore::new()
            .with_customer(Customer::active("c-1"))
            .with_stock("A", 10);
        let store = Arc::new(SaveFailingStore(inner));
        let notifier = Arc::new(RecordingNotifier::default());
        let log = Arc::new(RecordingLog::default());
        let pipeline = FulfillmentPipeline::new(store.clone(), notifier.clone(), log.clone(), &config());

        let mut unknown = good_order("o-2");
        unknown.customer_id = "nobody".to_string();

        let result = pipeline
            .process(&[Some(good_order("o-1")), Some(unknown)], ProcessOptions::default())
            .await;

        assert_eq!(
            result.failed[0].reason,
            FailureReason::StoreError {
                message: "database is locked".to_string()
            }
        );
        assert_eq!(result.failed[1].reason, FailureReason::CustomerNotFound);
        assert_eq!(store.0.stock_of("A"), Some(8));
        assert!(notifier.events().is_empty());
        assert!(log.lines().is_empty());
    }

    // -------------------------------------------------------------------------
    // Dry run
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_dry_run_matches_live_partition_without_side_effects() {
        let mut short = good_order("o-short");
        short.items = vec![OrderItem::new("B", 5_000, 2)];
        short.total_cents = 11_500;
        let mut banned = good_order("o-banned");
        banned.customer_id = "c-banned".to_string();

        let orders = vec![
            Some(good_order("o-1")),
            None,
            Some(short),
            Some(banned),
            Some(Order::pending("o-zero", "c-1", 0)),
            Some(good_order("o-2")),
        ];

        let dry = harness();
        let dry_result = dry.pipeline.process(&orders, ProcessOptions::dry_run()).await;

        assert_eq!(dry.store.stock_of("A"), Some(10));
        assert_eq!(dry.store.stock_of("B"), Some(1));
        assert!(dry.store.saved_orders().is_empty());
        assert!(dry.notifier.events().is_empty());
        assert!(dry.log.lines().is_empty());

        let live = harness();
        let live_result = live.pipeline.process(&orders, ProcessOptions::default()).await;

        assert_eq!(dry_result, live_result);
        assert_eq!(dry_result.processed_ids(), vec!["o-1", "o-2"]);
        assert_eq!(dry_result.failed_ids(), vec!["o-short", "o-banned", "o-zero"]);
    }

    #[tokio::test]
    async fn test_stock_consumed_by_earlier_order_in_batch() {
        let h = harness();
        // B has 1 unit: the first order takes it, the second finds none.
        let first = Order::pending("o-1", "c-1", 1_600).with_item(OrderItem::new("B", 1_000, 1));
        let second = Order::pending("o-2", "c-1", 1_600).with_item(OrderItem::new("B", 1_000, 1));

        let result = h
            .pipeline
            .process(&[Some(first), Some(second)], ProcessOptions::default())
            .await;

        assert_eq!(result.processed_ids(), vec!["o-1"]);
        assert_eq!(result.failed[0].reason, FailureReason::insufficient_stock("B"));
        assert_eq!(h.store.stock_of("B"), Some(0));
    }

    #[test]
    fn test_log_line_format() {
        let at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00.5Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            log_line(at, "o-9", Money::from_cents(11_500)),
            "2024-05-01 12:00:00.500000 - Processed order o-9 for $115.00"
        );
    }
}
