//! # Fulfillment Runner
//!
//! Runs one batch of orders from a JSON file through the pipeline.
//!
//! ## Usage
//! ```bash
//! fulfillment-runner --orders orders.json
//! fulfillment-runner --config ./fulfillment.toml --db ./data/f.db --orders - --dry-run
//! ```
//!
//! ## Wiring
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  args ──► FulfillmentConfig::load ──► Database::new (migrations)       │
//! │                    │                          │                         │
//! │                    ▼                          ▼                         │
//! │     WebhookNotifier | NoopNotifier      dyn OrderStore                  │
//! │                    │                          │                         │
//! │                    └──────► FulfillmentPipeline ◄── FileOrderLog        │
//! │                                     │                                   │
//! │                                     ▼                                   │
//! │                     BatchResult as pretty JSON on stdout                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Logs go to stderr so stdout stays machine-readable.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::info;
use tracing_subscriber::EnvFilter;

use fulfillment_core::Order;
use fulfillment_db::{Database, DbConfig};
use fulfillment_pipeline::{
    FileOrderLog, FulfillmentConfig, FulfillmentPipeline, NoopNotifier, Notifier,
    ProcessOptions, WebhookNotifier,
};

const USAGE: &str = "\
Fulfillment Runner

Usage: fulfillment-runner [OPTIONS]

Options:
      --config <PATH>  Config file (default: platform config dir)
      --orders <PATH>  JSON array of orders, `-` for stdin (default: -)
      --db <PATH>      SQLite database (overrides config)
      --dry-run        Validate and price only, no side effects
      --no-notify      Do not send webhook notifications
  -h, --help           Show this help message";

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    config: Option<PathBuf>,
    orders: Option<PathBuf>,
    db: Option<PathBuf>,
    dry_run: bool,
    no_notify: bool,
    help: bool,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> anyhow::Result<Self> {
        let mut parsed = Args::default();
        let mut iter = args.into_iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--config" => parsed.config = Some(value_for(&arg, iter.next())?),
                "--orders" => parsed.orders = Some(value_for(&arg, iter.next())?),
                "--db" => parsed.db = Some(value_for(&arg, iter.next())?),
                "--dry-run" => parsed.dry_run = true,
                "--no-notify" => parsed.no_notify = true,
                "--help" | "-h" => parsed.help = true,
                other => bail!("unknown argument: {}\n\n{}", other, USAGE),
            }
        }

        Ok(parsed)
    }

    fn options(&self) -> ProcessOptions {
        ProcessOptions {
            notify: !self.no_notify,
            dry_run: self.dry_run,
        }
    }
}

fn value_for(flag: &str, value: Option<String>) -> anyhow::Result<PathBuf> {
    match value {
        Some(v) => Ok(PathBuf::from(v)),
        None => bail!("{} requires a value", flag),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,fulfillment=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Parses a JSON array of orders. `null` entries are kept and skipped later.
fn parse_orders(json: &str) -> anyhow::Result<Vec<Option<Order>>> {
    serde_json::from_str(json).context("orders must be a JSON array of order objects or null")
}

async fn read_orders(path: Option<&PathBuf>) -> anyhow::Result<Vec<Option<Order>>> {
    let json = match path {
        Some(p) if p.as_os_str() != "-" => tokio::fs::read_to_string(p)
            .await
            .with_context(|| format!("reading orders from {}", p.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading orders from stdin")?;
            buf
        }
    };

    parse_orders(&json)
}

fn build_notifier(config: &FulfillmentConfig) -> anyhow::Result<Arc<dyn Notifier>> {
    match config.webhook_url() {
        Some(url) => {
            info!(url = %url, "Webhook notifications enabled");
            Ok(Arc::new(WebhookNotifier::new(url, config.notification_timeout())?))
        }
        None => Ok(Arc::new(NoopNotifier)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse(std::env::args().skip(1))?;
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    init_tracing();

    let mut config = FulfillmentConfig::load(args.config.clone()).context("loading config")?;
    if let Some(db) = &args.db {
        config.database.path = db.clone();
    }

    let orders = read_orders(args.orders.as_ref()).await?;
    info!(count = orders.len(), "Orders loaded");

    let db = Database::new(DbConfig::new(&config.database.path))
        .await
        .context("opening database")?;

    let pipeline = FulfillmentPipeline::new(
        Arc::new(db.clone()),
        build_notifier(&config)?,
        Arc::new(FileOrderLog),
        &config,
    );

    let result = pipeline.process(&orders, args.options()).await;
    db.close().await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
