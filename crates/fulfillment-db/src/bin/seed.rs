//! # Seed Data Generator
//!
//! Populates the database with demo customers and stock so the runner has
//! something to process against.
//!
//! ## Usage
//! ```bash
//! # 50 customers (default), fixed catalog of SKUs
//! cargo run -p fulfillment-db --bin seed
//!
//! # Custom customer count and database path
//! cargo run -p fulfillment-db --bin seed -- --customers 200 --db ./data/fulfillment.db
//! ```
//!
//! ## Generated Data
//! - Customers `cust-1` .. `cust-N`; every tenth one is banned
//! - One inventory row per catalog SKU, stock between 0 and 40
//!
//! Rows are upserted, so re-running resets stock levels instead of
//! duplicating anything.

use std::env;

use fulfillment_core::{Customer, CustomerStatus, InventoryRecord};
use fulfillment_db::{Database, DbConfig};

/// Demo catalog: (sku, display name)
const CATALOG: &[(&str, &str)] = &[
    ("WIDGET-01", "Standard widget"),
    ("WIDGET-02", "Deluxe widget"),
    ("GADGET-01", "Pocket gadget"),
    ("GADGET-02", "Desk gadget"),
    ("CABLE-USB-C", "USB-C cable 1m"),
    ("CABLE-HDMI", "HDMI cable 2m"),
    ("MUG-BLUE", "Blue mug"),
    ("MUG-RED", "Red mug"),
    ("SHIRT-M", "T-shirt, medium"),
    ("SHIRT-L", "T-shirt, large"),
    ("BOOK-RUST", "Systems programming handbook"),
    ("STICKER-PACK", "Sticker pack"),
];

const DEFAULT_CUSTOMERS: usize = 50;
const DEFAULT_DB_PATH: &str = "./fulfillment_dev.db";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut customers = DEFAULT_CUSTOMERS;
    let mut db_path = String::from(DEFAULT_DB_PATH);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--customers" | "-c" => {
                if i + 1 < args.len() {
                    customers = args[i + 1].parse().unwrap_or(DEFAULT_CUSTOMERS);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Fulfillment Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --customers <N>  Number of customers (default: {})", DEFAULT_CUSTOMERS);
                println!("  -d, --db <PATH>      Database file path (default: {})", DEFAULT_DB_PATH);
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    println!("Fulfillment Seed Data Generator");
    println!("===============================");
    println!("Database:  {}", db_path);
    println!("Customers: {}", customers);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database, migrations applied");

    let start = std::time::Instant::now();

    let mut banned = 0;
    for n in 1..=customers {
        let customer = demo_customer(n);
        if customer.is_banned() {
            banned += 1;
        }
        if let Err(e) = db.customers().upsert(&customer).await {
            eprintln!("Failed to upsert {}: {}", customer.id, e);
        }
    }
    println!("✓ {} customers ({} banned)", customers, banned);

    for (idx, (sku, name)) in CATALOG.iter().enumerate() {
        let record = InventoryRecord::new(*sku, demo_stock(idx));
        if let Err(e) = db.inventory().upsert(&record).await {
            eprintln!("Failed to stock {} ({}): {}", sku, name, e);
            continue;
        }
        println!("  {:<14} {:>3}  {}", sku, record.quantity, name);
    }

    println!();
    println!(
        "✓ Seeded {} customers and {} SKUs in {:?}",
        db.customers().count().await?,
        db.inventory().count().await?,
        start.elapsed()
    );

    db.close().await;
    Ok(())
}

/// Customer number `n`; every tenth customer is banned.
fn demo_customer(n: usize) -> Customer {
    let status = if n % 10 == 0 {
        CustomerStatus::Banned
    } else {
        CustomerStatus::Active
    };

    Customer {
        id: format!("cust-{}", n),
        name: Some(format!("Demo Customer {}", n)),
        status,
    }
}

/// Deterministic stock level in 0..=40. The first SKU is sold out.
fn demo_stock(idx: usize) -> i64 {
    ((idx * 13) % 41) as i64
}
