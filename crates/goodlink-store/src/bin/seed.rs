//! # Seed Data Generator
//!
//! Writes the sample inventory into a database file for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./goodlink.db (default)
//! cargo run -p goodlink-store --bin seed
//!
//! # Specify database path
//! cargo run -p goodlink-store --bin seed -- --db ./data/goodlink.db
//! ```
//!
//! An already-populated store is left untouched.

use chrono::Utc;
use goodlink_store::{DbConfig, Storage};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let db_path = args
        .iter()
        .position(|a| a == "--db")
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
        .unwrap_or("./goodlink.db");

    println!("Seeding inventory store at {}", db_path);

    let storage = Storage::open(DbConfig::new(db_path)).await?;
    let seeded = storage.inventory().seed_if_empty(Utc::now()).await?;

    if seeded {
        println!("Wrote sample records:");
    } else {
        println!("Store already has records, nothing written:");
    }

    for record in storage.inventory().get().await? {
        println!(
            "  {:<8} {:<10} qty={:<4} {}",
            record.sku, record.marketplace, record.quantity, record.status
        );
    }

    storage.close().await;
    Ok(())
}
