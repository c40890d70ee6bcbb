//! # Seed Data Generator
//!
//! Populates the database with sample room types and nightly inventory for
//! development.
//!
//! ## Usage
//! ```bash
//! # 30 nights from today (default)
//! cargo run -p roomledger-db --bin seed
//!
//! # Custom horizon
//! cargo run -p roomledger-db --bin seed -- --nights 90
//!
//! # Specify database path
//! cargo run -p roomledger-db --bin seed -- --db ./data/roomledger.db
//! ```
//!
//! ## Generated Data
//! Two hotels with a handful of room types each. Every room type gets one
//! inventory row per night, from today, with a room count derived from its
//! position in the table.

use chrono::{Days, Utc};
use roomledger_core::{InventoryResetPolicy, NewRoomType};
use roomledger_db::{Database, DbConfig};
use std::env;

/// (hotel_id, name, capacity, nightly price in cents, rooms per night)
const ROOM_TYPES: &[(i64, &str, i64, i64, i64)] = &[
    (1, "Standard Queen", 2, 8_900, 12),
    (1, "Deluxe King", 2, 12_900, 8),
    (1, "Family Suite", 4, 19_900, 4),
    (1, "Penthouse", 6, 54_900, 1),
    (2, "Single", 1, 5_500, 20),
    (2, "Twin", 2, 7_900, 15),
    (2, "Dormitory Bed", 1, 2_500, 30),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut nights: u64 = 30;
    let mut db_path = String::from("./roomledger_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--nights" | "-n" => {
                if i + 1 < args.len() {
                    nights = args[i + 1].parse().unwrap_or(30);
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
                println!("RoomLedger Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --nights <N>   Nights of inventory from today (default: 30)");
                println!("  -d, --db <PATH>    Database file path (default: ./roomledger_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 RoomLedger Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!("Nights:   {}", nights);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.room_types().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} room types", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let today = Utc::now().date_naive();
    let start = std::time::Instant::now();
    let mut rows = 0usize;

    for (hotel_id, name, capacity, price_cents, rooms) in ROOM_TYPES.iter().copied() {
        let room_type = db
            .room_types()
            .insert(&NewRoomType {
                hotel_id,
                name: name.to_string(),
                capacity,
                base_price_cents: price_cents,
                description: None,
            })
            .await?;

        for offset in 0..nights {
            let Some(date) = today.checked_add_days(Days::new(offset)) else {
                break;
            };
            db.inventory()
                .set_inventory(room_type.id, date, rooms, InventoryResetPolicy::ResetBooked)
                .await?;
            rows += 1;
        }

        println!("  {} (hotel {}): {} rooms × {} nights", name, hotel_id, rooms, nights);
    }

    println!();
    println!("✓ Seeded {} room types, {} inventory rows in {:?}", ROOM_TYPES.len(), rows, start.elapsed());

    let sample = db.room_types().list_by_hotel(1).await?;
    println!("  Hotel 1 room types: {}", sample.len());

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
