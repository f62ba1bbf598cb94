//! # Seed Data
//!
//! Loads the starter menu into an empty database.
//!
//! ## Usage
//! ```bash
//! # Seed ./vapor.db (or $VAPOR_DATABASE_PATH)
//! cargo run -p vapor-db --bin vapor-seed
//!
//! # Specify database path
//! cargo run -p vapor-db --bin vapor-seed -- --db ./data/vapor.db
//! ```
//!
//! Does nothing when the products table already has rows, so it is safe to
//! run on every deploy.

use std::env;
use uuid::Uuid;
use vapor_core::{Category, Money, Product};
use vapor_db::{Database, DbConfig};

/// The counter's starter menu: (name, category, price in rupees).
const MENU: &[(&str, Category, i64)] = &[
    ("Masala Tea", Category::Tea, 15),
    ("Ginger Tea", Category::Tea, 15),
    ("Filter Coffee", Category::Drinks, 20),
    ("Samosa", Category::Snacks, 15),
    ("Vada Pav", Category::Snacks, 20),
    ("Poha", Category::Snacks, 30),
    ("Veg Thali", Category::Meals, 100),
    ("Chicken Thali", Category::Meals, 150),
    ("Cold Drink", Category::Drinks, 40),
    ("Mineral Water", Category::Drinks, 20),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path =
        env::var("VAPOR_DATABASE_PATH").unwrap_or_else(|_| String::from("./vapor.db"));

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Vapor POS Seed Data");
                println!();
                println!("Usage: vapor-seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./vapor.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Vapor POS Seed Data");
    println!("======================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        db.close().await;
        return Ok(());
    }

    println!();
    println!("Creating products...");

    for (name, category, price) in MENU {
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            category: *category,
            price: Money::from_major(*price),
            is_available: true,
        };

        db.products().insert(&product).await?;
        println!("  {:<14} {:<7} {}  ({})", product.name, product.category, product.price, product.id);
    }

    let available = db.products().list_available().await?;
    println!();
    println!("✓ Seed complete! {} products on the menu", available.len());

    db.close().await;
    Ok(())
}
