//! # Seed Data Generator
//!
//! Populates a database with two resellers and a spread of purchases for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed ./cashback_dev.db (default)
//! cargo run -p cashback-service --bin seed
//!
//! # Specify database path
//! cargo run -p cashback-service --bin seed -- --db ./data/cashback.db
//! ```
//!
//! ## Generated Data
//! - `ana@example.com` / CPF 945.086.080-78: purchases in three months,
//!   one per cashback tier, left pending validation
//! - `vip@example.com` / CPF 153.509.460-56: purchases approved on admission
//!
//! Both accounts use the password `senha-forte`.

use std::env;
use std::path::PathBuf;

use chrono::NaiveDate;

use cashback_core::admission::PurchaseSubmission;
use cashback_core::registration::RegistrationRequest;
use cashback_core::{Identity, Money, RegistrationError};
use cashback_db::Database;
use cashback_service::{telemetry, CashbackService, ServiceConfig, ServiceError};

const PASSWORD: &str = "senha-forte";

/// (email, cpf, name)
const RESELLERS: &[(&str, &str, &str)] = &[
    ("ana@example.com", "945.086.080-78", "Ana Souza"),
    ("vip@example.com", "153.509.460-56", "Revendedor VIP"),
];

/// (code, cents, year, month, day): one month per tier
const PURCHASES: &[(i64, i64, i32, u32, u32)] = &[
    // 2021-08: R$ 850.00 → 10%
    (1001, 50_000, 2021, 8, 3),
    (1002, 35_000, 2021, 8, 20),
    // 2021-09: R$ 1,200.00 → 15%
    (1003, 70_000, 2021, 9, 1),
    (1004, 50_000, 2021, 9, 30),
    // 2021-10: R$ 1,650.00 → 20%
    (1005, 100_000, 2021, 10, 5),
    (1006, 65_000, 2021, 10, 31),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./cashback_dev.db");

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
                println!("Cashback Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./cashback_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    telemetry::init_tracing();

    println!("🌱 Cashback Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!();

    let config = ServiceConfig {
        database_path: PathBuf::from(&db_path),
        ..ServiceConfig::default()
    };

    let db = Database::new(config.db_config()).await?;
    let service = CashbackService::new(db, config.policy());

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Register resellers
    let mut identities = Vec::with_capacity(RESELLERS.len());
    for (email, cpf, name) in RESELLERS {
        let request = RegistrationRequest {
            email: email.to_string(),
            password: PASSWORD.to_string(),
            cpf: cpf.to_string(),
            name: name.to_string(),
        };

        match service.register_reseller(request).await {
            Ok(reseller) => {
                println!("  Registered {} ({})", email, reseller.cpf);
                identities.push(Identity::new(reseller.user_id));
            }
            Err(ServiceError::Registration(RegistrationError::DuplicateEmail { .. })) => {
                println!("⚠ {} is already registered", email);
                println!("  Skipping seed to avoid duplicates.");
                println!("  Delete the database file to regenerate.");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
    }

    // Same purchases for both resellers, offset codes for the second
    println!();
    println!("Admitting purchases...");

    for (idx, caller) in identities.iter().enumerate() {
        for (code, cents, year, month, day) in PURCHASES {
            let date = NaiveDate::from_ymd_opt(*year, *month, *day)
                .ok_or("invalid seed date")?;
            let submission = PurchaseSubmission {
                code: code + (idx as i64) * 1000,
                value: Money::from_cents(*cents),
                date,
                reseller_id: caller.user_id.clone(),
                status: None,
            };

            if let Err(e) = service.admit_purchase(submission, caller).await {
                eprintln!("Failed to admit purchase {}: {}", code, e);
            }
        }
    }

    // Show the resulting cashback
    for (caller, (email, _, _)) in identities.iter().zip(RESELLERS) {
        println!();
        println!("{}:", email);
        for view in service.list_all_purchases(caller).await? {
            println!(
                "  #{:<5} {}  {:>12}  {:>2}%  {:>10}  {}",
                view.purchase.code,
                view.purchase.date,
                view.purchase.value.to_string(),
                view.cashback_percent,
                view.cashback_value.to_string(),
                view.status_label
            );
        }
    }

    service.store().close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
