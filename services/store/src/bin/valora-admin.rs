//! Operator tasks against the store database.
//!
//! # Usage
//!
//! ```bash
//! valora-admin create-admin --name "Store Owner" --email owner@valora.gold --password '...'
//! valora-admin seed-products --file products.json
//! valora-admin set-shipping --charge 99
//! ```
//!
//! Reads `DATABASE_URL` from the environment.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use sea_orm::Database;

use valora_core::tracing::{LogFormat, init_tracing};

use valora_store::handlers::product::CreateProductRequest;
use valora_store::infra::db::{DbProductRepository, DbSettingsRepository, DbUserRepository};
use valora_store::usecase::admin::{AdminProvision, CreateAdminUseCase};
use valora_store::usecase::product::{NewProduct, SeedProductsUseCase};
use valora_store::usecase::shipping::SetShippingChargeUseCase;

#[derive(Parser)]
#[command(about = "Valora Gold store administration")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an admin account, or promote an existing user with this email
    CreateAdmin {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create products from a JSON array, skipping slugs that already exist
    SeedProducts {
        #[arg(long)]
        file: PathBuf,
    },
    /// Set the flat shipping charge applied to new orders
    SetShipping {
        #[arg(long)]
        charge: Decimal,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(LogFormat::Text);
    let args = Args::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
    let db = Database::connect(&database_url)
        .await
        .context("connect to database")?;

    match args.command {
        Command::CreateAdmin {
            name,
            email,
            password,
        } => {
            let uc = CreateAdminUseCase {
                users: DbUserRepository { db },
            };
            match uc.execute(&name, &email, &password).await? {
                AdminProvision::Created(id) => println!("created admin {id}"),
                AdminProvision::Promoted(id) => println!("promoted user {id} to admin"),
                AdminProvision::AlreadyAdmin(id) => println!("user {id} is already an admin"),
            }
        }
        Command::SeedProducts { file } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("read {}", file.display()))?;
            let items: Vec<CreateProductRequest> = serde_json::from_str(&raw)
                .with_context(|| format!("parse {}", file.display()))?;
            let uc = SeedProductsUseCase {
                products: DbProductRepository { db },
            };
            let report = uc
                .execute(items.into_iter().map(NewProduct::from).collect())
                .await?;
            println!(
                "seeded {} product(s), skipped {} existing",
                report.created, report.skipped
            );
        }
        Command::SetShipping { charge } => {
            let uc = SetShippingChargeUseCase {
                settings: DbSettingsRepository { db },
            };
            let charge = uc.execute(charge).await?;
            println!("shipping charge set to {charge}");
        }
    }
    Ok(())
}
