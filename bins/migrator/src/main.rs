//! Database migration runner for Neraca.
//!
//! Reads `DATABASE_URL` (or `-u <url>`).
//!
//! Usage:
//!   migrator up      - Create the ledger schema
//!   migrator down    - Drop the ledger schema
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop everything and re-run migrations

use neraca_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // The CLI installs its own tracing subscriber.
    cli::run_cli(Migrator).await;
}
