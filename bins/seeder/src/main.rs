//! Demo ledger seeder for Neraca development.
//!
//! Seeds a small chart of accounts and one month of balanced, posted
//! entries, then prints the resulting trial balance.
//!
//! Usage: cargo run --bin seeder

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use neraca_core::ledger::{AccountType, NewJournalEntry, NewJournalLine};
use neraca_core::reports::ReportService;
use neraca_db::repositories::CreateAccountInput;
use neraca_db::{AccountRepository, JournalRepository, SeaOrmLedgerStore};
use neraca_shared::types::{AccountId, format_amount};
use neraca_shared::{AppConfig, ReportingConfig};

const CHART: [(&str, &str, AccountType); 9] = [
    ("1100", "Cash", AccountType::Asset),
    ("1200", "Equipment", AccountType::Asset),
    ("2100", "Accounts Payable", AccountType::Liability),
    ("2200", "Bank Loan", AccountType::Liability),
    ("3100", "Share Capital", AccountType::Equity),
    ("3200", "Retained Earnings", AccountType::Equity),
    ("4000", "Sales", AccountType::Revenue),
    ("5000", "Cost of Goods Sold", AccountType::CostOfSales),
    ("6000", "Operating Expenses", AccountType::Expense),
];

/// (day of January 2024, reference, description, debit code, credit code, amount)
const ENTRIES: [(u32, &str, &str, &str, &str, Decimal); 6] = [
    (2, "SEED-001", "Owner investment", "1100", "3100", dec!(10000.00)),
    (3, "SEED-002", "Bank loan drawdown", "1100", "2200", dec!(5000.00)),
    (5, "SEED-003", "Equipment purchase", "1200", "1100", dec!(4000.00)),
    (10, "SEED-004", "Cash sales", "1100", "4000", dec!(3000.00)),
    (10, "SEED-005", "Cost of goods sold", "5000", "1100", dec!(1200.00)),
    (20, "SEED-006", "Rent invoice", "6000", "2100", dec!(800.00)),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            AppConfig::load()
                .context("DATABASE_URL or NERACA__DATABASE__URL must be set")?
                .database
                .url
        }
    };

    println!("Connecting to database...");
    let db = neraca_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    println!("Seeding chart of accounts...");
    let accounts = AccountRepository::new(db.clone());
    let (ids, created) = seed_accounts(&accounts).await?;

    if created {
        println!("Seeding journal entries...");
        seed_entries(&JournalRepository::new(db.clone()), &ids).await?;
    } else {
        println!("  Chart already present, skipping journal entries...");
    }

    let reports = ReportService::new(
        Arc::new(SeaOrmLedgerStore::new(db)),
        &ReportingConfig::default(),
    );
    let trial_balance = reports.trial_balance(Some(date(31)?)).await?;

    println!("Trial balance as of {}:", trial_balance.as_of_date);
    for line in &trial_balance.accounts {
        println!(
            "  {:<6} {:<24} {:>12} {:>12}",
            line.code,
            line.name,
            format_amount(line.debit),
            format_amount(line.credit)
        );
    }
    println!(
        "  {:<31} {:>12} {:>12}",
        "Total",
        format_amount(trial_balance.total_debit),
        format_amount(trial_balance.total_credit)
    );

    println!("Seeding complete!");
    Ok(())
}

fn date(day: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 1, day).with_context(|| format!("invalid day {day}"))
}

/// Creates missing accounts. Returns every account ID by code and whether
/// any account was new.
async fn seed_accounts(
    accounts: &AccountRepository,
) -> anyhow::Result<(HashMap<&'static str, AccountId>, bool)> {
    let mut ids = HashMap::new();
    let mut created = false;

    for (code, name, account_type) in CHART {
        let account = match accounts.find_by_code(code).await? {
            Some(account) => account,
            None => {
                created = true;
                println!("  {code} {name}");
                accounts
                    .create_account(CreateAccountInput {
                        code: code.to_string(),
                        name: name.to_string(),
                        account_type,
                    })
                    .await?
            }
        };
        ids.insert(code, account.id);
    }

    Ok((ids, created))
}

async fn seed_entries(
    journal: &JournalRepository,
    ids: &HashMap<&'static str, AccountId>,
) -> anyhow::Result<()> {
    let account = |code: &str| {
        ids.get(code)
            .copied()
            .with_context(|| format!("account {code} was not seeded"))
    };

    for (day, reference, description, debit, credit, amount) in ENTRIES {
        let entry = NewJournalEntry::new(date(day)?, reference, description)
            .line(NewJournalLine::debit(account(debit)?, amount))
            .line(NewJournalLine::credit(account(credit)?, amount))
            .posted_by("seeder");
        journal.post_entry(entry).await?;
        println!("  {reference} {description}: {}", format_amount(amount));
    }

    Ok(())
}
