//! Integration tests for the PostgreSQL ledger store and its triggers.
//!
//! Each test starts a throwaway Postgres container, so they are ignored by
//! default. Run with `cargo test -p neraca-db -- --ignored` (needs Docker).

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait, TransactionTrait,
};
use testcontainers_modules::postgres::Postgres;
use testcontainers_modules::testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use uuid::Uuid;

use neraca_core::ledger::{
    AccountFilter, AccountType, EntryStatus, LedgerError, LedgerStore, LineFilter,
    NewJournalEntry, NewJournalLine,
};
use neraca_core::period::DateRange;
use neraca_core::reports::ReportService;
use neraca_db::entities::{journal_entries, journal_lines, sea_orm_active_enums};
use neraca_db::migration::{Migrator, MigratorTrait};
use neraca_db::repositories::{
    AccountError, AccountRepository, CreateAccountInput, JournalError, JournalRepository,
    UpdateAccountInput,
};
use neraca_db::SeaOrmLedgerStore;
use neraca_shared::ReportingConfig;
use neraca_shared::types::AccountId;

struct TestDb {
    _container: ContainerAsync<Postgres>,
    db: DatabaseConnection,
}

async fn start_database() -> TestDb {
    let container = Postgres::default()
        .with_tag("16-alpine")
        .start()
        .await
        .expect("postgres container should start");
    let host = container.get_host().await.expect("container host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("container port");

    let url = format!("postgres://postgres:postgres@{host}:{port}/postgres");
    let db = neraca_db::connect(&url).await.expect("database connection");
    Migrator::up(&db, None).await.expect("migrations should apply");

    TestDb {
        _container: container,
        db,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

struct Chart {
    cash: AccountId,
    capital: AccountId,
    revenue: AccountId,
}

async fn create(
    accounts: &AccountRepository,
    code: &str,
    name: &str,
    account_type: AccountType,
) -> AccountId {
    accounts
        .create_account(CreateAccountInput {
            code: code.into(),
            name: name.into(),
            account_type,
        })
        .await
        .unwrap()
        .id
}

async fn seed_chart(db: &DatabaseConnection) -> Chart {
    let accounts = AccountRepository::new(db.clone());
    Chart {
        cash: create(&accounts, "1100", "Cash", AccountType::Asset).await,
        capital: create(&accounts, "3100", "Share Capital", AccountType::Equity).await,
        revenue: create(&accounts, "4000", "Sales", AccountType::Revenue).await,
    }
}

fn entry(
    day: u32,
    reference: &str,
    debit: AccountId,
    credit: AccountId,
    amount: Decimal,
) -> NewJournalEntry {
    NewJournalEntry::new(date(2024, 1, day), reference, format!("Entry {reference}"))
        .line(NewJournalLine::debit(debit, amount))
        .line(NewJournalLine::credit(credit, amount))
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_posted_lines_are_filtered_and_ordered() {
    let test_db = start_database().await;
    let chart = seed_chart(&test_db.db).await;
    let journal = JournalRepository::new(test_db.db.clone());
    let store = SeaOrmLedgerStore::new(test_db.db.clone());

    journal
        .post_entry(entry(5, "JE-2", chart.cash, chart.revenue, dec!(300)))
        .await
        .unwrap();
    journal
        .post_entry(entry(1, "JE-1", chart.cash, chart.capital, dec!(1000)))
        .await
        .unwrap();
    journal
        .post_entry(entry(5, "JE-3", chart.cash, chart.revenue, dec!(50)))
        .await
        .unwrap();
    journal
        .record_entry(
            entry(6, "DRAFT", chart.cash, chart.revenue, dec!(999)),
            EntryStatus::Draft,
        )
        .await
        .unwrap();

    let lines = store
        .list_posted_lines(&LineFilter::for_account(chart.cash, DateRange::all()))
        .await
        .unwrap();
    let references: Vec<&str> = lines.iter().map(|line| line.reference.as_str()).collect();
    assert_eq!(references, ["JE-1", "JE-2", "JE-3"]);

    let before_fifth = store
        .list_posted_lines(&LineFilter::all(DateRange::before(date(2024, 1, 5))))
        .await
        .unwrap();
    assert_eq!(before_fifth.len(), 2);
    assert!(before_fifth.iter().all(|line| line.reference == "JE-1"));

    let none = store
        .list_posted_lines(&LineFilter::for_accounts(Vec::<AccountId>::new(), DateRange::all()))
        .await
        .unwrap();
    assert!(none.is_empty());

    let accounts = store
        .list_accounts(
            &AccountFilter::active().with_types([AccountType::Asset, AccountType::Revenue]),
        )
        .await
        .unwrap();
    let codes: Vec<&str> = accounts.iter().map(|account| account.code.as_str()).collect();
    assert_eq!(codes, ["1100", "4000"]);

    assert!(store.get_account(AccountId::new()).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_reports_over_postgres_store() {
    let test_db = start_database().await;
    let chart = seed_chart(&test_db.db).await;
    let journal = JournalRepository::new(test_db.db.clone());

    journal
        .post_entry(entry(1, "JE-1", chart.cash, chart.capital, dec!(1000)))
        .await
        .unwrap();
    journal
        .post_entry(entry(10, "JE-2", chart.cash, chart.revenue, dec!(250.50)))
        .await
        .unwrap();

    let store = Arc::new(SeaOrmLedgerStore::new(test_db.db.clone()));
    let service = ReportService::new(store, &ReportingConfig::default());

    let trial_balance = service.trial_balance(Some(date(2024, 1, 31))).await.unwrap();
    assert!(trial_balance.is_balanced);
    assert_eq!(trial_balance.total_debit, dec!(1250.50));

    let ledger = service
        .ledger_movements(chart.cash, Some(date(2024, 1, 5)), Some(date(2024, 1, 31)))
        .await
        .unwrap();
    assert_eq!(ledger.beginning_balance, dec!(1000));
    assert_eq!(ledger.movements.len(), 1);
    assert_eq!(ledger.ending_balance, dec!(1250.50));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_void_removes_entry_from_balances() {
    let test_db = start_database().await;
    let chart = seed_chart(&test_db.db).await;
    let journal = JournalRepository::new(test_db.db.clone());
    let store = SeaOrmLedgerStore::new(test_db.db.clone());

    let posted = journal
        .post_entry(entry(1, "JE-1", chart.cash, chart.capital, dec!(1000)))
        .await
        .unwrap();
    let voided = journal.void_entry(posted.id).await.unwrap();
    assert_eq!(voided.status, EntryStatus::Voided);

    let lines = store
        .list_posted_lines(&LineFilter::all(DateRange::all()))
        .await
        .unwrap();
    assert!(lines.is_empty());

    let again = journal.void_entry(posted.id).await;
    assert!(matches!(
        again,
        Err(JournalError::Ledger(LedgerError::InvalidStatusTransition { .. }))
    ));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_unbalanced_entry_rejected_before_write() {
    let test_db = start_database().await;
    let chart = seed_chart(&test_db.db).await;
    let journal = JournalRepository::new(test_db.db.clone());

    let unbalanced = NewJournalEntry::new(date(2024, 1, 2), "BAD", "Unbalanced")
        .line(NewJournalLine::debit(chart.cash, dec!(100)))
        .line(NewJournalLine::credit(chart.revenue, dec!(90)));
    let result = journal.post_entry(unbalanced).await;
    assert!(matches!(
        result,
        Err(JournalError::Ledger(LedgerError::Unbalanced { .. }))
    ));

    let count = journal_entries::Entity::find().all(&test_db.db).await.unwrap().len();
    assert_eq!(count, 0);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_trigger_rejects_unbalanced_posting() {
    let test_db = start_database().await;
    let chart = seed_chart(&test_db.db).await;

    let txn = test_db.db.begin().await.unwrap();
    let entry_id = Uuid::new_v4();
    let header = journal_entries::ActiveModel {
        id: Set(entry_id),
        entry_date: Set(date(2024, 1, 3)),
        reference: Set("RAW".into()),
        description: Set("Bypasses validation".into()),
        status: Set(sea_orm_active_enums::EntryStatus::Draft),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .unwrap();

    for (line_number, (account, debit, credit)) in (1_i32..).zip([
        (chart.cash, dec!(100), dec!(0)),
        (chart.revenue, dec!(0), dec!(60)),
    ]) {
        journal_lines::ActiveModel {
            id: Set(Uuid::new_v4()),
            entry_id: Set(entry_id),
            line_number: Set(line_number),
            account_id: Set(account.into_inner()),
            debit: Set(debit),
            credit: Set(credit),
            description: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .unwrap();
    }

    let mut active: journal_entries::ActiveModel = header.into();
    active.status = Set(sea_orm_active_enums::EntryStatus::Posted);
    active.update(&txn).await.unwrap();

    let commit = txn.commit().await;
    assert!(commit.is_err(), "deferred balance trigger should reject commit");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_posted_entry_is_immutable() {
    let test_db = start_database().await;
    let chart = seed_chart(&test_db.db).await;
    let journal = JournalRepository::new(test_db.db.clone());

    let posted = journal
        .post_entry(entry(1, "JE-1", chart.cash, chart.capital, dec!(1000)))
        .await
        .unwrap();

    let model = journal_entries::Entity::find_by_id(posted.id.into_inner())
        .one(&test_db.db)
        .await
        .unwrap()
        .unwrap();
    let mut active: journal_entries::ActiveModel = model.into();
    active.reference = Set("EDITED".into());
    assert!(active.update(&test_db.db).await.is_err());

    let (_, lines) = journal.find_entry(posted.id).await.unwrap().unwrap();
    let line = journal_lines::Entity::find_by_id(lines[0].id.into_inner())
        .one(&test_db.db)
        .await
        .unwrap()
        .unwrap();
    let mut line: journal_lines::ActiveModel = line.into();
    line.debit = Set(dec!(1));
    assert!(line.update(&test_db.db).await.is_err());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_account_type_locked_once_used() {
    let test_db = start_database().await;
    let chart = seed_chart(&test_db.db).await;
    let accounts = AccountRepository::new(test_db.db.clone());
    let journal = JournalRepository::new(test_db.db.clone());

    let renamed = accounts
        .update_account(
            chart.revenue,
            UpdateAccountInput {
                account_type: Some(AccountType::CostOfSales),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.account_type, AccountType::CostOfSales);

    journal
        .post_entry(entry(1, "JE-1", chart.cash, chart.capital, dec!(1000)))
        .await
        .unwrap();
    let locked = accounts
        .update_account(
            chart.cash,
            UpdateAccountInput {
                account_type: Some(AccountType::Expense),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(locked, Err(AccountError::HasJournalLines(1))));

    let duplicate = accounts
        .create_account(CreateAccountInput {
            code: "1100".into(),
            name: "Petty Cash".into(),
            account_type: AccountType::Asset,
        })
        .await;
    assert!(matches!(duplicate, Err(AccountError::DuplicateCode(code)) if code == "1100"));

    accounts
        .update_account(
            chart.capital,
            UpdateAccountInput {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let inactive = journal
        .post_entry(entry(2, "JE-2", chart.cash, chart.capital, dec!(5)))
        .await;
    assert!(matches!(
        inactive,
        Err(JournalError::Ledger(LedgerError::AccountInactive(id))) if id == chart.capital
    ));
}
