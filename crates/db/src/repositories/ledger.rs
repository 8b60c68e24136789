//! PostgreSQL-backed ledger store.
//!
//! Reports read accounts and posted lines through [`SeaOrmLedgerStore`].
//! Lines come back ordered by entry date, entry sequence, then line number.

use std::collections::BTreeSet;
use std::ops::Bound;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect,
};
use tracing::error;
use uuid::Uuid;

use neraca_core::ledger::{Account, AccountFilter, LedgerStore, LineFilter, PostedLine, StoreError};
use neraca_core::period::DateRange;
use neraca_shared::types::{AccountId, JournalEntryId, JournalLineId};

use crate::entities::{
    accounts, journal_entries, journal_lines,
    sea_orm_active_enums::{AccountType, EntryStatus},
};

/// Classifies a database error for the ledger store seam.
///
/// Connection failures are `Unavailable`; everything else is a `Query` failure.
pub fn store_error(err: DbErr) -> StoreError {
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => StoreError::Unavailable(err.to_string()),
        _ => StoreError::Query(err.to_string()),
    }
}

fn failed(operation: &'static str) -> impl Fn(DbErr) -> StoreError {
    move |err| {
        error!(operation, error = %err, "Ledger store query failed");
        store_error(err)
    }
}

/// Restricts `journal_entries.entry_date` to a date range.
fn date_condition(range: &DateRange) -> Condition {
    let column = journal_entries::Column::EntryDate;
    let condition = match range.start() {
        Bound::Included(date) => Condition::all().add(column.gte(date)),
        Bound::Excluded(date) => Condition::all().add(column.gt(date)),
        Bound::Unbounded => Condition::all(),
    };
    match range.end() {
        Bound::Included(date) => condition.add(column.lte(date)),
        Bound::Excluded(date) => condition.add(column.lt(date)),
        Bound::Unbounded => condition,
    }
}

/// A journal line joined with its entry header.
#[derive(Debug, FromQueryResult)]
struct PostedLineRow {
    id: Uuid,
    entry_id: Uuid,
    account_id: Uuid,
    debit: Decimal,
    credit: Decimal,
    description: Option<String>,
    entry_date: NaiveDate,
    reference: String,
    entry_description: String,
}

impl From<PostedLineRow> for PostedLine {
    fn from(row: PostedLineRow) -> Self {
        Self {
            line_id: JournalLineId::from_uuid(row.id),
            entry_id: JournalEntryId::from_uuid(row.entry_id),
            account_id: AccountId::from_uuid(row.account_id),
            entry_date: row.entry_date,
            reference: row.reference,
            entry_description: row.entry_description,
            line_description: row.description,
            debit: row.debit,
            credit: row.credit,
        }
    }
}

/// Ledger store over the `accounts`, `journal_entries` and `journal_lines` tables.
#[derive(Debug, Clone)]
pub struct SeaOrmLedgerStore {
    db: DatabaseConnection,
}

impl SeaOrmLedgerStore {
    /// Creates a new store.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LedgerStore for SeaOrmLedgerStore {
    async fn list_accounts(&self, filter: &AccountFilter) -> Result<Vec<Account>, StoreError> {
        let mut query = accounts::Entity::find();

        if filter.active_only {
            query = query.filter(accounts::Column::IsActive.eq(true));
        }
        if let Some(types) = &filter.types {
            if types.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(
                accounts::Column::AccountType.is_in(types.iter().copied().map(AccountType::from)),
            );
        }

        let models = query
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await
            .map_err(failed("list_accounts"))?;

        Ok(models.into_iter().map(Account::from).collect())
    }

    async fn list_posted_lines(&self, filter: &LineFilter) -> Result<Vec<PostedLine>, StoreError> {
        if filter.account_ids.as_ref().is_some_and(BTreeSet::is_empty) {
            return Ok(Vec::new());
        }

        let mut query = journal_lines::Entity::find()
            .select_only()
            .columns([
                journal_lines::Column::Id,
                journal_lines::Column::EntryId,
                journal_lines::Column::AccountId,
                journal_lines::Column::Debit,
                journal_lines::Column::Credit,
                journal_lines::Column::Description,
            ])
            .column(journal_entries::Column::EntryDate)
            .column(journal_entries::Column::Reference)
            .column_as(journal_entries::Column::Description, "entry_description")
            .inner_join(journal_entries::Entity)
            .filter(journal_entries::Column::Status.eq(EntryStatus::Posted))
            .filter(date_condition(&filter.range));

        if let Some(account_id) = filter.account_id {
            query = query.filter(journal_lines::Column::AccountId.eq(account_id.into_inner()));
        }
        if let Some(account_ids) = &filter.account_ids {
            query = query.filter(
                journal_lines::Column::AccountId
                    .is_in(account_ids.iter().copied().map(AccountId::into_inner)),
            );
        }

        let rows = query
            .order_by_asc(journal_entries::Column::EntryDate)
            .order_by_asc(journal_entries::Column::Sequence)
            .order_by_asc(journal_lines::Column::LineNumber)
            .into_model::<PostedLineRow>()
            .all(&self.db)
            .await
            .map_err(failed("list_posted_lines"))?;

        Ok(rows.into_iter().map(PostedLine::from).collect())
    }

    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let model = accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(failed("get_account"))?;

        Ok(model.map(Account::from))
    }
}
