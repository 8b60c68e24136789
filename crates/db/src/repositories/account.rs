//! Account repository for chart of accounts database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use neraca_core::ledger::{Account, AccountType};
use neraca_shared::AppError;
use neraca_shared::types::AccountId;

use crate::entities::{accounts, journal_lines};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account code already exists.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Cannot change account type because journal lines reference the account.
    #[error("Cannot change account type: account has {0} journal lines")]
    HasJournalLines(u64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::DuplicateCode(_) | AccountError::HasJournalLines(_) => {
                Self::BusinessRule(err.to_string())
            }
            AccountError::AccountNotFound(_) => Self::NotFound(err.to_string()),
            AccountError::Database(_) => Self::Database(err.to_string()),
        }
    }
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account code (must be unique).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
}

/// Input for updating an account. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// New code.
    pub code: Option<String>,
    /// New name.
    pub name: Option<String>,
    /// New type; refused once journal lines reference the account.
    pub account_type: Option<AccountType>,
    /// Activate or deactivate.
    pub is_active: Option<bool>,
}

/// Repository for chart of accounts operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new active account.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCode` if the code is taken, or a database error.
    pub async fn create_account(&self, input: CreateAccountInput) -> Result<Account, AccountError> {
        if self.find_by_code(&input.code).await?.is_some() {
            return Err(AccountError::DuplicateCode(input.code));
        }

        let now = chrono::Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(Uuid::now_v7()),
            code: Set(input.code),
            name: Set(input.name),
            account_type: Set(input.account_type.into()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let account = account.insert(&self.db).await?;
        Ok(account.into())
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountError> {
        let account = accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?;
        Ok(account.map(Account::from))
    }

    /// Finds an account by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<Account>, AccountError> {
        let account = accounts::Entity::find()
            .filter(accounts::Column::Code.eq(code))
            .one(&self.db)
            .await?;
        Ok(account.map(Account::from))
    }

    /// Updates an account.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound`, `DuplicateCode`, `HasJournalLines` when the
    /// type changes after lines reference the account, or a database error.
    pub async fn update_account(
        &self,
        id: AccountId,
        input: UpdateAccountInput,
    ) -> Result<Account, AccountError> {
        let account = accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(AccountError::AccountNotFound(id))?;

        if let Some(new_type) = input.account_type
            && new_type != AccountType::from(account.account_type)
        {
            let line_count = self.count_journal_lines(id).await?;
            if line_count > 0 {
                return Err(AccountError::HasJournalLines(line_count));
            }
        }

        if let Some(new_code) = &input.code
            && *new_code != account.code
        {
            let existing = accounts::Entity::find()
                .filter(accounts::Column::Code.eq(new_code))
                .filter(accounts::Column::Id.ne(id.into_inner()))
                .one(&self.db)
                .await?;

            if existing.is_some() {
                return Err(AccountError::DuplicateCode(new_code.clone()));
            }
        }

        let now = chrono::Utc::now().into();
        let mut active: accounts::ActiveModel = account.into();

        if let Some(code) = input.code {
            active.code = Set(code);
        }
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(account_type) = input.account_type {
            active.account_type = Set(account_type.into());
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(now);

        let account = active.update(&self.db).await?;
        Ok(account.into())
    }

    /// Counts journal lines of any status referencing the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_journal_lines(&self, id: AccountId) -> Result<u64, AccountError> {
        let count = journal_lines::Entity::find()
            .filter(journal_lines::Column::AccountId.eq(id.into_inner()))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}
