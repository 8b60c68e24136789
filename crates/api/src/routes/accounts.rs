//! Account balance and ledger routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use neraca_core::ledger::{AccountType, Movement, NormalSide};
use neraca_core::period::parse_optional_date;
use neraca_core::reports::AccountBalance;
use neraca_shared::AppError;
use neraca_shared::types::{AccountId, PageRequest, PageResponse};

use crate::{AppState, error::ApiError, routes::reports::parse_account_id};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts/{account_id}/balance", get(get_account_balance))
        .route("/accounts/{account_id}/ledger", get(get_account_ledger))
}

/// Query parameters for an account balance. Both bounds are optional.
#[derive(Debug, Default, Deserialize)]
pub struct BalanceQuery {
    /// Start date (inclusive).
    pub from: Option<String>,
    /// End date (inclusive).
    pub to: Option<String>,
}

/// Query parameters for an account ledger.
#[derive(Debug, Default, Deserialize)]
pub struct AccountLedgerQuery {
    /// Start date.
    pub from: Option<String>,
    /// End date.
    pub to: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<String>,
    /// Movements per page.
    pub per_page: Option<String>,
}

/// One page of an account ledger. Balances and totals always cover the
/// whole period, not just the page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountLedgerResponse {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Normal side used for running balances.
    pub normal_side: NormalSide,
    /// Period start.
    pub start_date: Option<NaiveDate>,
    /// Period end.
    pub end_date: Option<NaiveDate>,
    /// Balance before the period.
    pub beginning_balance: Decimal,
    /// Sum of debits in the period.
    pub total_debit: Decimal,
    /// Sum of credits in the period.
    pub total_credit: Decimal,
    /// Balance after the period.
    pub ending_balance: Decimal,
    /// The requested page of movements.
    pub movements: PageResponse<Movement>,
}

fn require_account_id(raw: &str) -> Result<AccountId, ApiError> {
    parse_account_id(Some(raw))?.ok_or_else(|| {
        ApiError::from(AppError::Validation("Account id is required".to_string()))
    })
}

/// Parses an optional positive integer query parameter.
fn parse_page_param(name: &str, raw: Option<&str>) -> Result<Option<u32>, ApiError> {
    raw.map(|value| {
        value.trim().parse::<u32>().map_err(|_| {
            ApiError::from(AppError::Validation(format!(
                "{name} must be a positive integer, got {value:?}"
            )))
        })
    })
    .transpose()
}

async fn get_account_balance(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<AccountBalance>, ApiError> {
    let account_id = require_account_id(&account_id)?;
    let from = parse_optional_date(query.from.as_deref())?;
    let to = parse_optional_date(query.to.as_deref())?;
    Ok(Json(
        state.reports.account_balance(account_id, from, to).await?,
    ))
}

async fn get_account_ledger(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Query(query): Query<AccountLedgerQuery>,
) -> Result<Json<AccountLedgerResponse>, ApiError> {
    let account_id = require_account_id(&account_id)?;
    let from = parse_optional_date(query.from.as_deref())?;
    let to = parse_optional_date(query.to.as_deref())?;
    let page = PageRequest::new(
        parse_page_param("page", query.page.as_deref())?,
        parse_page_param("per_page", query.per_page.as_deref())?,
    );

    let ledger = state
        .reports
        .ledger_movements(account_id, from, to)
        .await?;

    Ok(Json(AccountLedgerResponse {
        account_id: ledger.account_id,
        code: ledger.code,
        name: ledger.name,
        account_type: ledger.account_type,
        normal_side: ledger.normal_side,
        start_date: ledger.start_date,
        end_date: ledger.end_date,
        beginning_balance: ledger.beginning_balance,
        total_debit: ledger.total_debit,
        total_credit: ledger.total_credit,
        ending_balance: ledger.ending_balance,
        movements: PageResponse::paginate(ledger.movements, page),
    }))
}
