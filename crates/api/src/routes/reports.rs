//! Financial statement routes.
//!
//! Dates arrive as ISO `YYYY-MM-DD` strings and are parsed here, so a
//! malformed or inverted range is a 400 `INVALID_RANGE` JSON error.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;

use neraca_core::period::{parse_date_list, parse_optional_date, parse_period_list};
use neraca_core::reports::{
    BalanceSheetReport, CashFlowReport, ComparativeReport, ComparativeTrialBalance,
    GeneralLedgerReport, ProfitAndLossReport, ProfitAndLossVariance, ReportError,
    TrialBalanceReport,
};
use neraca_shared::AppError;
use neraca_shared::types::AccountId;

use crate::{AppState, error::ApiError};

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/trial-balance", get(get_trial_balance))
        .route("/reports/balance-sheet", get(get_balance_sheet))
        .route("/reports/profit-and-loss", get(get_profit_and_loss))
        .route(
            "/reports/profit-and-loss/variance",
            get(get_profit_and_loss_variance),
        )
        .route("/reports/cash-flow", get(get_cash_flow))
        .route("/reports/general-ledger", get(get_general_ledger))
        .route(
            "/reports/comparative/trial-balance",
            get(get_comparative_trial_balance),
        )
        .route(
            "/reports/comparative/balance-sheet",
            get(get_comparative_balance_sheet),
        )
        .route(
            "/reports/comparative/profit-and-loss",
            get(get_comparative_profit_and_loss),
        )
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Point-in-time query (`as_of` defaults to today).
#[derive(Debug, Default, Deserialize)]
pub struct AsOfQuery {
    /// As of date.
    pub as_of: Option<String>,
}

/// Period query (`from` defaults to the first day of `to`'s month, `to` to today).
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    /// Start date.
    pub from: Option<String>,
    /// End date.
    pub to: Option<String>,
}

/// Query parameters for the general ledger.
#[derive(Debug, Default, Deserialize)]
pub struct GeneralLedgerQuery {
    /// Start date.
    pub from: Option<String>,
    /// End date.
    pub to: Option<String>,
    /// Restrict to one account.
    pub account_id: Option<String>,
}

/// Comma-separated as-of dates.
#[derive(Debug, Default, Deserialize)]
pub struct ComparativeAsOfQuery {
    /// e.g. `2024-01-31,2024-02-29`.
    pub as_of: Option<String>,
}

/// Comma-separated periods.
#[derive(Debug, Default, Deserialize)]
pub struct ComparativePeriodsQuery {
    /// e.g. `2024-01-01..2024-01-31,2024-02-01..2024-02-29`.
    pub periods: Option<String>,
}

/// Query parameters for period-over-period variance.
#[derive(Debug, Default, Deserialize)]
pub struct VarianceQuery {
    /// Current period start.
    pub from: Option<String>,
    /// Current period end.
    pub to: Option<String>,
    /// Previous period start.
    pub previous_from: Option<String>,
    /// Previous period end.
    pub previous_to: Option<String>,
}

/// Parses an optional account ID query value.
pub(crate) fn parse_account_id(input: Option<&str>) -> Result<Option<AccountId>, ApiError> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<AccountId>().map(Some).map_err(|_| {
            ApiError::from(AppError::Validation(format!(
                "Invalid account id: {value:?}"
            )))
        }),
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn get_trial_balance(
    State(state): State<AppState>,
    Query(query): Query<AsOfQuery>,
) -> Result<Json<TrialBalanceReport>, ApiError> {
    let as_of = parse_optional_date(query.as_of.as_deref())?;
    Ok(Json(state.reports.trial_balance(as_of).await?))
}

async fn get_balance_sheet(
    State(state): State<AppState>,
    Query(query): Query<AsOfQuery>,
) -> Result<Json<BalanceSheetReport>, ApiError> {
    let as_of = parse_optional_date(query.as_of.as_deref())?;
    Ok(Json(state.reports.balance_sheet(as_of).await?))
}

async fn get_profit_and_loss(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<ProfitAndLossReport>, ApiError> {
    let from = parse_optional_date(query.from.as_deref())?;
    let to = parse_optional_date(query.to.as_deref())?;
    Ok(Json(state.reports.profit_and_loss(from, to).await?))
}

async fn get_profit_and_loss_variance(
    State(state): State<AppState>,
    Query(query): Query<VarianceQuery>,
) -> Result<Json<ProfitAndLossVariance>, ApiError> {
    let report = state
        .reports
        .profit_and_loss_variance(
            parse_optional_date(query.from.as_deref())?,
            parse_optional_date(query.to.as_deref())?,
            parse_optional_date(query.previous_from.as_deref())?,
            parse_optional_date(query.previous_to.as_deref())?,
        )
        .await?;
    Ok(Json(report))
}

async fn get_cash_flow(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<CashFlowReport>, ApiError> {
    let from = parse_optional_date(query.from.as_deref())?;
    let to = parse_optional_date(query.to.as_deref())?;
    Ok(Json(state.reports.cash_flow(from, to).await?))
}

async fn get_general_ledger(
    State(state): State<AppState>,
    Query(query): Query<GeneralLedgerQuery>,
) -> Result<Json<GeneralLedgerReport>, ApiError> {
    let from = parse_optional_date(query.from.as_deref())?;
    let to = parse_optional_date(query.to.as_deref())?;
    let account_id = parse_account_id(query.account_id.as_deref())?;
    Ok(Json(
        state.reports.general_ledger(from, to, account_id).await?,
    ))
}

async fn get_comparative_trial_balance(
    State(state): State<AppState>,
    Query(query): Query<ComparativeAsOfQuery>,
) -> Result<Json<ComparativeTrialBalance>, ApiError> {
    let dates = parse_date_list(query.as_of.as_deref().unwrap_or_default())?;
    Ok(Json(state.reports.comparative_trial_balance(&dates).await?))
}

async fn get_comparative_balance_sheet(
    State(state): State<AppState>,
    Query(query): Query<ComparativeAsOfQuery>,
) -> Result<Json<ComparativeReport<BalanceSheetReport>>, ApiError> {
    let dates = parse_date_list(query.as_of.as_deref().unwrap_or_default())?;
    Ok(Json(state.reports.comparative_balance_sheet(&dates).await?))
}

async fn get_comparative_profit_and_loss(
    State(state): State<AppState>,
    Query(query): Query<ComparativePeriodsQuery>,
) -> Result<Json<ComparativeReport<ProfitAndLossReport>>, ApiError> {
    let periods = query
        .periods
        .as_deref()
        .map_or(Err(ReportError::NoPeriods), parse_period_list)?;
    Ok(Json(
        state.reports.comparative_profit_and_loss(&periods).await?,
    ))
}
