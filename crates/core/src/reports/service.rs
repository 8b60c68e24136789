//! Report service: the entry point for every statement.
//!
//! The service reads through a [`LedgerStore`], classifies accounts, and
//! hands per-account balances to the pure assemblers. It holds no mutable
//! state, so one instance can serve concurrent requests.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{NaiveDate, TimeDelta};
use futures::future::try_join_all;
use tracing::debug;

use neraca_shared::{ReportingConfig, types::AccountId, types::Materiality};

use super::balance_sheet::assemble_balance_sheet;
use super::cash_flow::assemble_cash_flow;
use super::comparative::merge_trial_balances;
use super::error::ReportError;
use super::ledger::{account_ledger, general_ledger_report, group_ledgers};
use super::profit_loss::assemble_profit_and_loss;
use super::trial_balance::assemble_trial_balance;
use super::types::{
    AccountBalance, AccountLedger, BalanceSheetReport, CashFlowReport, ComparativeReport,
    ComparativeTrialBalance, GeneralLedgerReport, PeriodResult, ProfitAndLossReport,
    TrialBalanceReport,
};
use super::variance::ProfitAndLossVariance;
use crate::ledger::{
    Account, AccountClassifier, AccountFilter, AccountType, BalanceCalculator,
    DebitCreditBalance, LedgerStore, LineFilter, RunningLedger,
};
use crate::period::{Clock, DateRange, ReportPeriod, SystemClock, first_day_of_month};

/// Service for generating financial reports.
#[derive(Clone)]
pub struct ReportService {
    store: Arc<dyn LedgerStore>,
    classifier: AccountClassifier,
    materiality: Materiality,
    clock: Arc<dyn Clock>,
}

impl ReportService {
    /// Creates a service over a store using the system clock.
    #[must_use]
    pub fn new(store: Arc<dyn LedgerStore>, config: &ReportingConfig) -> Self {
        Self {
            store,
            classifier: AccountClassifier::from_config(config),
            materiality: Materiality::new(config.materiality_tolerance),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used for defaulted dates.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The account classifier in use.
    #[must_use]
    pub const fn classifier(&self) -> &AccountClassifier {
        &self.classifier
    }

    /// The materiality rule in use.
    #[must_use]
    pub const fn materiality(&self) -> Materiality {
        self.materiality
    }

    /// Today according to the injected clock.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Defaults a missing as-of date to today.
    #[must_use]
    pub fn resolve_as_of(&self, as_of: Option<NaiveDate>) -> NaiveDate {
        as_of.unwrap_or_else(|| self.today())
    }

    /// Resolves an inclusive period.
    ///
    /// A missing end defaults to today and a missing start to the first day
    /// of the end date's month.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if the start is after the end.
    pub fn resolve_period(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<(NaiveDate, NaiveDate), ReportError> {
        let end = self.resolve_as_of(to);
        let start = from.unwrap_or_else(|| first_day_of_month(end));
        DateRange::between(start, end)?;
        Ok((start, end))
    }

    // ========================================================================
    // Balances
    // ========================================================================

    /// Signed balance of one account. Missing bounds mean unbounded.
    ///
    /// # Errors
    ///
    /// `AccountNotFound`, `InvalidDateRange`, or a store failure.
    pub async fn account_balance(
        &self,
        account_id: AccountId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<AccountBalance, ReportError> {
        let range = DateRange::from_dates(from, to)?;
        let account = self.require_account(account_id).await?;
        let totals = BalanceCalculator::new(self.store.as_ref())
            .totals(account.id, range)
            .await?;
        Ok(AccountBalance::new(&account, totals, &self.classifier))
    }

    /// Balance as of a date split onto the debit or credit column.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` or a store failure.
    pub async fn account_debit_credit_balance(
        &self,
        account_id: AccountId,
        as_of: Option<NaiveDate>,
    ) -> Result<DebitCreditBalance, ReportError> {
        let as_of = self.resolve_as_of(as_of);
        let account = self.require_account(account_id).await?;
        Ok(BalanceCalculator::new(self.store.as_ref())
            .account_debit_credit_balance(&account, as_of)
            .await?)
    }

    /// Movements of one account with running balances.
    ///
    /// # Errors
    ///
    /// `AccountNotFound`, `InvalidDateRange`, or a store failure.
    pub async fn ledger_movements(
        &self,
        account_id: AccountId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<AccountLedger, ReportError> {
        let (start, end) = self.resolve_period(from, to)?;
        let range = DateRange::between(start, end)?;
        let account = self.require_account(account_id).await?;
        let running = RunningLedger::load(self.store.as_ref(), &account, range).await?;

        debug!(
            account_code = %account.code,
            %start,
            %end,
            movements = running.len(),
            "Built account ledger"
        );
        Ok(account_ledger(&account, range, &running))
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Trial balance of active accounts as of a date (default today).
    ///
    /// # Errors
    ///
    /// Store failures only; an imbalance is reported in the result.
    pub async fn trial_balance(
        &self,
        as_of: Option<NaiveDate>,
    ) -> Result<TrialBalanceReport, ReportError> {
        let as_of = self.resolve_as_of(as_of);
        let balances = self
            .balances(&AccountFilter::active(), DateRange::as_of(as_of))
            .await?;
        let report = assemble_trial_balance(as_of, balances, self.materiality);

        debug!(
            %as_of,
            accounts = report.accounts.len(),
            is_balanced = report.is_balanced,
            "Generated trial balance"
        );
        Ok(report)
    }

    /// Balance sheet as of a date (default today). Deactivated accounts keep
    /// their history.
    ///
    /// # Errors
    ///
    /// Store failures only; an imbalance is reported in the result.
    pub async fn balance_sheet(
        &self,
        as_of: Option<NaiveDate>,
    ) -> Result<BalanceSheetReport, ReportError> {
        let as_of = self.resolve_as_of(as_of);
        let balances = self
            .balances(
                &AccountFilter::all().with_types(
                    AccountType::ALL
                        .into_iter()
                        .filter(|kind| kind.is_balance_sheet()),
                ),
                DateRange::as_of(as_of),
            )
            .await?;
        let report = assemble_balance_sheet(as_of, balances, self.materiality);

        debug!(
            %as_of,
            total_assets = %report.total_assets,
            is_balanced = report.is_balanced,
            "Generated balance sheet"
        );
        Ok(report)
    }

    /// Profit and loss over an inclusive period (default month to date).
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` or a store failure.
    pub async fn profit_and_loss(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<ProfitAndLossReport, ReportError> {
        let (start, end) = self.resolve_period(from, to)?;
        let balances = self
            .balances(
                &AccountFilter::all().with_types(
                    AccountType::ALL
                        .into_iter()
                        .filter(|kind| kind.is_profit_and_loss()),
                ),
                DateRange::between(start, end)?,
            )
            .await?;
        let report = assemble_profit_and_loss(start, end, balances, self.materiality);

        debug!(%start, %end, net_income = %report.net_income, "Generated profit and loss");
        Ok(report)
    }

    /// Cash flow statement over an inclusive period (default month to date),
    /// deactivated accounts included.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` or a store failure.
    pub async fn cash_flow(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<CashFlowReport, ReportError> {
        let (start, end) = self.resolve_period(from, to)?;
        let balances = self
            .balances(&AccountFilter::all(), DateRange::between(start, end)?)
            .await?;

        let profit_and_loss =
            assemble_profit_and_loss(start, end, balances.clone(), self.materiality);
        let report = assemble_cash_flow(
            start,
            end,
            profit_and_loss.net_income,
            balances,
            &self.classifier,
            self.materiality,
        );

        debug!(%start, %end, net_cash_flow = %report.net_cash_flow, "Generated cash flow");
        Ok(report)
    }

    /// General ledger over an inclusive period (default month to date).
    ///
    /// With an account, one block for that account. Without, one block per
    /// account touched in the period, inactive accounts included.
    ///
    /// # Errors
    ///
    /// `AccountNotFound`, `InvalidDateRange`, or a store failure.
    pub async fn general_ledger(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        account_id: Option<AccountId>,
    ) -> Result<GeneralLedgerReport, ReportError> {
        let (start, end) = self.resolve_period(from, to)?;

        if let Some(account_id) = account_id {
            let ledger = self
                .ledger_movements(account_id, Some(start), Some(end))
                .await?;
            return Ok(general_ledger_report(start, end, vec![ledger]));
        }

        let range = DateRange::between(start, end)?;
        let lines = self.store.list_posted_lines(&LineFilter::all(range)).await?;
        let touched: BTreeSet<AccountId> = lines.iter().map(|line| line.account_id).collect();
        let accounts: Vec<Account> = self
            .store
            .list_accounts(&AccountFilter::all())
            .await?
            .into_iter()
            .filter(|account| touched.contains(&account.id))
            .collect();
        let openings = BalanceCalculator::new(self.store.as_ref())
            .totals_by_account(touched, DateRange::before(start))
            .await?;

        let ledgers = group_ledgers(&accounts, lines, &openings, range);
        debug!(%start, %end, accounts = ledgers.len(), "Generated general ledger");
        Ok(general_ledger_report(start, end, ledgers))
    }

    // ========================================================================
    // Comparative
    // ========================================================================

    /// Trial balances as of several dates plus a merged account table.
    ///
    /// # Errors
    ///
    /// `NoPeriods` for an empty list, or the first failing period.
    pub async fn comparative_trial_balance(
        &self,
        as_of_dates: &[NaiveDate],
    ) -> Result<ComparativeTrialBalance, ReportError> {
        if as_of_dates.is_empty() {
            return Err(ReportError::NoPeriods);
        }
        let periods = try_join_all(as_of_dates.iter().map(|as_of| async move {
            let report = self.trial_balance(Some(*as_of)).await?;
            Ok::<_, ReportError>(PeriodResult {
                period: ReportPeriod::as_of(*as_of),
                report,
            })
        }))
        .await?;
        Ok(merge_trial_balances(periods))
    }

    /// Balance sheets as of several dates.
    ///
    /// # Errors
    ///
    /// `NoPeriods` for an empty list, or the first failing period.
    pub async fn comparative_balance_sheet(
        &self,
        as_of_dates: &[NaiveDate],
    ) -> Result<ComparativeReport<BalanceSheetReport>, ReportError> {
        if as_of_dates.is_empty() {
            return Err(ReportError::NoPeriods);
        }
        let periods = try_join_all(as_of_dates.iter().map(|as_of| async move {
            let report = self.balance_sheet(Some(*as_of)).await?;
            Ok::<_, ReportError>(PeriodResult {
                period: ReportPeriod::as_of(*as_of),
                report,
            })
        }))
        .await?;
        Ok(ComparativeReport { periods })
    }

    /// Profit and loss over several periods.
    ///
    /// A period without a start runs from the first day of its end month.
    ///
    /// # Errors
    ///
    /// `NoPeriods` for an empty list, or the first failing period.
    pub async fn comparative_profit_and_loss(
        &self,
        periods: &[ReportPeriod],
    ) -> Result<ComparativeReport<ProfitAndLossReport>, ReportError> {
        if periods.is_empty() {
            return Err(ReportError::NoPeriods);
        }
        let periods = try_join_all(periods.iter().map(|period| async move {
            let report = self
                .profit_and_loss(period.start_date, Some(period.end_date))
                .await?;
            Ok::<_, ReportError>(PeriodResult {
                period: period.clone(),
                report,
            })
        }))
        .await?;
        Ok(ComparativeReport { periods })
    }

    /// Profit and loss totals compared with a previous period.
    ///
    /// Without previous bounds, the previous period is the one of equal
    /// length ending the day before the current period starts.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` or a store failure.
    pub async fn profit_and_loss_variance(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        previous_from: Option<NaiveDate>,
        previous_to: Option<NaiveDate>,
    ) -> Result<ProfitAndLossVariance, ReportError> {
        let (start, end) = self.resolve_period(from, to)?;
        let (previous_start, previous_end) =
            previous_period(start, end, previous_from, previous_to)?;

        let (current, previous) = futures::try_join!(
            self.profit_and_loss(Some(start), Some(end)),
            self.profit_and_loss(Some(previous_start), Some(previous_end)),
        )?;

        Ok(ProfitAndLossVariance::compare(
            ReportPeriod::between(start, end)?,
            &current,
            ReportPeriod::between(previous_start, previous_end)?,
            &previous,
        ))
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn require_account(&self, account_id: AccountId) -> Result<Account, ReportError> {
        self.store
            .get_account(account_id)
            .await?
            .ok_or(ReportError::AccountNotFound(account_id))
    }

    /// Balances of every account matching the filter, from one line read.
    async fn balances(
        &self,
        filter: &AccountFilter,
        range: DateRange,
    ) -> Result<Vec<AccountBalance>, ReportError> {
        let accounts = self.store.list_accounts(filter).await?;
        let totals = BalanceCalculator::new(self.store.as_ref())
            .totals_by_account(accounts.iter().map(|account| account.id), range)
            .await?;

        Ok(accounts
            .iter()
            .map(|account| {
                let account_totals = totals.get(&account.id).copied().unwrap_or_default();
                AccountBalance::new(account, account_totals, &self.classifier)
            })
            .collect())
    }
}

/// Resolves the comparison period for a variance report.
fn previous_period(
    start: NaiveDate,
    end: NaiveDate,
    previous_from: Option<NaiveDate>,
    previous_to: Option<NaiveDate>,
) -> Result<(NaiveDate, NaiveDate), ReportError> {
    let day_before_start = start
        .pred_opt()
        .ok_or_else(|| ReportError::InvalidDate(start.to_string()))?;
    let previous_end = previous_to.unwrap_or(day_before_start);
    let previous_start = match previous_from {
        Some(date) => date,
        None if previous_to.is_some() => first_day_of_month(previous_end),
        None => previous_end
            .checked_sub_signed(TimeDelta::days((end - start).num_days()))
            .ok_or_else(|| ReportError::InvalidDate(previous_end.to_string()))?,
    };
    DateRange::between(previous_start, previous_end)?;
    Ok((previous_start, previous_end))
}

impl std::fmt::Debug for ReportService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportService")
            .field("classifier", &self.classifier)
            .field("materiality", &self.materiality)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_previous_period_defaults_to_equal_length() {
        let (start, end) =
            previous_period(date(2024, 2, 1), date(2024, 2, 29), None, None).unwrap();
        assert_eq!(end, date(2024, 1, 31));
        assert_eq!(start, date(2024, 1, 3));
    }

    #[test]
    fn test_previous_period_explicit() {
        let (start, end) = previous_period(
            date(2024, 2, 1),
            date(2024, 2, 29),
            Some(date(2024, 1, 1)),
            Some(date(2024, 1, 31)),
        )
        .unwrap();
        assert_eq!((start, end), (date(2024, 1, 1), date(2024, 1, 31)));
    }

    #[test]
    fn test_previous_period_only_end_given() {
        let (start, end) =
            previous_period(date(2024, 2, 1), date(2024, 2, 29), None, Some(date(2023, 2, 28)))
                .unwrap();
        assert_eq!((start, end), (date(2023, 2, 1), date(2023, 2, 28)));
    }

    #[test]
    fn test_previous_period_rejects_inverted() {
        let result = previous_period(
            date(2024, 2, 1),
            date(2024, 2, 29),
            Some(date(2024, 1, 31)),
            Some(date(2024, 1, 1)),
        );
        assert!(matches!(result, Err(ReportError::InvalidDateRange { .. })));
    }
}
