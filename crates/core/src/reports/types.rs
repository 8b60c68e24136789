//! Report data types.
//!
//! Everything here serializes with camelCase keys and decimal amounts as
//! strings.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use neraca_shared::types::AccountId;

use crate::ledger::{
    Account, AccountClassifier, AccountType, BalanceTotals, DebitCreditBalance, Movement,
    NormalSide, StatementBucket,
};
use crate::period::ReportPeriod;

/// Account balance for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Statement bucket derived from code and type.
    pub bucket: StatementBucket,
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
    /// Net balance, positive on the account's normal side.
    pub balance: Decimal,
}

impl AccountBalance {
    /// Builds a balance row from raw totals.
    #[must_use]
    pub fn new(account: &Account, totals: BalanceTotals, classifier: &AccountClassifier) -> Self {
        Self {
            account_id: account.id,
            code: account.code.clone(),
            name: account.name.clone(),
            account_type: account.account_type,
            bucket: classifier.statement_bucket(&account.code, account.account_type),
            total_debit: totals.debit,
            total_credit: totals.credit,
            balance: totals.net(NormalSide::of(account.account_type)),
        }
    }

    /// Normal side of the account.
    #[must_use]
    pub const fn normal_side(&self) -> NormalSide {
        NormalSide::of(self.account_type)
    }

    /// The balance split onto one column.
    #[must_use]
    pub fn debit_credit(&self) -> DebitCreditBalance {
        DebitCreditBalance::from_net(self.normal_side(), self.balance)
    }
}

// ============================================================================
// Trial balance
// ============================================================================

/// One trial balance row. At most one of debit/credit is non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalanceLine {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Debit column.
    pub debit: Decimal,
    /// Credit column.
    pub credit: Decimal,
}

/// Trial balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalanceReport {
    /// As of date.
    pub as_of_date: NaiveDate,
    /// Accounts with a material balance, ordered by code.
    pub accounts: Vec<TrialBalanceLine>,
    /// Sum of the debit column.
    pub total_debit: Decimal,
    /// Sum of the credit column.
    pub total_credit: Decimal,
    /// Whether the columns agree within the materiality tolerance.
    pub is_balanced: bool,
    /// `total_debit - total_credit`.
    pub difference: Decimal,
}

// ============================================================================
// Balance sheet
// ============================================================================

/// A statement row: an account and its signed amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementLine {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Statement bucket.
    pub bucket: StatementBucket,
    /// Balance on the account's normal side.
    pub amount: Decimal,
}

impl From<AccountBalance> for StatementLine {
    fn from(balance: AccountBalance) -> Self {
        Self {
            account_id: balance.account_id,
            code: balance.code,
            name: balance.name,
            account_type: balance.account_type,
            bucket: balance.bucket,
            amount: balance.balance,
        }
    }
}

/// Balance sheet subsection (current assets, non-current liabilities, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheetSubsection {
    /// Bucket the subsection groups.
    pub bucket: StatementBucket,
    /// Subsection name.
    pub name: String,
    /// Subsection total.
    pub total: Decimal,
    /// Accounts in this subsection.
    pub accounts: Vec<StatementLine>,
}

/// Balance sheet section (assets, liabilities, equity).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheetSection {
    /// Section total.
    pub total: Decimal,
    /// Accounts in this section.
    pub accounts: Vec<StatementLine>,
    /// Subsections; empty for equity.
    pub subsections: Vec<BalanceSheetSubsection>,
}

impl BalanceSheetSection {
    /// Total of one subsection, zero if absent.
    #[must_use]
    pub fn subtotal(&self, bucket: StatementBucket) -> Decimal {
        self.subsections
            .iter()
            .find(|subsection| subsection.bucket == bucket)
            .map_or(Decimal::ZERO, |subsection| subsection.total)
    }
}

/// Balance sheet report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheetReport {
    /// As of date.
    pub as_of_date: NaiveDate,
    /// Assets section.
    pub assets: BalanceSheetSection,
    /// Liabilities section.
    pub liabilities: BalanceSheetSection,
    /// Equity section.
    pub equity: BalanceSheetSection,
    /// Total assets.
    pub total_assets: Decimal,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Total equity.
    pub total_equity: Decimal,
    /// Liabilities plus equity.
    pub liabilities_and_equity: Decimal,
    /// Current assets.
    pub current_assets: Decimal,
    /// Non-current assets.
    pub non_current_assets: Decimal,
    /// Current liabilities.
    pub current_liabilities: Decimal,
    /// Non-current liabilities.
    pub non_current_liabilities: Decimal,
    /// Current assets minus current liabilities.
    pub working_capital: Decimal,
    /// Whether assets equal liabilities plus equity within tolerance.
    pub is_balanced: bool,
    /// `total_assets - liabilities_and_equity`.
    pub difference: Decimal,
}

// ============================================================================
// Profit and loss
// ============================================================================

/// Profit and loss section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitAndLossSection {
    /// Section total.
    pub total: Decimal,
    /// Accounts in this section.
    pub accounts: Vec<StatementLine>,
}

/// Profit and loss report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitAndLossReport {
    /// Period start date (inclusive).
    pub start_date: NaiveDate,
    /// Period end date (inclusive).
    pub end_date: NaiveDate,
    /// Revenue section.
    pub revenue: ProfitAndLossSection,
    /// Cost of sales section.
    pub cost_of_sales: ProfitAndLossSection,
    /// Operating expenses section.
    pub operating_expenses: ProfitAndLossSection,
    /// Total revenue.
    pub total_revenue: Decimal,
    /// Total cost of sales.
    pub total_cost_of_sales: Decimal,
    /// Total operating expenses.
    pub total_operating_expenses: Decimal,
    /// Revenue minus cost of sales.
    pub gross_profit: Decimal,
    /// Gross profit minus operating expenses.
    pub operating_income: Decimal,
    /// Equal to operating income; there is no other income/expense layer.
    pub net_income: Decimal,
    /// Gross profit as a percentage of revenue, 0 without revenue.
    pub gross_margin: Decimal,
    /// Net income as a percentage of revenue, 0 without revenue.
    pub net_margin: Decimal,
}

// ============================================================================
// Cash flow
// ============================================================================

/// One cash flow line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowItem {
    /// Source account, absent for derived lines such as net income.
    pub account_id: Option<AccountId>,
    /// Source account code.
    pub code: Option<String>,
    /// Line label.
    pub label: String,
    /// Cash effect: positive is an inflow.
    pub amount: Decimal,
}

/// Cash flow section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowSection {
    /// Lines.
    pub items: Vec<CashFlowItem>,
    /// Section total.
    pub total: Decimal,
}

impl CashFlowSection {
    /// Appends a line and adds it to the total.
    pub fn push(&mut self, item: CashFlowItem) {
        self.total += item.amount;
        self.items.push(item);
    }
}

/// Cash flow statement (indirect method, simplified).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowReport {
    /// Period start date (inclusive).
    pub start_date: NaiveDate,
    /// Period end date (inclusive).
    pub end_date: NaiveDate,
    /// Net income only; no working capital or non-cash adjustments.
    pub operating: CashFlowSection,
    /// Fixed asset movements.
    pub investing: CashFlowSection,
    /// Long-term liability and share capital movements.
    pub financing: CashFlowSection,
    /// Sum of the three sections.
    pub net_cash_flow: Decimal,
}

// ============================================================================
// Ledgers
// ============================================================================

/// One account's movements over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountLedger {
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
    /// First day of the period, absent for all history.
    pub start_date: Option<NaiveDate>,
    /// Last day of the period, absent for open-ended.
    pub end_date: Option<NaiveDate>,
    /// Balance strictly before the start date.
    pub beginning_balance: Decimal,
    /// Movements in ledger order.
    pub movements: Vec<Movement>,
    /// Sum of debits in the period.
    pub total_debit: Decimal,
    /// Sum of credits in the period.
    pub total_credit: Decimal,
    /// Running balance after the last movement.
    pub ending_balance: Decimal,
}

/// General ledger: one block per account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralLedgerReport {
    /// Period start date (inclusive).
    pub start_date: NaiveDate,
    /// Period end date (inclusive).
    pub end_date: NaiveDate,
    /// Account blocks ordered by code.
    pub accounts: Vec<AccountLedger>,
    /// Sum of debits across all blocks.
    pub total_debit: Decimal,
    /// Sum of credits across all blocks.
    pub total_credit: Decimal,
}

// ============================================================================
// Comparative
// ============================================================================

/// One period's full report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodResult<T> {
    /// The period.
    pub period: ReportPeriod,
    /// The report for that period.
    pub report: T,
}

/// The same report run over several periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparativeReport<T> {
    /// One result per requested period, in request order.
    pub periods: Vec<PeriodResult<T>>,
}

/// A merged trial balance row with one column pair per period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparativeTrialBalanceRow {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Debit/credit per period, zero where the account is absent.
    pub columns: Vec<DebitCreditBalance>,
}

/// Trial balances side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparativeTrialBalance {
    /// One trial balance per period, in request order.
    pub periods: Vec<PeriodResult<TrialBalanceReport>>,
    /// Union of accounts across periods, ordered by code.
    pub accounts: Vec<ComparativeTrialBalanceRow>,
}
