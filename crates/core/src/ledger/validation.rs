//! Business rule validation for new journal entries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::NewJournalEntry;
use super::error::LedgerError;

/// Column totals of a validated entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryTotals {
    /// Sum of debit lines.
    pub total_debit: Decimal,
    /// Sum of credit lines.
    pub total_credit: Decimal,
    /// Number of lines.
    pub line_count: usize,
}

/// Validates a journal entry before it is posted.
///
/// Rules, checked in order:
/// 1. At least two lines.
/// 2. No negative amounts.
/// 3. Each line has exactly one non-zero side.
/// 4. Both a debit and a credit line are present.
/// 5. Total debits equal total credits exactly.
///
/// # Errors
///
/// Returns the first rule that fails.
pub fn validate_entry(entry: &NewJournalEntry) -> Result<EntryTotals, LedgerError> {
    if entry.lines.len() < 2 {
        return Err(LedgerError::InsufficientLines);
    }

    let mut total_debit = Decimal::ZERO;
    let mut total_credit = Decimal::ZERO;
    let mut has_debit = false;
    let mut has_credit = false;

    for line in &entry.lines {
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }

        match (line.debit.is_zero(), line.credit.is_zero()) {
            (true, true) => return Err(LedgerError::ZeroAmount),
            (false, false) => return Err(LedgerError::TwoSidedLine),
            (false, true) => {
                total_debit += line.debit;
                has_debit = true;
            }
            (true, false) => {
                total_credit += line.credit;
                has_credit = true;
            }
        }
    }

    if !has_debit || !has_credit {
        return Err(LedgerError::SingleSided);
    }

    if total_debit != total_credit {
        return Err(LedgerError::Unbalanced {
            debit: total_debit,
            credit: total_credit,
        });
    }

    Ok(EntryTotals {
        total_debit,
        total_credit,
        line_count: entry.lines.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::entry::NewJournalLine;
    use chrono::NaiveDate;
    use neraca_shared::types::AccountId;
    use rust_decimal_macros::dec;

    fn entry(lines: Vec<NewJournalLine>) -> NewJournalEntry {
        NewJournalEntry {
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            reference: "JE-001".into(),
            description: "Test".into(),
            posted_by: None,
            lines,
        }
    }

    #[test]
    fn test_balanced_entry() {
        let totals = validate_entry(&entry(vec![
            NewJournalLine::debit(AccountId::new(), dec!(100.00)),
            NewJournalLine::credit(AccountId::new(), dec!(60.00)),
            NewJournalLine::credit(AccountId::new(), dec!(40.00)),
        ]))
        .unwrap();

        assert_eq!(totals.total_debit, dec!(100.00));
        assert_eq!(totals.total_credit, dec!(100.00));
        assert_eq!(totals.line_count, 3);
    }

    #[test]
    fn test_unbalanced_entry() {
        let result = validate_entry(&entry(vec![
            NewJournalLine::debit(AccountId::new(), dec!(100.00)),
            NewJournalLine::credit(AccountId::new(), dec!(50.00)),
        ]));
        assert!(matches!(
            result,
            Err(LedgerError::Unbalanced { debit, credit })
                if debit == dec!(100.00) && credit == dec!(50.00)
        ));
    }

    #[test]
    fn test_single_line_rejected() {
        let result = validate_entry(&entry(vec![NewJournalLine::debit(AccountId::new(), dec!(1))]));
        assert!(matches!(result, Err(LedgerError::InsufficientLines)));
    }

    #[test]
    fn test_single_sided() {
        let result = validate_entry(&entry(vec![
            NewJournalLine::debit(AccountId::new(), dec!(100.00)),
            NewJournalLine::debit(AccountId::new(), dec!(50.00)),
        ]));
        assert!(matches!(result, Err(LedgerError::SingleSided)));
    }

    #[test]
    fn test_two_sided_line() {
        let mut line = NewJournalLine::debit(AccountId::new(), dec!(10));
        line.credit = dec!(10);
        let result = validate_entry(&entry(vec![
            line,
            NewJournalLine::credit(AccountId::new(), dec!(10)),
        ]));
        assert!(matches!(result, Err(LedgerError::TwoSidedLine)));
    }

    #[test]
    fn test_zero_line() {
        let result = validate_entry(&entry(vec![
            NewJournalLine::debit(AccountId::new(), Decimal::ZERO),
            NewJournalLine::credit(AccountId::new(), dec!(10)),
        ]));
        assert!(matches!(result, Err(LedgerError::ZeroAmount)));
    }

    #[test]
    fn test_negative_line() {
        let result = validate_entry(&entry(vec![
            NewJournalLine::debit(AccountId::new(), dec!(-10)),
            NewJournalLine::credit(AccountId::new(), dec!(-10)),
        ]));
        assert!(matches!(result, Err(LedgerError::NegativeAmount)));
    }
}
