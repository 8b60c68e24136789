//! Property-based tests for journal entry validation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use chrono::NaiveDate;
use neraca_shared::types::AccountId;

use super::entry::{NewJournalEntry, NewJournalLine};
use super::error::LedgerError;
use super::validation::validate_entry;

/// Strategy to generate a valid positive amount (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a negative amount.
fn negative_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(-cents, 2))
}

fn entry(lines: Vec<NewJournalLine>) -> NewJournalEntry {
    NewJournalEntry {
        entry_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        reference: "JE-PROP".into(),
        description: "Generated".into(),
        posted_by: None,
        lines,
    }
}

/// Splits `total` into the given debit amounts and one balancing credit.
fn balanced_lines(debits: &[Decimal]) -> Vec<NewJournalLine> {
    let total: Decimal = debits.iter().copied().sum();
    let mut lines: Vec<NewJournalLine> = debits
        .iter()
        .map(|amount| NewJournalLine::debit(AccountId::new(), *amount))
        .collect();
    lines.push(NewJournalLine::credit(AccountId::new(), total));
    lines
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any set of debits offset by one equal credit validates, and the
    /// reported totals match.
    #[test]
    fn prop_balanced_entries_accepted(
        debits in prop::collection::vec(positive_amount(), 1..10),
    ) {
        let lines = balanced_lines(&debits);
        let expected_count = lines.len();
        let totals = validate_entry(&entry(lines));

        prop_assert!(totals.is_ok(), "Balanced entry rejected: {:?}", totals);
        let totals = totals.unwrap();
        prop_assert_eq!(totals.total_debit, totals.total_credit);
        prop_assert_eq!(totals.line_count, expected_count);
    }

    /// Adding any non-zero amount to one side breaks the balance.
    #[test]
    fn prop_unbalanced_entries_rejected(
        debits in prop::collection::vec(positive_amount(), 1..10),
        extra in positive_amount(),
    ) {
        let mut lines = balanced_lines(&debits);
        lines[0].debit += extra;

        let result = validate_entry(&entry(lines));
        prop_assert!(
            matches!(result, Err(LedgerError::Unbalanced { .. })),
            "Unbalanced entry should be rejected, got: {:?}",
            result
        );
    }

    /// Negative amounts are rejected on either side.
    #[test]
    fn prop_negative_amount_rejected(
        amount in negative_amount(),
        other in positive_amount(),
        on_debit in any::<bool>(),
    ) {
        let lines = if on_debit {
            vec![
                NewJournalLine::debit(AccountId::new(), amount),
                NewJournalLine::credit(AccountId::new(), other),
            ]
        } else {
            vec![
                NewJournalLine::debit(AccountId::new(), other),
                NewJournalLine::credit(AccountId::new(), amount),
            ]
        };

        let result = validate_entry(&entry(lines));
        prop_assert!(
            matches!(result, Err(LedgerError::NegativeAmount)),
            "Negative amount should be rejected, got: {:?}",
            result
        );
    }
}
