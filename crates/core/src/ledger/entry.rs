//! Journal entries and their lines.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use neraca_shared::types::{AccountId, JournalEntryId, JournalLineId};

/// Journal entry status. Only `Posted` entries count toward balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Being prepared; ignored by reports.
    Draft,
    /// Part of the books; immutable.
    Posted,
    /// Cancelled; ignored by reports.
    Voided,
}

impl EntryStatus {
    /// Returns the lowercase name used in storage and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Posted => "posted",
            Self::Voided => "voided",
        }
    }

    /// Returns true if the entry may move to `next`.
    ///
    /// draft -> posted, draft -> voided, posted -> voided.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Posted | Self::Voided) | (Self::Posted, Self::Voided)
        )
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Journal entry header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// Entry ID.
    pub id: JournalEntryId,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Reference number, e.g. an invoice number.
    pub reference: String,
    /// Description.
    pub description: String,
    /// Status.
    pub status: EntryStatus,
    /// When the entry was posted.
    pub posted_at: Option<DateTime<Utc>>,
    /// Who posted the entry.
    pub posted_by: Option<String>,
}

/// A single debit or credit movement inside an entry.
///
/// Both amounts are non-negative magnitudes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryLine {
    /// Line ID.
    pub id: JournalLineId,
    /// Owning entry.
    pub entry_id: JournalEntryId,
    /// Account moved.
    pub account_id: AccountId,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Optional line description.
    pub description: Option<String>,
}

/// A posted line joined with its entry header, as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostedLine {
    /// Line ID.
    pub line_id: JournalLineId,
    /// Owning entry.
    pub entry_id: JournalEntryId,
    /// Account moved.
    pub account_id: AccountId,
    /// Entry date.
    pub entry_date: NaiveDate,
    /// Entry reference.
    pub reference: String,
    /// Entry description.
    pub entry_description: String,
    /// Line description.
    pub line_description: Option<String>,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

impl PostedLine {
    /// Line description, falling back to the entry description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.line_description
            .as_deref()
            .filter(|text| !text.is_empty())
            .unwrap_or(&self.entry_description)
    }
}

/// Input line for a new journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJournalLine {
    /// Account to move.
    pub account_id: AccountId,
    /// Debit amount (zero for a credit line).
    pub debit: Decimal,
    /// Credit amount (zero for a debit line).
    pub credit: Decimal,
    /// Optional line description.
    pub description: Option<String>,
}

impl NewJournalLine {
    /// A debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            description: None,
        }
    }

    /// A credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            description: None,
        }
    }

    /// Sets the line description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Input for a new journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJournalEntry {
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Reference number.
    pub reference: String,
    /// Description.
    pub description: String,
    /// Who is posting the entry.
    pub posted_by: Option<String>,
    /// Lines (at least two).
    pub lines: Vec<NewJournalLine>,
}

impl NewJournalEntry {
    /// Creates an entry with no lines.
    #[must_use]
    pub fn new(
        entry_date: NaiveDate,
        reference: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            entry_date,
            reference: reference.into(),
            description: description.into(),
            posted_by: None,
            lines: Vec::new(),
        }
    }

    /// Appends a line.
    #[must_use]
    pub fn line(mut self, line: NewJournalLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Sets the posting actor.
    #[must_use]
    pub fn posted_by(mut self, actor: impl Into<String>) -> Self {
        self.posted_by = Some(actor.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(EntryStatus::Draft, EntryStatus::Posted, true)]
    #[case(EntryStatus::Draft, EntryStatus::Voided, true)]
    #[case(EntryStatus::Posted, EntryStatus::Voided, true)]
    #[case(EntryStatus::Posted, EntryStatus::Draft, false)]
    #[case(EntryStatus::Voided, EntryStatus::Posted, false)]
    #[case(EntryStatus::Voided, EntryStatus::Draft, false)]
    #[case(EntryStatus::Posted, EntryStatus::Posted, false)]
    fn test_status_transitions(
        #[case] from: EntryStatus,
        #[case] to: EntryStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[test]
    fn test_posted_line_description_fallback() {
        let mut line = PostedLine {
            line_id: JournalLineId::new(),
            entry_id: JournalEntryId::new(),
            account_id: AccountId::new(),
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            reference: "JE-001".into(),
            entry_description: "Cash sale".into(),
            line_description: None,
            debit: dec!(1000.00),
            credit: Decimal::ZERO,
        };
        assert_eq!(line.description(), "Cash sale");

        line.line_description = Some(String::new());
        assert_eq!(line.description(), "Cash sale");

        line.line_description = Some("Till 3".into());
        assert_eq!(line.description(), "Till 3");
    }

    #[test]
    fn test_entry_builder() {
        let cash = AccountId::new();
        let revenue = AccountId::new();
        let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let entry = NewJournalEntry::new(day, "JE-001", "Sale")
            .line(NewJournalLine::debit(cash, dec!(1000.00)))
            .line(NewJournalLine::credit(revenue, dec!(1000.00)).with_description("Sales"))
            .posted_by("accountant");

        assert_eq!(entry.lines.len(), 2);
        assert_eq!(entry.lines[0].credit, Decimal::ZERO);
        assert_eq!(entry.lines[1].description.as_deref(), Some("Sales"));
        assert_eq!(entry.posted_by.as_deref(), Some("accountant"));
    }
}
