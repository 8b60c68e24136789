//! Reporting dates, date ranges, and the injected clock.
//!
//! Ranges use [`Bound`] on both ends so that "all history", "as of a date"
//! and "strictly before a date" are all expressible without sentinel dates.

use std::ops::{Bound, RangeBounds};

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::reports::ReportError;

/// Source of "today" for defaulted report dates.
pub trait Clock: Send + Sync {
    /// Current calendar date.
    fn today(&self) -> NaiveDate;
}

/// Clock backed by the system time (UTC).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock that always returns the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Inclusive/exclusive date window over journal entry dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: Bound<NaiveDate>,
    end: Bound<NaiveDate>,
}

impl DateRange {
    /// All history.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            start: Bound::Unbounded,
            end: Bound::Unbounded,
        }
    }

    /// Everything up to and including `end`.
    #[must_use]
    pub const fn as_of(end: NaiveDate) -> Self {
        Self {
            start: Bound::Unbounded,
            end: Bound::Included(end),
        }
    }

    /// Everything strictly before `start`.
    #[must_use]
    pub const fn before(start: NaiveDate) -> Self {
        Self {
            start: Bound::Unbounded,
            end: Bound::Excluded(start),
        }
    }

    /// Both ends inclusive.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if `start` is after `end`.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Result<Self, ReportError> {
        if start > end {
            return Err(ReportError::InvalidDateRange { start, end });
        }
        Ok(Self {
            start: Bound::Included(start),
            end: Bound::Included(end),
        })
    }

    /// Builds a range from optional inclusive ends.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if both ends are given and inverted.
    pub fn from_dates(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, ReportError> {
        match (start, end) {
            (Some(start), Some(end)) => Self::between(start, end),
            (Some(start), None) => Ok(Self {
                start: Bound::Included(start),
                end: Bound::Unbounded,
            }),
            (None, Some(end)) => Ok(Self::as_of(end)),
            (None, None) => Ok(Self::all()),
        }
    }

    /// Lower bound.
    #[must_use]
    pub const fn start(&self) -> Bound<NaiveDate> {
        self.start
    }

    /// Upper bound.
    #[must_use]
    pub const fn end(&self) -> Bound<NaiveDate> {
        self.end
    }

    /// First included date, if the range has a lower bound.
    #[must_use]
    pub fn start_date(&self) -> Option<NaiveDate> {
        match self.start {
            Bound::Included(date) => Some(date),
            Bound::Excluded(date) => date.succ_opt(),
            Bound::Unbounded => None,
        }
    }

    /// Last included date, if the range has an upper bound.
    #[must_use]
    pub fn end_date(&self) -> Option<NaiveDate> {
        match self.end {
            Bound::Included(date) => Some(date),
            Bound::Excluded(date) => date.pred_opt(),
            Bound::Unbounded => None,
        }
    }

    /// The range covering all history before this one starts.
    ///
    /// Returns `None` when this range has no lower bound, in which case
    /// there is nothing before it.
    #[must_use]
    pub const fn preceding(&self) -> Option<Self> {
        match self.start {
            Bound::Included(date) => Some(Self::before(date)),
            Bound::Excluded(date) => Some(Self::as_of(date)),
            Bound::Unbounded => None,
        }
    }

    /// Returns true if `date` falls inside the range.
    #[must_use]
    pub fn includes(&self, date: NaiveDate) -> bool {
        self.contains(&date)
    }
}

impl RangeBounds<NaiveDate> for DateRange {
    fn start_bound(&self) -> Bound<&NaiveDate> {
        self.start.as_ref()
    }

    fn end_bound(&self) -> Bound<&NaiveDate> {
        self.end.as_ref()
    }
}

/// A labelled reporting period used by comparative reports.
///
/// `start` is `None` for point-in-time statements (trial balance, balance sheet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPeriod {
    /// Column label.
    pub label: String,
    /// First day of the period (inclusive).
    pub start_date: Option<NaiveDate>,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
}

impl ReportPeriod {
    /// A point-in-time period ending at `end`.
    #[must_use]
    pub fn as_of(end: NaiveDate) -> Self {
        Self {
            label: end.to_string(),
            start_date: None,
            end_date: end,
        }
    }

    /// A bounded period, both ends inclusive.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if `start` is after `end`.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Result<Self, ReportError> {
        DateRange::between(start, end)?;
        Ok(Self {
            label: format!("{start}..{end}"),
            start_date: Some(start),
            end_date: end,
        })
    }

    /// Parses `YYYY-MM-DD..YYYY-MM-DD` or a single `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDate` or `InvalidDateRange` for malformed input.
    pub fn parse(input: &str) -> Result<Self, ReportError> {
        match input.split_once("..") {
            Some((start, end)) => Self::between(parse_iso_date(start)?, parse_iso_date(end)?),
            None => Ok(Self::as_of(parse_iso_date(input)?)),
        }
    }

    /// The date range this period covers.
    #[must_use]
    pub fn range(&self) -> DateRange {
        match self.start_date {
            Some(start) => DateRange {
                start: Bound::Included(start),
                end: Bound::Included(self.end_date),
            },
            None => DateRange::as_of(self.end_date),
        }
    }
}

/// Parses an ISO `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `InvalidDate` if the string is not a valid calendar date.
pub fn parse_iso_date(input: &str) -> Result<NaiveDate, ReportError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| ReportError::InvalidDate(input.to_string()))
}

/// Parses an optional ISO date; blank strings count as absent.
///
/// # Errors
///
/// Returns `InvalidDate` if a non-blank string is not a valid date.
pub fn parse_optional_date(input: Option<&str>) -> Result<Option<NaiveDate>, ReportError> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_iso_date(value).map(Some),
    }
}

/// Parses a comma-separated list of periods.
///
/// # Errors
///
/// Returns `NoPeriods` for an empty list, or the first parse error.
pub fn parse_period_list(input: &str) -> Result<Vec<ReportPeriod>, ReportError> {
    let periods = input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ReportPeriod::parse)
        .collect::<Result<Vec<_>, _>>()?;

    if periods.is_empty() {
        return Err(ReportError::NoPeriods);
    }
    Ok(periods)
}

/// Parses a comma-separated list of ISO dates.
///
/// # Errors
///
/// Returns `NoPeriods` for an empty list, or the first parse error.
pub fn parse_date_list(input: &str) -> Result<Vec<NaiveDate>, ReportError> {
    let dates = input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_iso_date)
        .collect::<Result<Vec<_>, _>>()?;

    if dates.is_empty() {
        return Err(ReportError::NoPeriods);
    }
    Ok(dates)
}

/// First day of the month containing `date`.
#[must_use]
pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_between_rejects_inverted_range() {
        let err = DateRange::between(date(2024, 2, 1), date(2024, 1, 31)).unwrap_err();
        assert!(matches!(err, ReportError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_between_single_day_is_valid() {
        let range = DateRange::between(date(2024, 1, 10), date(2024, 1, 10)).unwrap();
        assert!(range.includes(date(2024, 1, 10)));
        assert!(!range.includes(date(2024, 1, 11)));
    }

    #[test]
    fn test_before_excludes_start() {
        let range = DateRange::before(date(2024, 1, 10));
        assert!(range.includes(date(2024, 1, 9)));
        assert!(!range.includes(date(2024, 1, 10)));
        assert_eq!(range.end_date(), Some(date(2024, 1, 9)));
    }

    #[test]
    fn test_preceding_of_bounded_range() {
        let range = DateRange::between(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        assert_eq!(range.preceding(), Some(DateRange::before(date(2024, 1, 1))));
        assert_eq!(DateRange::as_of(date(2024, 1, 31)).preceding(), None);
    }

    #[test]
    fn test_from_dates() {
        assert_eq!(DateRange::from_dates(None, None).unwrap(), DateRange::all());
        assert_eq!(
            DateRange::from_dates(None, Some(date(2024, 1, 31))).unwrap(),
            DateRange::as_of(date(2024, 1, 31))
        );
        let open_ended = DateRange::from_dates(Some(date(2024, 1, 1)), None).unwrap();
        assert!(open_ended.includes(date(2030, 1, 1)));
        assert!(!open_ended.includes(date(2023, 12, 31)));
    }

    #[rstest]
    #[case("2024-01-31", true)]
    #[case(" 2024-01-31 ", true)]
    #[case("2024-02-30", false)]
    #[case("31/01/2024", false)]
    #[case("", false)]
    fn test_parse_iso_date(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(parse_iso_date(input).is_ok(), ok);
    }

    #[test]
    fn test_parse_optional_date() {
        assert_eq!(parse_optional_date(None).unwrap(), None);
        assert_eq!(parse_optional_date(Some("  ")).unwrap(), None);
        assert_eq!(
            parse_optional_date(Some("2024-01-31")).unwrap(),
            Some(date(2024, 1, 31))
        );
        assert!(matches!(
            parse_optional_date(Some("yesterday")),
            Err(ReportError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_parse_period_list() {
        let periods = parse_period_list("2024-01-01..2024-01-31, 2024-02-29").unwrap();
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].start_date, Some(date(2024, 1, 1)));
        assert_eq!(periods[0].label, "2024-01-01..2024-01-31");
        assert_eq!(periods[1].start_date, None);
        assert_eq!(periods[1].end_date, date(2024, 2, 29));

        assert!(matches!(parse_period_list(" , "), Err(ReportError::NoPeriods)));
        assert!(matches!(
            parse_period_list("2024-02-01..2024-01-01"),
            Err(ReportError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_parse_date_list() {
        assert_eq!(
            parse_date_list("2024-01-31,2024-02-29").unwrap(),
            vec![date(2024, 1, 31), date(2024, 2, 29)]
        );
        assert!(matches!(parse_date_list(""), Err(ReportError::NoPeriods)));
        assert!(matches!(
            parse_date_list("2024-01-31,2024-13-01"),
            Err(ReportError::InvalidDate(_))
        ));
    }

    #[rstest]
    #[case(date(2024, 2, 14), date(2024, 2, 1))]
    #[case(date(2024, 2, 1), date(2024, 2, 1))]
    #[case(date(2024, 12, 31), date(2024, 12, 1))]
    fn test_first_day_of_month(#[case] day: NaiveDate, #[case] first: NaiveDate) {
        assert_eq!(first_day_of_month(day), first);
    }

    #[test]
    fn test_fixed_clock() {
        assert_eq!(FixedClock(date(2024, 1, 31)).today(), date(2024, 1, 31));
    }
}
