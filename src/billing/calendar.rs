use chrono::{DateTime, Days, Months, NaiveDate};
use hourglass_rs::SafeTimeProvider;

use crate::billing::month::MonthId;
use crate::errors::{DateRole, DuesError, Result};

/// ascending walk over calendar months, both ends inclusive
#[derive(Debug, Clone)]
pub struct MonthSpan {
    next: Option<MonthId>,
    last: MonthId,
}

impl MonthSpan {
    pub fn new(first: MonthId, last: MonthId) -> Self {
        Self {
            next: Some(first),
            last,
        }
    }
}

impl Iterator for MonthSpan {
    type Item = MonthId;

    fn next(&mut self) -> Option<MonthId> {
        let current = self.next.filter(|month| *month <= self.last)?;
        self.next = current.next();
        Some(current)
    }
}

impl std::iter::FusedIterator for MonthSpan {}

/// date on which the fee attributed to `month` becomes payable
///
/// The cycle anchor is `billing_day` of `month`, rolling into the following
/// month when the day does not exist (April 31 is May 1). The anchor is then
/// moved forward one month, clamping to the last day of the target month
/// (January 31 becomes February 29 in a leap year).
pub fn cycle_due_date(month: MonthId, billing_day: u32) -> Result<NaiveDate> {
    let out_of_range = || {
        DuesError::invalid_date(
            DateRole::DueDate,
            format!("cycle {month} with billing day {billing_day} is outside the calendar"),
        )
    };

    let offset = Days::new(u64::from(billing_day.saturating_sub(1)));
    let anchor = month
        .first_day()
        .checked_add_days(offset)
        .ok_or_else(out_of_range)?;

    anchor.checked_add_months(Months::new(1)).ok_or_else(out_of_range)
}

/// parse an ISO calendar date (`2024-01-15`) or an RFC 3339 timestamp
///
/// Timestamps resolve to the calendar date in their own offset.
pub fn parse_calendar_date(input: &str, role: DateRole) -> Result<NaiveDate> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|timestamp| timestamp.date_naive())
        .map_err(|_| DuesError::invalid_date(role, format!("{input:?} is not a calendar date")))
}

/// today's UTC calendar date from the injected clock
pub fn reference_date(time: &SafeTimeProvider) -> NaiveDate {
    time.now().date_naive()
}
