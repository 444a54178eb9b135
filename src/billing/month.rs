use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{DuesError, Result};

/// label shown for a stored month id that cannot be parsed
pub const INVALID_MONTH_LABEL: &str = "Invalid Month";

/// calendar month identifier, canonical form `YYYY-MM`
///
/// Backed by the first day of the month so ordering is plain calendar order
/// and every id is a month chrono can represent. Years past 9999 take more
/// digits and years before 0 a leading `-`, so every id survives its own
/// text form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthId(NaiveDate);

impl MonthId {
    /// create from year and 1-based month
    pub fn new(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(MonthId)
            .ok_or_else(|| DuesError::InvalidMonthId {
                value: format!("{year:04}-{month:02}"),
            })
    }

    /// month containing the given date
    pub fn of(date: NaiveDate) -> Self {
        // day 1 exists in every month
        MonthId(date.with_day(1).unwrap_or(date))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// first calendar day of the month
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// following month, `None` past the end of the calendar
    pub fn next(&self) -> Option<MonthId> {
        self.plus_months(1)
    }

    pub fn plus_months(&self, months: u32) -> Option<MonthId> {
        self.0.checked_add_months(Months::new(months)).map(MonthId)
    }

    /// display label, e.g. "March 2024"
    pub fn label(&self) -> String {
        self.0.format("%B %Y").to_string()
    }
}

impl fmt::Display for MonthId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year = self.year();
        let sign = if year < 0 { "-" } else { "" };
        write!(f, "{sign}{:04}-{:02}", year.unsigned_abs(), self.month())
    }
}

impl FromStr for MonthId {
    type Err = DuesError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || DuesError::InvalidMonthId {
            value: s.to_string(),
        };

        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (year, month) = body.split_once('-').ok_or_else(invalid)?;
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        // four digits, or more without zero padding
        let canonical_year = year.len() == 4 || (year.len() > 4 && !year.starts_with('0'));
        if !canonical_year || month.len() != 2 || !all_digits(year) || !all_digits(month) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        if negative && year == 0 {
            return Err(invalid());
        }
        let year = if negative { -year } else { year };
        let month: u32 = month.parse().map_err(|_| invalid())?;
        MonthId::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for MonthId {
    type Error = DuesError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<MonthId> for String {
    fn from(month: MonthId) -> Self {
        month.to_string()
    }
}

/// render a stored month id as its label, or [`INVALID_MONTH_LABEL`]
pub fn format_month_label(raw: &str) -> String {
    raw.parse::<MonthId>()
        .map(|month| month.label())
        .unwrap_or_else(|_| INVALID_MONTH_LABEL.to_string())
}
