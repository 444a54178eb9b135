use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::billing::calendar::{parse_calendar_date, MonthSpan};
use crate::billing::month::MonthId;
use crate::errors::DateRole;

/// months past the reference month that may be paid in advance
pub const DEFAULT_ADVANCE_MONTHS: u32 = 24;

/// one selectable month for crediting a payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthOption {
    pub value: MonthId,
    pub label: String,
}

impl From<MonthId> for MonthOption {
    fn from(month: MonthId) -> Self {
        Self {
            value: month,
            label: month.label(),
        }
    }
}

/// lists the months a payment can be credited against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingMonthEnumerator {
    advance_months: u32,
}

impl Default for BillingMonthEnumerator {
    fn default() -> Self {
        Self::new(DEFAULT_ADVANCE_MONTHS)
    }
}

impl BillingMonthEnumerator {
    pub fn new(advance_months: u32) -> Self {
        Self { advance_months }
    }

    pub fn advance_months(&self) -> u32 {
        self.advance_months
    }

    /// admission month through `advance_months` past the reference month
    pub fn enumerate(&self, admission: NaiveDate, reference: NaiveDate) -> Vec<MonthOption> {
        let Some(last) = MonthId::of(reference).plus_months(self.advance_months) else {
            return Vec::new();
        };

        MonthSpan::new(MonthId::of(admission), last)
            .map(MonthOption::from)
            .collect()
    }

    /// same as [`enumerate`](Self::enumerate) over raw strings, empty when either is invalid
    pub fn enumerate_from_input(&self, admission: &str, reference: &str) -> Vec<MonthOption> {
        let admission = parse_calendar_date(admission, DateRole::Admission);
        let reference = parse_calendar_date(reference, DateRole::Reference);

        match (admission, reference) {
            (Ok(admission), Ok(reference)) => self.enumerate(admission, reference),
            _ => Vec::new(),
        }
    }
}
