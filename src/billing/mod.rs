pub mod calendar;
pub mod due;
pub mod enumerator;
pub mod month;
pub mod status;

pub use calendar::{cycle_due_date, parse_calendar_date, reference_date, MonthSpan};
pub use due::{DueCalculator, DueInfo};
pub use enumerator::{BillingMonthEnumerator, MonthOption, DEFAULT_ADVANCE_MONTHS};
pub use month::{format_month_label, MonthId, INVALID_MONTH_LABEL};
pub use status::{FeeStatus, FeeStatusType, DESTRUCTIVE_THRESHOLD};

/// anything that credits a billing month as paid
///
/// Matching is by month identifier only; amounts and payment dates play no part.
pub trait CreditedMonth {
    fn credited_month(&self) -> MonthId;
}

impl CreditedMonth for MonthId {
    fn credited_month(&self) -> MonthId {
        *self
    }
}
