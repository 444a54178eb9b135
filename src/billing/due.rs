use chrono::{Datelike, NaiveDate};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::billing::calendar::{cycle_due_date, parse_calendar_date, reference_date, MonthSpan};
use crate::billing::month::MonthId;
use crate::billing::status::{FeeStatus, FeeStatusType};
use crate::billing::CreditedMonth;
use crate::decimal::Money;
use crate::errors::{DateRole, DuesError, Result};

/// dues owed by one student as of a reference date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueInfo {
    /// unpaid months whose due date has passed, ascending
    pub due_months: Vec<MonthId>,
    pub due_months_count: usize,
    pub total_due_amount: Money,
    /// at least one billing cycle has come due
    pub payment_cycle_has_started: bool,
    pub fee_status_label: String,
    pub fee_status_type: FeeStatusType,
}

impl DueInfo {
    /// all-zero result tagged with an error status
    pub fn degraded(error: &DuesError) -> Self {
        let label = match error {
            DuesError::InvalidDate { role: DateRole::Admission, .. } => "Invalid Admission Date",
            DuesError::InvalidDate { role: DateRole::Reference, .. } => "Invalid Reference Date",
            _ => "Error",
        };

        Self {
            due_months: Vec::new(),
            due_months_count: 0,
            total_due_amount: Money::ZERO,
            payment_cycle_has_started: false,
            fee_status_label: label.to_string(),
            fee_status_type: FeeStatusType::Error,
        }
    }

    /// true for a degraded result, never for a computed one
    pub fn is_error(&self) -> bool {
        self.fee_status_type == FeeStatusType::Error
    }

    pub fn has_outstanding(&self) -> bool {
        self.total_due_amount.is_positive()
    }
}

/// result of walking the billing cycles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CycleScan {
    due_months: Vec<MonthId>,
    cycle_started: bool,
}

impl CycleScan {
    fn with_due_cycle(self, month: MonthId, paid: bool) -> Self {
        let mut due_months = self.due_months;
        if !paid {
            due_months.push(month);
        }
        Self {
            due_months,
            cycle_started: true,
        }
    }
}

/// anniversary billing due calculator
///
/// The admission day-of-month fixes the billing day. The fee for month `M`
/// falls due on that day of the month after `M`; any due month without a
/// payment credited to it is owed at the current monthly fee.
#[derive(Debug, Clone, Copy, Default)]
pub struct DueCalculator;

impl DueCalculator {
    pub fn new() -> Self {
        Self
    }

    /// compute dues as of `reference`
    pub fn compute<P: CreditedMonth>(
        &self,
        admission: NaiveDate,
        payments: &[P],
        monthly_fee: Money,
        reference: NaiveDate,
    ) -> Result<DueInfo> {
        let paid: BTreeSet<MonthId> = payments.iter().map(CreditedMonth::credited_month).collect();
        let billing_day = admission.day();

        let scan = MonthSpan::new(MonthId::of(admission), MonthId::of(reference)).try_fold(
            CycleScan::default(),
            |scan, month| -> Result<CycleScan> {
                let due_date = cycle_due_date(month, billing_day)?;
                if reference < due_date {
                    return Ok(scan);
                }
                Ok(scan.with_due_cycle(month, paid.contains(&month)))
            },
        )?;

        let mut due_months = scan.due_months;
        due_months.sort_unstable();
        due_months.dedup();

        let due_months_count = due_months.len();
        let total_due_amount = monthly_fee.checked_times(due_months_count).ok_or_else(|| {
            DuesError::AmountOverflow {
                context: format!("{due_months_count} months at {monthly_fee}"),
            }
        })?;
        let status = FeeStatus::classify(due_months_count, scan.cycle_started);

        Ok(DueInfo {
            due_months,
            due_months_count,
            total_due_amount,
            payment_cycle_has_started: scan.cycle_started,
            fee_status_label: status.label,
            fee_status_type: status.kind,
        })
    }

    /// compute dues as of today on the injected clock
    pub fn compute_as_of<P: CreditedMonth>(
        &self,
        admission: NaiveDate,
        payments: &[P],
        monthly_fee: Money,
        time: &SafeTimeProvider,
    ) -> Result<DueInfo> {
        self.compute(admission, payments, monthly_fee, reference_date(time))
    }

    /// compute dues from raw date strings as stored by the record layer
    pub fn compute_from_input<P: CreditedMonth>(
        &self,
        admission: &str,
        payments: &[P],
        monthly_fee: Money,
        reference: &str,
    ) -> Result<DueInfo> {
        let admission = parse_calendar_date(admission, DateRole::Admission)?;
        let reference = parse_calendar_date(reference, DateRole::Reference)?;
        self.compute(admission, payments, monthly_fee, reference)
    }

    /// like [`compute_from_input`](Self::compute_from_input) but never fails,
    /// invalid input yields [`DueInfo::degraded`]
    pub fn compute_or_degraded<P: CreditedMonth>(
        &self,
        admission: &str,
        payments: &[P],
        monthly_fee: Money,
        reference: &str,
    ) -> DueInfo {
        self.compute_from_input(admission, payments, monthly_fee, reference)
            .unwrap_or_else(|err| DueInfo::degraded(&err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(raw: &str) -> MonthId {
        raw.parse().unwrap()
    }

    fn months(ids: &[MonthId]) -> Vec<String> {
        ids.iter().map(|m| m.to_string()).collect()
    }

    const NO_PAYMENTS: &[MonthId] = &[];

    #[test]
    fn test_not_due_before_first_due_date() {
        let calc = DueCalculator::new();
        let info = calc
            .compute(date(2024, 1, 15), NO_PAYMENTS, Money::from_major(1000), date(2024, 2, 10))
            .unwrap();

        assert_eq!(info.due_months_count, 0);
        assert!(info.due_months.is_empty());
        assert_eq!(info.total_due_amount, Money::ZERO);
        assert!(!info.payment_cycle_has_started);
        assert_eq!(info.fee_status_label, "Not Due Yet");
        assert_eq!(info.fee_status_type, FeeStatusType::Info);
    }

    #[test]
    fn test_first_cycle_due_after_due_date() {
        let calc = DueCalculator::new();
        let info = calc
            .compute(date(2024, 1, 15), NO_PAYMENTS, Money::from_major(1000), date(2024, 2, 20))
            .unwrap();

        assert_eq!(months(&info.due_months), vec!["2024-01"]);
        assert_eq!(info.due_months_count, 1);
        assert_eq!(info.total_due_amount, Money::from_major(1000));
        assert_eq!(info.fee_status_label, "1 Month Due");
        assert_eq!(info.fee_status_type, FeeStatusType::Warning);
    }

    #[test]
    fn test_paid_cycle_reports_paid() {
        let calc = DueCalculator::new();
        let paid = [month("2024-01")];
        let info = calc
            .compute(date(2024, 1, 15), &paid, Money::from_major(1000), date(2024, 2, 20))
            .unwrap();

        assert_eq!(info.due_months_count, 0);
        assert!(info.payment_cycle_has_started);
        assert_eq!(info.fee_status_label, "Paid");
        assert_eq!(info.fee_status_type, FeeStatusType::Success);
    }

    #[test]
    fn test_due_on_the_due_date_itself() {
        let calc = DueCalculator::new();
        let info = calc
            .compute(date(2024, 1, 15), NO_PAYMENTS, Money::from_major(1000), date(2024, 2, 15))
            .unwrap();
        assert_eq!(months(&info.due_months), vec!["2024-01"]);

        let info = calc
            .compute(date(2024, 1, 15), NO_PAYMENTS, Money::from_major(1000), date(2024, 2, 14))
            .unwrap();
        assert_eq!(info.due_months_count, 0);
    }

    #[test]
    fn test_end_of_month_admission_in_leap_year() {
        // jan cycle for a 31st admission falls due on feb 29 2024
        assert_eq!(cycle_due_date(month("2024-01"), 31).unwrap(), date(2024, 2, 29));

        let calc = DueCalculator::new();
        let fee = Money::from_major(1200);

        let info = calc.compute(date(2024, 1, 31), NO_PAYMENTS, fee, date(2024, 2, 28)).unwrap();
        assert_eq!(info.due_months_count, 0);
        assert_eq!(info.fee_status_label, "Not Due Yet");

        let info = calc.compute(date(2024, 1, 31), NO_PAYMENTS, fee, date(2024, 2, 29)).unwrap();
        assert_eq!(months(&info.due_months), vec!["2024-01"]);

        // feb cycle anchors on feb 31 -> mar 2, due apr 2; not yet due on mar 5
        let info = calc.compute(date(2024, 1, 31), NO_PAYMENTS, fee, date(2024, 3, 5)).unwrap();
        assert_eq!(months(&info.due_months), vec!["2024-01"]);
        assert_eq!(info.total_due_amount, fee);
    }

    #[test]
    fn test_end_of_month_admission_in_common_year() {
        assert_eq!(cycle_due_date(month("2023-01"), 31).unwrap(), date(2023, 2, 28));

        let calc = DueCalculator::new();
        let fee = Money::from_major(1200);

        let info = calc.compute(date(2023, 1, 31), NO_PAYMENTS, fee, date(2023, 2, 27)).unwrap();
        assert_eq!(info.due_months_count, 0);

        let info = calc.compute(date(2023, 1, 31), NO_PAYMENTS, fee, date(2023, 2, 28)).unwrap();
        assert_eq!(months(&info.due_months), vec!["2023-01"]);

        let info = calc.compute(date(2023, 1, 31), NO_PAYMENTS, fee, date(2023, 3, 5)).unwrap();
        assert_eq!(months(&info.due_months), vec!["2023-01"]);
    }

    #[test]
    fn test_four_unpaid_months_are_destructive() {
        let calc = DueCalculator::new();
        let info = calc
            .compute(date(2024, 1, 10), NO_PAYMENTS, Money::from_major(1000), date(2024, 5, 10))
            .unwrap();

        assert_eq!(months(&info.due_months), vec!["2024-01", "2024-02", "2024-03", "2024-04"]);
        assert_eq!(info.total_due_amount, Money::from_major(4000));
        assert_eq!(info.fee_status_label, "4 Months Due");
        assert_eq!(info.fee_status_type, FeeStatusType::Destructive);
    }

    #[test]
    fn test_gaps_between_payments_are_due() {
        let calc = DueCalculator::new();
        let paid = [month("2024-02"), month("2024-04")];
        let info = calc
            .compute(date(2024, 1, 5), &paid, Money::from_decimal(dec!(850.50)), date(2024, 6, 1))
            .unwrap();

        assert_eq!(months(&info.due_months), vec!["2024-01", "2024-03"]);
        assert_eq!(info.total_due_amount, Money::from_decimal(dec!(1701.00)));
        assert_eq!(info.fee_status_label, "2 Months Due");
        assert_eq!(info.fee_status_type, FeeStatusType::Warning);
    }

    #[test]
    fn test_advance_and_duplicate_payments_are_ignored() {
        let calc = DueCalculator::new();
        // future month and a duplicate credit do not change dues
        let paid = [month("2024-01"), month("2024-01"), month("2025-06")];
        let info = calc
            .compute(date(2024, 1, 15), &paid, Money::from_major(1000), date(2024, 3, 20))
            .unwrap();

        assert_eq!(months(&info.due_months), vec!["2024-02"]);
    }

    #[test]
    fn test_payment_before_admission_month_is_ignored() {
        let calc = DueCalculator::new();
        let paid = [month("2023-12")];
        let info = calc
            .compute(date(2024, 1, 15), &paid, Money::from_major(1000), date(2024, 2, 20))
            .unwrap();
        assert_eq!(months(&info.due_months), vec!["2024-01"]);
    }

    #[test]
    fn test_reference_before_admission() {
        let calc = DueCalculator::new();
        let info = calc
            .compute(date(2024, 6, 1), NO_PAYMENTS, Money::from_major(1000), date(2024, 1, 1))
            .unwrap();
        assert_eq!(info.due_months_count, 0);
        assert_eq!(info.fee_status_label, "Not Due Yet");
    }

    #[test]
    fn test_current_fee_applies_to_all_due_months() {
        let calc = DueCalculator::new();
        let admission = date(2024, 1, 1);
        let reference = date(2024, 4, 1);

        let old = calc.compute(admission, NO_PAYMENTS, Money::from_major(1000), reference).unwrap();
        let new = calc.compute(admission, NO_PAYMENTS, Money::from_major(1500), reference).unwrap();

        assert_eq!(old.due_months, new.due_months);
        assert_eq!(new.total_due_amount, Money::from_major(4500));
    }

    #[test]
    fn test_total_beyond_decimal_range_is_an_error() {
        let calc = DueCalculator::new();
        let fee = Money::from_decimal(Decimal::MAX);

        let err = calc.compute(date(2024, 1, 15), NO_PAYMENTS, fee, date(2024, 4, 20)).unwrap_err();
        assert!(matches!(err, DuesError::AmountOverflow { .. }));

        // a single due month still fits
        let info = calc.compute(date(2024, 1, 15), NO_PAYMENTS, fee, date(2024, 2, 20)).unwrap();
        assert_eq!(info.total_due_amount, fee);

        let degraded = calc.compute_or_degraded("2024-01-15", NO_PAYMENTS, fee, "2024-04-20");
        assert!(degraded.is_error());
        assert_eq!(degraded.fee_status_label, "Error");
    }

    #[test]
    fn test_from_input_reports_invalid_dates() {
        let calc = DueCalculator::new();
        let fee = Money::from_major(1000);

        let err = calc.compute_from_input("2024-02-30", NO_PAYMENTS, fee, "2024-03-01").unwrap_err();
        assert!(matches!(err, DuesError::InvalidDate { role: DateRole::Admission, .. }));

        let err = calc.compute_from_input("2024-01-15", NO_PAYMENTS, fee, "yesterday").unwrap_err();
        assert!(matches!(err, DuesError::InvalidDate { role: DateRole::Reference, .. }));

        let info = calc.compute_from_input("2024-01-15", NO_PAYMENTS, fee, "2024-02-20").unwrap();
        assert_eq!(info.due_months_count, 1);
    }

    #[test]
    fn test_degraded_result_is_distinguishable() {
        let calc = DueCalculator::new();
        let fee = Money::from_major(1000);

        let degraded = calc.compute_or_degraded("n/a", NO_PAYMENTS, fee, "2024-02-20");
        assert!(degraded.is_error());
        assert_eq!(degraded.fee_status_label, "Invalid Admission Date");
        assert_eq!(degraded.due_months_count, 0);

        let degraded = calc.compute_or_degraded("2024-01-15", NO_PAYMENTS, fee, "n/a");
        assert_eq!(degraded.fee_status_label, "Invalid Reference Date");

        // a genuine zero-dues result is not an error
        let genuine = calc.compute_or_degraded("2024-01-15", NO_PAYMENTS, fee, "2024-02-10");
        assert!(!genuine.is_error());
        assert_eq!(genuine.due_months_count, degraded.due_months_count);
        assert_ne!(genuine, degraded);
    }

    #[test]
    fn test_compute_as_of_clock() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 2, 10, 12, 0, 0).unwrap()
        ));
        let control = time.test_control().unwrap();
        let calc = DueCalculator::new();
        let fee = Money::from_major(1000);

        let info = calc.compute_as_of(date(2024, 1, 15), NO_PAYMENTS, fee, &time).unwrap();
        assert_eq!(info.fee_status_label, "Not Due Yet");

        control.advance(chrono::Duration::days(5));
        let info = calc.compute_as_of(date(2024, 1, 15), NO_PAYMENTS, fee, &time).unwrap();
        assert_eq!(info.fee_status_label, "1 Month Due");

        control.advance(chrono::Duration::days(90));
        let info = calc.compute_as_of(date(2024, 1, 15), NO_PAYMENTS, fee, &time).unwrap();
        assert_eq!(info.fee_status_label, "4 Months Due");
    }

    #[test]
    fn test_serializes_with_record_field_names() {
        let calc = DueCalculator::new();
        let info = calc
            .compute(date(2024, 1, 15), NO_PAYMENTS, Money::from_major(1000), date(2024, 2, 20))
            .unwrap();

        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["dueMonths"], serde_json::json!(["2024-01"]));
        assert_eq!(value["dueMonthsCount"], 1);
        assert_eq!(value["feeStatusLabel"], "1 Month Due");
        assert_eq!(value["feeStatusType"], "warning");
        assert_eq!(value["paymentCycleHasStarted"], true);
    }
}
