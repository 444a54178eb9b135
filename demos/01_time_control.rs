/// time control - watch dues accumulate on a controlled clock
use chrono::{Duration, TimeZone, Utc};
use tuition_dues_rs::chrono::NaiveDate;
use tuition_dues_rs::{DueCalculator, Money, MonthId, SafeTimeProvider, TimeSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== time control example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 31, 9, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    // admitted on the 31st, so cycles clamp at short months
    let admission = NaiveDate::from_ymd_opt(2024, 1, 31).ok_or("bad admission date")?;
    let fee = Money::from_major(1200);
    let calc = DueCalculator::new();
    let no_payments: &[MonthId] = &[];

    for _ in 0..8 {
        let info = calc.compute_as_of(admission, no_payments, fee, &time)?;
        println!(
            "{}: {:<14} owed {}",
            time.now().format("%Y-%m-%d"),
            info.fee_status_label,
            info.total_due_amount
        );
        controller.advance(Duration::days(15));
    }

    Ok(())
}
