/// roster - students, payments, ordering and dashboard totals
use chrono::{TimeZone, Utc};
use tuition_dues_rs::chrono::NaiveDate;
use tuition_dues_rs::{
    BillingConfig, Money, NewPayment, PaymentMethod, Roster, SafeTimeProvider, Student, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap()
    ));
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).ok_or("bad date");

    let mut roster = Roster::new(BillingConfig::default())?;

    let asha = roster.add_student(
        Student::builder()
            .full_name("Asha Verma")
            .class_name("5B")
            .admission_date(date(2024, 1, 15)?)
            .monthly_fee(Money::from_major(1000))
            .build()?,
        &time,
    )?;
    let ravi = roster.add_student(
        Student::builder()
            .full_name("Ravi Kumar")
            .class_name("7A")
            .admission_date(date(2024, 3, 31)?)
            .monthly_fee(Money::from_major(1500))
            .build()?,
        &time,
    )?;

    for month in ["2024-01", "2024-02", "2024-03", "2024-04"] {
        let payment = NewPayment::new(month.parse()?, Money::from_major(1000), date(2024, 5, 2)?, PaymentMethod::Online);
        roster.record_payment(asha, payment, &time)?;
    }

    // ravi first in the list
    roster.move_student(ravi, asha, &time)?;

    for row in roster.rows_as_of(&time) {
        println!(
            "#{} {:<12} {:<14} due {}",
            row.sort_order, row.full_name, row.due.fee_status_label, row.due.total_due_amount
        );
    }

    println!("\n{}", serde_json::to_string_pretty(&roster.summary_as_of(&time)?)?);
    println!("\nevents recorded: {}", roster.events.events().len());

    Ok(())
}
