/// quick start - dues for one student
use tuition_dues_rs::chrono::NaiveDate;
use tuition_dues_rs::{DueCalculator, Money, MonthId};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let admission = NaiveDate::from_ymd_opt(2024, 1, 15).ok_or("bad admission date")?;
    let reference = NaiveDate::from_ymd_opt(2024, 5, 20).ok_or("bad reference date")?;

    // january and march are paid
    let paid: Vec<MonthId> = vec!["2024-01".parse()?, "2024-03".parse()?];

    let info = DueCalculator::new().compute(admission, &paid, Money::from_major(1000), reference)?;

    println!("status: {} ({})", info.fee_status_label, info.fee_status_type);
    println!("due months: {:?}", info.due_months.iter().map(|m| m.to_string()).collect::<Vec<_>>());
    println!("total due: {}", info.total_due_amount);
    println!("{}", serde_json::to_string_pretty(&info)?);

    Ok(())
}
