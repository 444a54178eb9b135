/// serializable projections of the roster
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::billing::DueInfo;
use crate::decimal::Money;
use crate::errors::{DuesError, Result};
use crate::student::{Payment, Student};
use crate::types::StudentId;

/// one roster line: the student record joined with its dues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRow {
    pub id: StudentId,
    pub full_name: String,
    pub father_name: String,
    pub class_name: String,
    pub mobile_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_notes: Option<String>,
    pub sort_order: u32,
    pub admission_date: NaiveDate,
    /// fee the dues were computed with
    pub monthly_fee: Money,
    pub payments: Vec<Payment>,
    #[serde(flatten)]
    pub due: DueInfo,
}

impl StudentRow {
    pub fn from_student(student: &Student, sort_order: u32, monthly_fee: Money, due: DueInfo) -> Self {
        Self {
            id: student.id,
            full_name: student.full_name.clone(),
            father_name: student.father_name.clone(),
            class_name: student.class_name.clone(),
            mobile_number: student.mobile_number.clone(),
            profile_picture_url: student.profile_picture_url.clone(),
            student_notes: student.student_notes.clone(),
            sort_order,
            admission_date: student.admission_date,
            monthly_fee,
            payments: student.payments.clone(),
            due,
        }
    }
}

/// dashboard totals across the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSummary {
    pub total_students: usize,
    pub students_with_outstanding_dues: usize,
    /// every payment ever received
    pub total_paid_amount: Money,
    pub total_due_amount: Money,
}

impl RosterSummary {
    pub fn from_rows(rows: &[StudentRow]) -> Result<Self> {
        let overflow = |context: &str| DuesError::AmountOverflow {
            context: context.to_string(),
        };
        let total_paid_amount = Money::checked_sum(
            rows.iter()
                .flat_map(|row| row.payments.iter())
                .map(|payment| payment.amount_paid),
        )
        .ok_or_else(|| overflow("roster total paid"))?;
        let total_due_amount = Money::checked_sum(rows.iter().map(|row| row.due.total_due_amount))
            .ok_or_else(|| overflow("roster total due"))?;

        Ok(Self {
            total_students: rows.len(),
            students_with_outstanding_dues: rows.iter().filter(|row| row.due.has_outstanding()).count(),
            total_paid_amount,
            total_due_amount,
        })
    }
}
