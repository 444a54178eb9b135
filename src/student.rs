use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::billing::{BillingMonthEnumerator, CreditedMonth, DueCalculator, DueInfo, MonthId, MonthOption};
use crate::decimal::Money;
use crate::errors::{DuesError, Result};
use crate::types::{PaymentId, PaymentMethod, StudentId};

/// a recorded fee payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    /// day the money was received, informational only
    pub date_of_payment: NaiveDate,
    pub payment_method: PaymentMethod,
    /// billing month this payment is credited against
    pub month_paid_for: MonthId,
    /// not checked against the monthly fee
    pub amount_paid: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CreditedMonth for Payment {
    fn credited_month(&self) -> MonthId {
        self.month_paid_for
    }
}

/// payment details as entered, before an id is assigned
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub date_of_payment: NaiveDate,
    pub payment_method: PaymentMethod,
    pub month_paid_for: MonthId,
    pub amount_paid: Money,
    pub notes: Option<String>,
}

impl NewPayment {
    pub fn new(
        month_paid_for: MonthId,
        amount_paid: Money,
        date_of_payment: NaiveDate,
        payment_method: PaymentMethod,
    ) -> Self {
        Self {
            date_of_payment,
            payment_method,
            month_paid_for,
            amount_paid,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.amount_paid.is_positive() {
            return Err(DuesError::InvalidPaymentAmount {
                amount: self.amount_paid,
            });
        }
        Ok(())
    }

    pub(crate) fn into_payment(self, id: PaymentId) -> Payment {
        Payment {
            id,
            date_of_payment: self.date_of_payment,
            payment_method: self.payment_method,
            month_paid_for: self.month_paid_for,
            amount_paid: self.amount_paid,
            notes: self.notes,
        }
    }
}

/// student record with its payment history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub full_name: String,
    #[serde(default)]
    pub father_name: String,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub mobile_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    /// anchors the billing day; fixed once the student is added
    pub admission_date: NaiveDate,
    /// current fee, applied to every outstanding month
    pub monthly_fee: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_notes: Option<String>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    /// display position, absent on records that predate ordering
    #[serde(default)]
    pub sort_order: Option<u32>,
}

impl Student {
    pub fn builder() -> StudentBuilder {
        StudentBuilder::new()
    }

    /// credited months, sorted, duplicates kept
    pub fn paid_months(&self) -> Vec<MonthId> {
        let mut months: Vec<MonthId> = self.payments.iter().map(|p| p.month_paid_for).collect();
        months.sort_unstable();
        months
    }

    /// sum of every amount received
    pub fn total_paid(&self) -> Result<Money> {
        Money::checked_sum(self.payments.iter().map(|p| p.amount_paid)).ok_or_else(|| {
            DuesError::AmountOverflow {
                context: format!("payments of student {}", self.id),
            }
        })
    }

    pub fn payment(&self, id: PaymentId) -> Option<&Payment> {
        self.payments.iter().find(|p| p.id == id)
    }

    pub fn has_payment_for(&self, month: MonthId) -> bool {
        self.payments.iter().any(|p| p.month_paid_for == month)
    }

    /// stored fee, or `fallback` when the stored fee is not positive
    pub fn effective_fee(&self, fallback: Money) -> Money {
        if self.monthly_fee.is_positive() {
            self.monthly_fee
        } else {
            fallback
        }
    }

    /// dues as of `reference` at the given fee
    pub fn due_info(&self, monthly_fee: Money, reference: NaiveDate) -> Result<DueInfo> {
        DueCalculator::new().compute(self.admission_date, &self.payments, monthly_fee, reference)
    }

    /// months this student can be credited for
    pub fn payable_months(
        &self,
        enumerator: &BillingMonthEnumerator,
        reference: NaiveDate,
    ) -> Vec<MonthOption> {
        enumerator.enumerate(self.admission_date, reference)
    }
}

/// student details as entered, before an id and position are assigned
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub full_name: String,
    pub father_name: String,
    pub class_name: String,
    pub mobile_number: String,
    pub profile_picture_url: Option<String>,
    pub admission_date: NaiveDate,
    pub monthly_fee: Money,
    pub student_notes: Option<String>,
}

impl NewStudent {
    pub(crate) fn into_student(self, id: StudentId, sort_order: u32) -> Student {
        Student {
            id,
            full_name: self.full_name,
            father_name: self.father_name,
            class_name: self.class_name,
            mobile_number: self.mobile_number,
            profile_picture_url: self.profile_picture_url,
            admission_date: self.admission_date,
            monthly_fee: self.monthly_fee,
            student_notes: self.student_notes,
            payments: Vec::new(),
            sort_order: Some(sort_order),
        }
    }
}

/// builder for new students
#[derive(Debug, Clone, Default)]
pub struct StudentBuilder {
    full_name: Option<String>,
    father_name: Option<String>,
    class_name: Option<String>,
    mobile_number: Option<String>,
    profile_picture_url: Option<String>,
    admission_date: Option<NaiveDate>,
    monthly_fee: Option<Money>,
    student_notes: Option<String>,
}

impl StudentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }

    pub fn father_name(mut self, name: impl Into<String>) -> Self {
        self.father_name = Some(name.into());
        self
    }

    pub fn class_name(mut self, class: impl Into<String>) -> Self {
        self.class_name = Some(class.into());
        self
    }

    pub fn mobile_number(mut self, number: impl Into<String>) -> Self {
        self.mobile_number = Some(number.into());
        self
    }

    pub fn profile_picture_url(mut self, url: impl Into<String>) -> Self {
        self.profile_picture_url = Some(url.into());
        self
    }

    pub fn admission_date(mut self, date: NaiveDate) -> Self {
        self.admission_date = Some(date);
        self
    }

    pub fn monthly_fee(mut self, fee: Money) -> Self {
        self.monthly_fee = Some(fee);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.student_notes = Some(notes.into());
        self
    }

    /// validate and produce the new student
    pub fn build(self) -> Result<NewStudent> {
        let full_name = self
            .full_name
            .filter(|name| !name.trim().is_empty())
            .ok_or(DuesError::MissingField { field: "full_name" })?;
        let admission_date = self
            .admission_date
            .ok_or(DuesError::MissingField { field: "admission_date" })?;
        let monthly_fee = self
            .monthly_fee
            .ok_or(DuesError::MissingField { field: "monthly_fee" })?;

        if !monthly_fee.is_positive() {
            return Err(DuesError::InvalidFee { fee: monthly_fee });
        }

        Ok(NewStudent {
            full_name,
            father_name: self.father_name.unwrap_or_default(),
            class_name: self.class_name.unwrap_or_default(),
            mobile_number: self.mobile_number.unwrap_or_default(),
            profile_picture_url: self.profile_picture_url,
            admission_date,
            monthly_fee,
            student_notes: self.student_notes,
        })
    }
}

/// editable student fields; the admission date is not among them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentUpdate {
    pub full_name: Option<String>,
    pub father_name: Option<String>,
    pub class_name: Option<String>,
    pub mobile_number: Option<String>,
    pub profile_picture_url: Option<String>,
    pub monthly_fee: Option<Money>,
    pub student_notes: Option<String>,
}

impl StudentUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }

    pub fn class_name(mut self, class: impl Into<String>) -> Self {
        self.class_name = Some(class.into());
        self
    }

    pub fn mobile_number(mut self, number: impl Into<String>) -> Self {
        self.mobile_number = Some(number.into());
        self
    }

    pub fn monthly_fee(mut self, fee: Money) -> Self {
        self.monthly_fee = Some(fee);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.student_notes = Some(notes.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(fee) = self.monthly_fee {
            if !fee.is_positive() {
                return Err(DuesError::InvalidFee { fee });
            }
        }
        if matches!(&self.full_name, Some(name) if name.trim().is_empty()) {
            return Err(DuesError::MissingField { field: "full_name" });
        }
        Ok(())
    }

    /// apply to a student, returning the previous fee when it changed
    pub(crate) fn apply(self, student: &mut Student) -> Option<Money> {
        if let Some(name) = self.full_name {
            student.full_name = name;
        }
        if let Some(name) = self.father_name {
            student.father_name = name;
        }
        if let Some(class) = self.class_name {
            student.class_name = class;
        }
        if let Some(number) = self.mobile_number {
            student.mobile_number = number;
        }
        if let Some(url) = self.profile_picture_url {
            student.profile_picture_url = Some(url);
        }
        if let Some(notes) = self.student_notes {
            student.student_notes = Some(notes);
        }

        match self.monthly_fee {
            Some(fee) if fee != student.monthly_fee => {
                Some(std::mem::replace(&mut student.monthly_fee, fee))
            }
            _ => None,
        }
    }
}
