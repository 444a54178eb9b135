pub mod views;

use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::billing::{reference_date, DueInfo, MonthOption};
use crate::config::BillingConfig;
use crate::decimal::Money;
use crate::errors::{DuesError, Result};
use crate::events::{Event, EventStore};
use crate::student::{NewPayment, NewStudent, Student, StudentUpdate};
use crate::types::{PaymentId, StudentId};

pub use views::{RosterSummary, StudentRow};

/// ordered collection of students and their payments
///
/// Feeds student records to the due calculator and keeps a stable display
/// order. Every mutation emits an [`Event`].
#[derive(Debug)]
pub struct Roster {
    config: BillingConfig,
    students: Vec<Student>,
    pub events: EventStore,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    config: &'a BillingConfig,
    students: &'a [Student],
}

#[derive(Deserialize)]
struct Snapshot {
    #[serde(default)]
    config: BillingConfig,
    #[serde(default)]
    students: Vec<Student>,
}

impl Roster {
    /// create an empty roster
    pub fn new(config: BillingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            students: Vec::new(),
            events: EventStore::new(),
        })
    }

    /// load existing records, giving unordered ones their position
    pub fn from_students(config: BillingConfig, students: Vec<Student>) -> Result<Self> {
        let mut roster = Self::new(config)?;
        roster.students = students;

        for (index, student) in roster.students.iter_mut().enumerate() {
            if student.sort_order.is_none() {
                student.sort_order = Some(index as u32);
            }
        }
        roster.students.sort_by_key(|s| s.sort_order);

        debug!(count = roster.students.len(), "roster loaded");
        Ok(roster)
    }

    pub fn config(&self) -> &BillingConfig {
        &self.config
    }

    /// students in display order
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn student(&self, id: StudentId) -> Result<&Student> {
        self.students
            .iter()
            .find(|s| s.id == id)
            .ok_or(DuesError::StudentNotFound { id })
    }

    fn student_mut(&mut self, id: StudentId) -> Result<&mut Student> {
        self.students
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(DuesError::StudentNotFound { id })
    }

    fn position(&self, id: StudentId) -> Result<usize> {
        self.students
            .iter()
            .position(|s| s.id == id)
            .ok_or(DuesError::StudentNotFound { id })
    }

    /// add a student at the end of the display order
    #[instrument(skip(self, new_student, time), fields(name = %new_student.full_name))]
    pub fn add_student(&mut self, new_student: NewStudent, time: &SafeTimeProvider) -> Result<StudentId> {
        if !new_student.monthly_fee.is_positive() {
            return Err(DuesError::InvalidFee {
                fee: new_student.monthly_fee,
            });
        }

        let sort_order = self
            .students
            .iter()
            .filter_map(|s| s.sort_order)
            .max()
            .map_or(0, |highest| highest.saturating_add(1));
        let student = new_student.into_student(Uuid::new_v4(), sort_order);
        let id = student.id;

        self.events.emit(Event::StudentAdded {
            student_id: id,
            full_name: student.full_name.clone(),
            admission_date: student.admission_date,
            monthly_fee: student.monthly_fee,
            sort_order,
            timestamp: time.now(),
        });
        self.students.push(student);

        debug!(student_id = %id, sort_order, "student added");
        Ok(id)
    }

    /// edit profile fields or the fee; the admission date never changes
    #[instrument(skip(self, update, time), fields(student_id = %id))]
    pub fn update_student(&mut self, id: StudentId, update: StudentUpdate, time: &SafeTimeProvider) -> Result<()> {
        update.validate()?;
        let student = self.student_mut(id)?;
        let previous_fee = update.apply(student);
        let new_fee = student.monthly_fee;
        let timestamp = time.now();

        self.events.emit(Event::StudentUpdated {
            student_id: id,
            timestamp,
        });
        if let Some(old_fee) = previous_fee {
            debug!(%old_fee, %new_fee, "monthly fee changed");
            self.events.emit(Event::MonthlyFeeChanged {
                student_id: id,
                old_fee,
                new_fee,
                timestamp,
            });
        }
        Ok(())
    }

    /// remove a student along with their payments
    #[instrument(skip(self, time), fields(student_id = %id))]
    pub fn remove_student(&mut self, id: StudentId, time: &SafeTimeProvider) -> Result<Student> {
        let index = self.position(id)?;
        let student = self.students.remove(index);

        self.events.emit(Event::StudentRemoved {
            student_id: id,
            payments_dropped: student.payments.len(),
            timestamp: time.now(),
        });
        debug!("student removed");
        Ok(student)
    }

    /// record a payment against a student
    ///
    /// A second payment for an already credited month is accepted; the month
    /// simply stays paid.
    #[instrument(skip(self, payment, time), fields(student_id = %student_id, month = %payment.month_paid_for))]
    pub fn record_payment(
        &mut self,
        student_id: StudentId,
        payment: NewPayment,
        time: &SafeTimeProvider,
    ) -> Result<PaymentId> {
        payment.validate()?;
        let student = self.student_mut(student_id)?;

        if student.has_payment_for(payment.month_paid_for) {
            warn!("month already has a payment recorded");
        }

        let payment = payment.into_payment(Uuid::new_v4());
        let event = Event::PaymentRecorded {
            student_id,
            payment_id: payment.id,
            month_paid_for: payment.month_paid_for,
            amount_paid: payment.amount_paid,
            method: payment.payment_method,
            timestamp: time.now(),
        };
        let payment_id = payment.id;
        student.payments.push(payment);

        self.events.emit(event);
        debug!(%payment_id, "payment recorded");
        Ok(payment_id)
    }

    /// replace the details of an existing payment
    #[instrument(skip(self, details, time), fields(student_id = %student_id, payment_id = %payment_id))]
    pub fn update_payment(
        &mut self,
        student_id: StudentId,
        payment_id: PaymentId,
        details: NewPayment,
        time: &SafeTimeProvider,
    ) -> Result<()> {
        details.validate()?;
        let student = self.student_mut(student_id)?;
        let slot = student
            .payments
            .iter_mut()
            .find(|p| p.id == payment_id)
            .ok_or(DuesError::PaymentNotFound { id: payment_id })?;

        *slot = details.into_payment(payment_id);
        let event = Event::PaymentUpdated {
            student_id,
            payment_id,
            month_paid_for: slot.month_paid_for,
            amount_paid: slot.amount_paid,
            timestamp: time.now(),
        };

        self.events.emit(event);
        debug!("payment updated");
        Ok(())
    }

    /// delete a payment, the credited month becomes outstanding again
    #[instrument(skip(self, time), fields(student_id = %student_id, payment_id = %payment_id))]
    pub fn delete_payment(
        &mut self,
        student_id: StudentId,
        payment_id: PaymentId,
        time: &SafeTimeProvider,
    ) -> Result<()> {
        let student = self.student_mut(student_id)?;
        let index = student
            .payments
            .iter()
            .position(|p| p.id == payment_id)
            .ok_or(DuesError::PaymentNotFound { id: payment_id })?;
        let removed = student.payments.remove(index);

        self.events.emit(Event::PaymentDeleted {
            student_id,
            payment_id,
            month_paid_for: removed.month_paid_for,
            timestamp: time.now(),
        });
        debug!("payment deleted");
        Ok(())
    }

    /// move `active` to the position held by `over` and renumber everyone
    #[instrument(skip(self, time), fields(active = %active, over = %over))]
    pub fn move_student(&mut self, active: StudentId, over: StudentId, time: &SafeTimeProvider) -> Result<()> {
        if active == over {
            return Ok(());
        }

        let from = self.position(active)?;
        let to = self.position(over)?;

        let moved = self.students.remove(from);
        self.students.insert(to, moved);
        for (index, student) in self.students.iter_mut().enumerate() {
            student.sort_order = Some(index as u32);
        }

        self.events.emit(Event::RosterReordered {
            moved: active,
            from_position: from,
            to_position: to,
            timestamp: time.now(),
        });
        debug!(from, to, "roster reordered");
        Ok(())
    }

    /// fee used for a student's dues and as the default payment amount
    pub fn effective_fee(&self, id: StudentId) -> Result<Money> {
        Ok(self.student(id)?.effective_fee(self.config.default_monthly_fee))
    }

    /// dues for one student as of `reference`
    pub fn due_info(&self, id: StudentId, reference: NaiveDate) -> Result<DueInfo> {
        let student = self.student(id)?;
        student.due_info(student.effective_fee(self.config.default_monthly_fee), reference)
    }

    /// months a payment for this student may be credited against
    pub fn payable_months(&self, id: StudentId, reference: NaiveDate) -> Result<Vec<MonthOption>> {
        Ok(self.student(id)?.payable_months(&self.config.enumerator(), reference))
    }

    /// one row per student in display order
    ///
    /// A student whose dues cannot be computed gets a degraded row rather than
    /// failing the whole roster.
    pub fn rows(&self, reference: NaiveDate) -> Vec<StudentRow> {
        self.students
            .iter()
            .enumerate()
            .map(|(index, student)| {
                let fee = student.effective_fee(self.config.default_monthly_fee);
                let due = student.due_info(fee, reference).unwrap_or_else(|err| {
                    warn!(student_id = %student.id, error = %err, "dues unavailable");
                    DueInfo::degraded(&err)
                });
                let sort_order = student.sort_order.unwrap_or(index as u32);
                StudentRow::from_student(student, sort_order, fee, due)
            })
            .collect()
    }

    pub fn rows_as_of(&self, time: &SafeTimeProvider) -> Vec<StudentRow> {
        self.rows(reference_date(time))
    }

    pub fn summary(&self, reference: NaiveDate) -> Result<RosterSummary> {
        RosterSummary::from_rows(&self.rows(reference))
    }

    pub fn summary_as_of(&self, time: &SafeTimeProvider) -> Result<RosterSummary> {
        self.summary(reference_date(time))
    }

    /// snapshot of config and students as json
    pub fn to_json(&self) -> Result<String> {
        let snapshot = SnapshotRef {
            config: &self.config,
            students: &self.students,
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// restore from a snapshot produced by [`to_json`](Self::to_json)
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Self::from_students(snapshot.config, snapshot.students)
    }
}
