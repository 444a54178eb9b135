use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::billing::MonthId;
use crate::decimal::Money;
use crate::types::{PaymentId, PaymentMethod, StudentId};

/// all events that can be emitted by the roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // student events
    StudentAdded {
        student_id: StudentId,
        full_name: String,
        admission_date: NaiveDate,
        monthly_fee: Money,
        sort_order: u32,
        timestamp: DateTime<Utc>,
    },
    StudentUpdated {
        student_id: StudentId,
        timestamp: DateTime<Utc>,
    },
    MonthlyFeeChanged {
        student_id: StudentId,
        old_fee: Money,
        new_fee: Money,
        timestamp: DateTime<Utc>,
    },
    StudentRemoved {
        student_id: StudentId,
        payments_dropped: usize,
        timestamp: DateTime<Utc>,
    },

    // payment events
    PaymentRecorded {
        student_id: StudentId,
        payment_id: PaymentId,
        month_paid_for: MonthId,
        amount_paid: Money,
        method: PaymentMethod,
        timestamp: DateTime<Utc>,
    },
    PaymentUpdated {
        student_id: StudentId,
        payment_id: PaymentId,
        month_paid_for: MonthId,
        amount_paid: Money,
        timestamp: DateTime<Utc>,
    },
    PaymentDeleted {
        student_id: StudentId,
        payment_id: PaymentId,
        month_paid_for: MonthId,
        timestamp: DateTime<Utc>,
    },

    // ordering events
    RosterReordered {
        moved: StudentId,
        from_position: usize,
        to_position: usize,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
