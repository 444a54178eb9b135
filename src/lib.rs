pub mod billing;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod roster;
pub mod student;
pub mod types;

// re-export key types
pub use billing::{
    cycle_due_date, format_month_label, BillingMonthEnumerator, CreditedMonth, DueCalculator,
    DueInfo, FeeStatus, FeeStatusType, MonthId, MonthOption,
};
pub use config::BillingConfig;
pub use decimal::Money;
pub use errors::{DateRole, DuesError, Result};
pub use events::{Event, EventStore};
pub use roster::{Roster, RosterSummary, StudentRow};
pub use student::{NewPayment, NewStudent, Payment, Student, StudentBuilder, StudentUpdate};
pub use types::{PaymentId, PaymentMethod, StudentId};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
