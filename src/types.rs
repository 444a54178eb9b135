use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// unique identifier for a student
pub type StudentId = Uuid;

/// unique identifier for a payment
pub type PaymentId = Uuid;

/// how a payment was physically received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Online,
    Cheque,
    Other,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Online => "Online",
            PaymentMethod::Cheque => "Cheque",
            PaymentMethod::Other => "Other",
        };
        f.write_str(name)
    }
}
