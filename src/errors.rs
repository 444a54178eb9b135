use std::fmt;

use thiserror::Error;
use uuid::Uuid;

use crate::decimal::Money;

/// which input date a date error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRole {
    Admission,
    Reference,
    DueDate,
}

impl fmt::Display for DateRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DateRole::Admission => "admission date",
            DateRole::Reference => "reference date",
            DateRole::DueDate => "due date",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum DuesError {
    #[error("invalid {role}: {message}")]
    InvalidDate {
        role: DateRole,
        message: String,
    },

    #[error("invalid month identifier: {value:?}")]
    InvalidMonthId {
        value: String,
    },

    #[error("invalid monthly fee: {fee}")]
    InvalidFee {
        fee: Money,
    },

    #[error("amount overflow: {context}")]
    AmountOverflow {
        context: String,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("student not found: {id}")]
    StudentNotFound {
        id: Uuid,
    },

    #[error("payment not found: {id}")]
    PaymentNotFound {
        id: Uuid,
    },

    #[error("missing required field: {field}")]
    MissingField {
        field: &'static str,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("serialization error: {message}")]
    Serialization {
        message: String,
    },
}

impl DuesError {
    pub(crate) fn invalid_date(role: DateRole, message: impl Into<String>) -> Self {
        DuesError::InvalidDate {
            role,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for DuesError {
    fn from(err: serde_json::Error) -> Self {
        DuesError::Serialization {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DuesError>;
