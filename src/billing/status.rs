use serde::{Deserialize, Serialize};
use std::fmt;

/// due count at which the status escalates from warning to destructive
pub const DESTRUCTIVE_THRESHOLD: usize = 3;

/// badge category for a fee status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeStatusType {
    /// no cycle has come due yet
    Info,
    /// every due cycle is paid
    Success,
    /// one or two cycles unpaid
    Warning,
    /// three or more cycles unpaid
    Destructive,
    /// dues could not be computed
    Error,
}

impl fmt::Display for FeeStatusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeeStatusType::Info => "info",
            FeeStatusType::Success => "success",
            FeeStatusType::Warning => "warning",
            FeeStatusType::Destructive => "destructive",
            FeeStatusType::Error => "error",
        };
        f.write_str(name)
    }
}

/// label and category shown for a student's fees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeStatus {
    pub label: String,
    pub kind: FeeStatusType,
}

impl FeeStatus {
    pub fn new(label: impl Into<String>, kind: FeeStatusType) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }

    /// classify from the number of unpaid due cycles
    pub fn classify(due_months_count: usize, cycle_started: bool) -> Self {
        match due_months_count {
            0 if cycle_started => FeeStatus::new("Paid", FeeStatusType::Success),
            0 => FeeStatus::new("Not Due Yet", FeeStatusType::Info),
            1 => FeeStatus::new("1 Month Due", FeeStatusType::Warning),
            n if n < DESTRUCTIVE_THRESHOLD => {
                FeeStatus::new(format!("{n} Months Due"), FeeStatusType::Warning)
            }
            n => FeeStatus::new(format!("{n} Months Due"), FeeStatusType::Destructive),
        }
    }
}
