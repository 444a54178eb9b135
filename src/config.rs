use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::billing::{BillingMonthEnumerator, DEFAULT_ADVANCE_MONTHS};
use crate::decimal::Money;
use crate::errors::{DuesError, Result};

/// roster-wide billing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BillingConfig {
    /// fee used for students whose stored fee is missing or not positive
    pub default_monthly_fee: Money,
    /// months past the current month that accept advance payments
    pub advance_months: u32,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            default_monthly_fee: Money::from_decimal(dec!(1200)),
            advance_months: DEFAULT_ADVANCE_MONTHS,
        }
    }
}

impl BillingConfig {
    pub fn new(default_monthly_fee: Money, advance_months: u32) -> Result<Self> {
        let config = Self {
            default_monthly_fee,
            advance_months,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.default_monthly_fee.is_positive() {
            return Err(DuesError::InvalidConfiguration {
                message: format!(
                    "default monthly fee must be positive, got {}",
                    self.default_monthly_fee
                ),
            });
        }
        Ok(())
    }

    /// enumerator honouring the configured advance window
    pub fn enumerator(&self) -> BillingMonthEnumerator {
        BillingMonthEnumerator::new(self.advance_months)
    }

    /// load from json, missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
