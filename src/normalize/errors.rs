use std::fmt::Display;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("Failed to parse date [{value}]: {reason}")]
    InvalidDate {
        value: String,
        reason: String
    },
    #[error("Failed to parse decimal [{value}]: {reason}")]
    InvalidDecimal {
        value: String,
        reason: String
    }
}

impl FieldError {
    pub fn invalid_date(value: &str, reason: impl Display) -> Self {
        Self::InvalidDate {
            value: value.to_string(),
            reason: reason.to_string()
        }
    }

    pub fn invalid_decimal(value: &str, reason: impl Display) -> Self {
        Self::InvalidDecimal {
            value: value.to_string(),
            reason: reason.to_string()
        }
    }
}

#[derive(Debug, Error)]
#[error("Row carries {found} of {expected} required fields")]
pub struct RowShapeError {
    pub expected: usize,
    pub found: usize
}
