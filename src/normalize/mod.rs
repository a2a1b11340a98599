mod errors;

use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;
use csv::StringRecord;
use rust_decimal::Decimal;

pub use errors::{FieldError, RowShapeError};

use crate::models::TransactionRecord;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Positional field names, used to label diagnostics.
pub const FIELD_NAMES: [&str; TransactionRecord::FIELD_COUNT] = [
    "transaction_date",
    "booking_date",
    "reject_date",
    "amount",
    "currency",
    "sender_receiver",
    "description",
    "product",
    "transaction_type",
    "order_amount",
    "order_currency",
    "status",
    "balance_after"
];

/// Non-fatal diagnostic attached to a single field of a row. The field was
/// set to null and the row kept going.
#[derive(Debug, Clone)]
pub struct FieldNote {
    pub field: &'static str,
    pub error: FieldError
}

impl Display for FieldNote {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "[{}] {}", self.field, self.error)
    }
}

/// Trims, then treats empty as absent; otherwise parses a strict `YYYY-MM-DD`
/// calendar date. An unparsable value is an error the caller downgrades to
/// null plus a diagnostic.
pub fn to_date(raw: &str) -> Result<Option<NaiveDate>, FieldError> {
    let value = raw.trim();

    if value.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(Some)
        .map_err(|error| FieldError::invalid_date(value, error))
}

/// Trims, strips interior whitespace, and accepts a comma as the decimal
/// separator before parsing. Empty is absent; unparsable is an error the
/// caller downgrades to null plus a diagnostic.
pub fn to_decimal(raw: &str) -> Result<Option<Decimal>, FieldError> {
    let compact: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if compact.is_empty() {
        return Ok(None);
    }

    Decimal::from_str(&compact)
        .map(Some)
        .map_err(|error| FieldError::invalid_decimal(&compact, error))
}

/// Trims, then treats the empty string as absent. Applied to every free-text
/// field so "blank means missing" behaves the same across the whole row.
pub fn to_optional_string(raw: &str) -> Option<String> {
    let value = raw.trim();

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Coerces one raw row into a typed record.
///
/// A row with fewer than [`TransactionRecord::FIELD_COUNT`] fields is
/// malformed and rejected whole; extra trailing fields are ignored. For a
/// structurally valid row this never fails: every field yields a value or
/// null, and unparsable dates and decimals come back as notes alongside the
/// record.
pub fn normalize_row(row: &StringRecord) -> Result<(TransactionRecord, Vec<FieldNote>), RowShapeError> {
    if row.len() < TransactionRecord::FIELD_COUNT {
        return Err(RowShapeError {
            expected: TransactionRecord::FIELD_COUNT,
            found: row.len()
        });
    }

    let mut notes = Vec::new();

    let record = TransactionRecord {
        transaction_date: coerce_date(row, 0, &mut notes),
        booking_date: coerce_date(row, 1, &mut notes),
        reject_date: coerce_date(row, 2, &mut notes),
        amount: coerce_decimal(row, 3, &mut notes),
        currency: coerce_string(row, 4),
        sender_receiver: coerce_string(row, 5),
        description: coerce_string(row, 6),
        product: coerce_string(row, 7),
        transaction_type: coerce_string(row, 8),
        order_amount: coerce_decimal(row, 9, &mut notes),
        order_currency: coerce_string(row, 10),
        status: coerce_string(row, 11),
        balance_after: coerce_decimal(row, 12, &mut notes)
    };

    Ok((record, notes))
}

fn coerce_date(row: &StringRecord, index: usize, notes: &mut Vec<FieldNote>) -> Option<NaiveDate> {
    settle(to_date(field(row, index)), index, notes)
}

fn coerce_decimal(row: &StringRecord, index: usize, notes: &mut Vec<FieldNote>) -> Option<Decimal> {
    settle(to_decimal(field(row, index)), index, notes)
}

fn coerce_string(row: &StringRecord, index: usize) -> Option<String> {
    to_optional_string(field(row, index))
}

fn field(row: &StringRecord, index: usize) -> &str {
    row.get(index).unwrap_or("")
}

fn settle<T>(outcome: Result<Option<T>, FieldError>, index: usize, notes: &mut Vec<FieldNote>) -> Option<T> {
    match outcome {
        Ok(value) => value,
        Err(error) => {
            notes.push(FieldNote {
                field: FIELD_NAMES[index],
                error
            });
            None
        }
    }
}
