use chrono::NaiveDate;
use rust_decimal::Decimal;

/// One normalized data row from the input file.
///
/// The field order matches the positional order of the source format and the
/// column order of the sink's insert statement; every field is nullable
/// because the source routinely leaves columns blank. A row with fewer
/// positional fields than [`TransactionRecord::FIELD_COUNT`] never becomes a
/// record; it is rejected at the row level before coercion starts.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub transaction_date: Option<NaiveDate>,
    pub booking_date: Option<NaiveDate>,
    pub reject_date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub sender_receiver: Option<String>,
    pub description: Option<String>,
    pub product: Option<String>,
    pub transaction_type: Option<String>,
    pub order_amount: Option<Decimal>,
    pub order_currency: Option<String>,
    pub status: Option<String>,
    pub balance_after: Option<Decimal>
}

impl TransactionRecord {
    /// Fixed arity of the source format.
    pub const FIELD_COUNT: usize = 13;
}
