//! Transaction records supplied by the caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single dated transaction from the accounting system.
///
/// Records are supplied per call and never cached by the engine. Amounts
/// are signed: credits and returns carry negative values and flow through
/// every aggregation unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Calendar date of the transaction.
    pub date: NaiveDate,
    /// Signed transaction amount.
    pub amount: f64,
    /// Counterparty (customer or supplier) name.
    pub counterparty: String,
    /// Voucher identifier; distinct vouchers count toward frequency.
    pub voucher_id: String,
    /// Optional product/ledger identifier for movement classification.
    pub item_id: Option<String>,
}

impl TransactionRecord {
    /// Create a record without an item identifier.
    pub fn new(
        date: NaiveDate,
        amount: f64,
        counterparty: impl Into<String>,
        voucher_id: impl Into<String>,
    ) -> Self {
        Self {
            date,
            amount,
            counterparty: counterparty.into(),
            voucher_id: voucher_id.into(),
            item_id: None,
        }
    }

    /// Attach a product/ledger identifier.
    pub fn with_item(mut self, item_id: impl Into<String>) -> Self {
        self.item_id = Some(item_id.into());
        self
    }
}
