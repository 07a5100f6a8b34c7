//! Statement rows and grouping helpers

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Issuer recorded on adjustment rows generated during reconciliation
pub const SYSTEM_ISSUER: &str = "System";

/// A single dated amount from a bank or bookkeeping sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    /// Unique identifier for the row
    pub id: String,
    /// Booking date
    pub date: NaiveDate,
    /// Signed amount
    pub amount: BigDecimal,
    /// Who issued the payment, or `System` for generated rows
    pub issuer: String,
}

impl StatementRow {
    /// Create a row with a freshly generated ID
    pub fn new(date: NaiveDate, amount: BigDecimal, issuer: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), date, amount, issuer)
    }

    /// Create a row with an explicit ID
    pub fn with_id(
        id: impl Into<String>,
        date: NaiveDate,
        amount: BigDecimal,
        issuer: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            amount,
            issuer: issuer.into(),
        }
    }

    /// Create a `System` adjustment row
    pub fn adjustment(date: NaiveDate, amount: BigDecimal) -> Self {
        Self::new(date, amount, SYSTEM_ISSUER)
    }

    /// Whether the row was generated by reconciliation
    pub fn is_system(&self) -> bool {
        self.issuer == SYSTEM_ISSUER
    }
}

/// Group rows by date, keeping input order within each date
pub fn group_by_date(rows: &[StatementRow]) -> BTreeMap<NaiveDate, Vec<StatementRow>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<StatementRow>> = BTreeMap::new();
    for row in rows {
        grouped.entry(row.date).or_default().push(row.clone());
    }
    grouped
}

/// Sum the amounts of `rows`
pub fn total_amount(rows: &[StatementRow]) -> BigDecimal {
    rows.iter().map(|row| &row.amount).sum()
}
