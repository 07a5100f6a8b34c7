//! Validation utilities

use crate::statement::StatementRow;
use crate::traits::*;
use crate::types::*;

/// Validate that an amount is not negative
pub fn validate_non_negative_amount<T: Amount>(
    side: Side,
    position: Option<usize>,
    amount: &T,
) -> ReconciliationResult<()> {
    if amount.is_negative() {
        Err(ReconciliationError::invalid_element(
            side,
            position,
            &format!("{:?} is negative", amount),
        ))
    } else {
        Ok(())
    }
}

/// Validate that a statement row ID is valid
pub fn validate_row_id(row_id: &str) -> ReconciliationResult<()> {
    if row_id.trim().is_empty() {
        return Err(ReconciliationError::Validation(
            "Row ID cannot be empty".to_string(),
        ));
    }

    if row_id.len() > 64 {
        return Err(ReconciliationError::Validation(
            "Row ID cannot exceed 64 characters".to_string(),
        ));
    }

    // Sheet references such as "Bank 2024/A12" are allowed; only control
    // characters and surrounding whitespace are rejected.
    if row_id.chars().any(char::is_control) {
        return Err(ReconciliationError::Validation(
            "Row ID cannot contain control characters".to_string(),
        ));
    }

    if row_id.trim() != row_id {
        return Err(ReconciliationError::Validation(
            "Row ID cannot start or end with whitespace".to_string(),
        ));
    }

    Ok(())
}

/// Validate that an issuer name is valid
pub fn validate_issuer(issuer: &str) -> ReconciliationResult<()> {
    if issuer.trim().is_empty() {
        return Err(ReconciliationError::Validation(
            "Issuer cannot be empty".to_string(),
        ));
    }

    if issuer.len() > 100 {
        return Err(ReconciliationError::Validation(
            "Issuer cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate a statement row before it takes part in matching
pub fn validate_statement_row(row: &StatementRow) -> ReconciliationResult<()> {
    validate_row_id(&row.id)?;
    validate_issuer(&row.issuer)?;
    Ok(())
}

/// Validate a whole sheet of statement rows, rejecting duplicate IDs
pub fn validate_statement_rows(rows: &[StatementRow]) -> ReconciliationResult<()> {
    let mut seen = std::collections::HashSet::new();
    for row in rows {
        validate_statement_row(row)?;
        if !seen.insert(row.id.as_str()) {
            return Err(ReconciliationError::Validation(format!(
                "Row '{}' appears more than once",
                row.id
            )));
        }
    }
    Ok(())
}

/// Strict validator that also rejects negative amounts
pub struct StrictInputValidator;

impl<T: Amount> InputValidator<T> for StrictInputValidator {
    fn validate_value(
        &self,
        side: Side,
        position: Option<usize>,
        value: &T,
    ) -> ReconciliationResult<()> {
        DefaultInputValidator.validate_value(side, position, value)?;
        validate_non_negative_amount(side, position, value)
    }
}
