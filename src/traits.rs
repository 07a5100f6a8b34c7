//! Traits for pluggable input validation

use crate::types::*;

/// Trait for implementing custom input validation rules
///
/// The engine runs the validator over the target or both lists before any
/// search starts, so invalid values fail fast instead of producing silent
/// mismatches.
pub trait InputValidator<T: Amount>: Send + Sync {
    /// Validate a single value taken from `side` at `position`
    fn validate_value(&self, side: Side, position: Option<usize>, value: &T)
        -> ReconciliationResult<()>;

    /// Validate every value of a list
    fn validate_list(&self, side: Side, values: &[T]) -> ReconciliationResult<()> {
        for (position, value) in values.iter().enumerate() {
            self.validate_value(side, Some(position), value)?;
        }
        Ok(())
    }
}

/// Default validator: accepts any value the amount type considers usable
pub struct DefaultInputValidator;

impl<T: Amount> InputValidator<T> for DefaultInputValidator {
    fn validate_value(
        &self,
        side: Side,
        position: Option<usize>,
        value: &T,
    ) -> ReconciliationResult<()> {
        value
            .validate()
            .map_err(|reason| ReconciliationError::invalid_element(side, position, &reason))
    }
}
