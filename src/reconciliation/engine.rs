//! Iterative demand/supply reconciliation driven by subset-sum matching

use log::{debug, info, warn};

use crate::reconciliation::finder::SubsetSumFinder;
use crate::reconciliation::options::ReconciliationOptions;
use crate::traits::*;
use crate::types::*;

/// Where the pass loop currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// A pass is due: the last pass consumed a demand value, or none has run
    Scanning,
    /// The last pass found nothing to match
    Done,
}

/// Reconciliation engine that consumes demand values against supply subsets
///
/// Each pass walks a snapshot of the demand list and searches the current
/// supply list for every value. The first match removes the demand value
/// and the matched supply values, then the pass is abandoned and a fresh
/// one starts. The run ends after a pass with no match.
pub struct ReconciliationEngine<T: Amount> {
    finder: SubsetSumFinder,
    options: ReconciliationOptions,
    validator: Box<dyn InputValidator<T>>,
}

impl<T: Amount> Default for ReconciliationEngine<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Amount> ReconciliationEngine<T> {
    /// Create an engine with no search limits and the default validator
    pub fn new() -> Self {
        Self {
            finder: SubsetSumFinder::new(),
            options: ReconciliationOptions::default(),
            validator: Box::new(DefaultInputValidator),
        }
    }

    /// Create an engine with custom options
    pub fn with_options(options: ReconciliationOptions) -> ReconciliationResult<Self> {
        options.validate()?;
        Ok(Self {
            finder: SubsetSumFinder::with_limits(options.limits.clone())?,
            options,
            validator: Box::new(DefaultInputValidator),
        })
    }

    /// Replace the input validator
    pub fn with_validator(mut self, validator: Box<dyn InputValidator<T>>) -> Self {
        self.validator = validator;
        self
    }

    pub fn options(&self) -> &ReconciliationOptions {
        &self.options
    }

    /// Reconcile `demand` against `supply` in place and report every match.
    ///
    /// Both lists are validated before any mutation; on error they are left
    /// untouched unless a search limit is hit mid-run, in which case the
    /// matches made so far have already been applied.
    pub fn reconcile(
        &self,
        demand: &mut Vec<T>,
        supply: &mut Vec<T>,
    ) -> ReconciliationResult<ReconciliationReport<T>> {
        self.validator.validate_list(Side::Demand, demand.as_slice())?;
        self.validator.validate_list(Side::Supply, supply.as_slice())?;

        let mut matches = Vec::new();
        let mut passes = 0;
        let mut examined = 0;
        let mut state = EngineState::Scanning;

        while state == EngineState::Scanning {
            if let Some(max_passes) = self.options.max_passes {
                if passes >= max_passes {
                    warn!("reconciliation stopped after {} passes", max_passes);
                    return Err(ReconciliationError::SearchLimitExceeded(format!(
                        "did not settle within {} passes",
                        max_passes
                    )));
                }
            }
            passes += 1;

            match self.run_pass(passes, demand, supply, &mut examined)? {
                Some(record) => {
                    debug!(
                        "pass {}: {:?} matched supply {:?} at {:?}",
                        passes, record.demand_value, record.supply_values, record.supply_positions
                    );
                    matches.push(record);
                }
                None => {
                    debug!("pass {}: no match, {} demand values left", passes, demand.len());
                    state = EngineState::Done;
                }
            }
        }

        info!(
            "reconciled {} demand values in {} passes ({} combinations examined)",
            matches.len(),
            passes,
            examined
        );

        Ok(ReconciliationReport {
            matches,
            remaining_demand: demand.clone(),
            remaining_supply: supply.clone(),
            passes,
            combinations_examined: examined,
        })
    }

    /// One pass over a snapshot of `demand`. Stops at the first match.
    fn run_pass(
        &self,
        pass: usize,
        demand: &mut Vec<T>,
        supply: &mut Vec<T>,
        examined: &mut u64,
    ) -> ReconciliationResult<Option<MatchRecord<T>>> {
        let snapshot = demand.clone();

        for target in &snapshot {
            let witness = match self.finder.search(target, supply.as_slice(), examined)? {
                Some(witness) => witness,
                None => continue,
            };

            let demand_position = match demand.iter().position(|value| value == target) {
                Some(position) => position,
                // Snapshot is taken after the last mutation, so every value is present
                None => continue,
            };
            demand.remove(demand_position);

            let supply_values = witness.values(supply.as_slice());
            let supply_positions = witness.into_positions();
            remove_positions(supply, &supply_positions);

            return Ok(Some(MatchRecord {
                pass,
                demand_value: target.clone(),
                demand_position,
                supply_positions,
                supply_values,
            }));
        }

        Ok(None)
    }
}

/// Remove the values at `positions` from `values` in a single batch.
///
/// Positions are taken against the list as it is on entry; they are applied
/// highest first so no removal shifts a position still to be removed.
pub fn remove_positions<T>(values: &mut Vec<T>, positions: &[usize]) {
    let mut ordered = positions.to_vec();
    ordered.sort_unstable_by(|a, b| b.cmp(a));
    ordered.dedup();
    for position in ordered {
        values.remove(position);
    }
}

/// Reconcile `demand` against `supply` in place with default settings and
/// return the reduced lists.
pub fn process_lists<T: Amount>(
    demand: &mut Vec<T>,
    supply: &mut Vec<T>,
) -> ReconciliationResult<(Vec<T>, Vec<T>)> {
    let report = ReconciliationEngine::new().reconcile(demand, supply)?;
    Ok((report.remaining_demand, report.remaining_supply))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciliation::options::SearchLimits;

    #[test]
    fn test_remove_positions_highest_first() {
        let mut values = vec!['a', 'b', 'c', 'd', 'e'];
        remove_positions(&mut values, &[0, 2, 4]);
        assert_eq!(values, vec!['b', 'd']);

        let mut values = vec![1, 2, 3];
        remove_positions(&mut values, &[2, 0]);
        assert_eq!(values, vec![2]);
    }

    #[test]
    fn test_reference_example() {
        let mut demand = vec![7, 10, 12];
        let mut supply = vec![3, 3, 4, 5, 6];
        let (d, s) = process_lists(&mut demand, &mut supply).unwrap();
        assert_eq!(d, vec![10, 12]);
        assert_eq!(s, vec![3, 5, 6]);
        // Mutated in place as well
        assert_eq!(demand, d);
        assert_eq!(supply, s);
    }

    #[test]
    fn test_report_records_each_match() {
        let engine = ReconciliationEngine::new();
        let mut demand = vec![7, 10, 12];
        let mut supply = vec![3, 3, 4, 5, 6];
        let report = engine.reconcile(&mut demand, &mut supply).unwrap();

        assert_eq!(report.matches.len(), 1);
        let record = &report.matches[0];
        assert_eq!(record.pass, 1);
        assert_eq!(record.demand_value, 7);
        assert_eq!(record.demand_position, 0);
        assert_eq!(record.supply_positions, vec![0, 2]);
        assert_eq!(record.supply_values, vec![3, 4]);
        assert_eq!(report.passes, 2);
        assert!(!report.is_fully_matched());
    }

    #[test]
    fn test_empty_demand_is_untouched() {
        let mut demand: Vec<i32> = vec![];
        let mut supply = vec![1, 2, 3];
        let (d, s) = process_lists(&mut demand, &mut supply).unwrap();
        assert!(d.is_empty());
        assert_eq!(s, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_supply_matches_nothing() {
        let mut demand = vec![4, 5];
        let mut supply: Vec<i32> = vec![];
        let (d, s) = process_lists(&mut demand, &mut supply).unwrap();
        assert_eq!(d, vec![4, 5]);
        assert!(s.is_empty());
    }

    #[test]
    fn test_exact_full_consumption() {
        let mut demand = vec![5];
        let mut supply = vec![2, 3];
        let (d, s) = process_lists(&mut demand, &mut supply).unwrap();
        assert!(d.is_empty());
        assert!(s.is_empty());
    }

    #[test]
    fn test_duplicate_demand_removes_first_occurrence() {
        let mut demand = vec![4, 9, 4];
        let mut supply = vec![1, 3, 4];
        let engine = ReconciliationEngine::new();
        let report = engine.reconcile(&mut demand, &mut supply).unwrap();
        // First 4 takes the single 4, second 4 takes 1 + 3
        assert_eq!(report.matches.len(), 2);
        assert_eq!(report.matches[0].supply_positions, vec![2]);
        assert_eq!(report.matches[0].demand_position, 0);
        assert_eq!(report.matches[1].supply_positions, vec![0, 1]);
        assert_eq!(report.matches[1].demand_position, 1);
        assert_eq!(demand, vec![9]);
        assert!(supply.is_empty());
    }

    #[test]
    fn test_pass_restarts_after_each_match() {
        // 6 takes 2 + 4, then each restarted pass consumes one more value
        let mut demand = vec![6, 5, 1];
        let mut supply = vec![2, 4, 5, 1];
        let engine = ReconciliationEngine::new();
        let report = engine.reconcile(&mut demand, &mut supply).unwrap();
        let values: Vec<i32> = report.matches.iter().map(|m| m.demand_value).collect();
        assert_eq!(values, vec![6, 5, 1]);
        assert_eq!(report.matches[0].supply_positions, vec![0, 1]);
        assert_eq!(report.matches[1].supply_positions, vec![0]);
        assert_eq!(report.matches[2].supply_positions, vec![0]);
        assert_eq!(report.passes, 4);
        assert!(report.is_fully_matched());
    }

    #[test]
    fn test_invalid_input_leaves_lists_untouched() {
        let mut demand = vec![1.0, 2.0];
        let mut supply = vec![1.0, f64::NAN];
        let err = process_lists(&mut demand, &mut supply).unwrap_err();
        assert!(matches!(err, ReconciliationError::InvalidInput(_)));
        assert_eq!(demand, vec![1.0, 2.0]);
        assert_eq!(supply.len(), 2);
    }

    #[test]
    fn test_pass_limit() {
        let options = ReconciliationOptions::default().with_max_passes(1);
        let engine = ReconciliationEngine::with_options(options).unwrap();
        let mut demand = vec![3];
        let mut supply = vec![3];
        // One pass matches; confirming stability needs a second
        let err = engine.reconcile(&mut demand, &mut supply).unwrap_err();
        assert!(matches!(err, ReconciliationError::SearchLimitExceeded(_)));
    }

    #[test]
    fn test_combination_budget_is_shared_across_run() {
        let options = ReconciliationOptions::new(SearchLimits::unlimited().with_max_combinations(3));
        let engine = ReconciliationEngine::with_options(options).unwrap();
        let mut demand = vec![100, 200];
        let mut supply = vec![1, 2];
        // Each target examines 3 combinations, so the second exceeds the budget
        let err = engine.reconcile(&mut demand, &mut supply).unwrap_err();
        assert!(matches!(err, ReconciliationError::SearchLimitExceeded(_)));
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = ReconciliationOptions::default().with_max_passes(0);
        assert!(ReconciliationEngine::<i32>::with_options(options).is_err());
    }
}
