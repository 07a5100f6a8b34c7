//! Per-date matching of bank rows against bookkeeping rows

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::reconciliation::{remove_positions, ReconciliationEngine, ReconciliationOptions};
use crate::statement::row::*;
use crate::types::*;
use crate::utils::validate_statement_rows;

/// A bank row covered by one or more bookkeeping rows from the same date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementMatch {
    pub date: NaiveDate,
    pub bank_row: StatementRow,
    pub bookkeeping_rows: Vec<StatementRow>,
}

/// Outcome of reconciling a bookkeeping sheet against a bank sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementReport {
    /// Matches in date order, then in the order they were found
    pub matches: Vec<StatementMatch>,
    /// Bank rows with no covering bookkeeping subset
    pub unmatched_bank: Vec<StatementRow>,
    /// Bookkeeping rows not used by any match
    pub unmatched_bookkeeping: Vec<StatementRow>,
    /// One `System` row per date whose unmatched totals differ, holding
    /// bank total minus bookkeeping total
    pub adjustments: Vec<StatementRow>,
}

impl StatementReport {
    /// Whether every row on both sides was matched
    pub fn is_balanced(&self) -> bool {
        self.unmatched_bank.is_empty() && self.unmatched_bookkeeping.is_empty()
    }

    /// Sum of all adjustment amounts
    pub fn total_adjustment(&self) -> BigDecimal {
        total_amount(&self.adjustments)
    }
}

/// Reconciles dated bank and bookkeeping rows one date at a time
pub struct StatementReconciler {
    engine: ReconciliationEngine<BigDecimal>,
}

impl Default for StatementReconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementReconciler {
    /// Create a reconciler with an unlimited search
    pub fn new() -> Self {
        Self {
            engine: ReconciliationEngine::new(),
        }
    }

    /// Create a reconciler whose per-date runs obey `options`
    pub fn with_options(options: ReconciliationOptions) -> ReconciliationResult<Self> {
        Ok(Self {
            engine: ReconciliationEngine::with_options(options)?,
        })
    }

    /// Create a reconciler around a preconfigured engine
    pub fn with_engine(engine: ReconciliationEngine<BigDecimal>) -> Self {
        Self { engine }
    }

    /// Match `bank` rows against `bookkeeping` rows, date by date.
    ///
    /// A date present on only one side leaves all its rows unmatched.
    /// Unmatched bank rows are reported individually, and each date's
    /// adjustment is the unmatched bank total minus the unmatched
    /// bookkeeping total.
    pub fn reconcile(
        &self,
        bookkeeping: &[StatementRow],
        bank: &[StatementRow],
    ) -> ReconciliationResult<StatementReport> {
        validate_statement_rows(bookkeeping)?;
        validate_statement_rows(bank)?;

        let bookkeeping_by_date = group_by_date(bookkeeping);
        let bank_by_date = group_by_date(bank);
        let dates: BTreeSet<NaiveDate> = bookkeeping_by_date
            .keys()
            .chain(bank_by_date.keys())
            .copied()
            .collect();

        let mut report = StatementReport::default();
        for date in dates {
            let bank_rows = bank_by_date.get(&date).cloned().unwrap_or_default();
            let bookkeeping_rows = bookkeeping_by_date.get(&date).cloned().unwrap_or_default();
            self.reconcile_date(date, bank_rows, bookkeeping_rows, &mut report)?;
        }

        info!(
            "statement reconciliation: {} matches, {} bank and {} bookkeeping rows unmatched, {} adjustments",
            report.matches.len(),
            report.unmatched_bank.len(),
            report.unmatched_bookkeeping.len(),
            report.adjustments.len()
        );
        Ok(report)
    }

    fn reconcile_date(
        &self,
        date: NaiveDate,
        mut bank_rows: Vec<StatementRow>,
        mut bookkeeping_rows: Vec<StatementRow>,
        report: &mut StatementReport,
    ) -> ReconciliationResult<()> {
        let mut demand: Vec<BigDecimal> = bank_rows.iter().map(|r| r.amount.clone()).collect();
        let mut supply: Vec<BigDecimal> =
            bookkeeping_rows.iter().map(|r| r.amount.clone()).collect();
        let outcome = self.engine.reconcile(&mut demand, &mut supply)?;

        // Replay the engine's removals on the rows in the order they happened
        for record in outcome.matches {
            let bank_row = bank_rows.remove(record.demand_position);
            let matched: Vec<StatementRow> = record
                .supply_positions
                .iter()
                .map(|&i| bookkeeping_rows[i].clone())
                .collect();
            remove_positions(&mut bookkeeping_rows, &record.supply_positions);
            report.matches.push(StatementMatch {
                date,
                bank_row,
                bookkeeping_rows: matched,
            });
        }

        let difference = total_amount(&bank_rows) - total_amount(&bookkeeping_rows);
        if difference != BigDecimal::from(0) {
            debug!("{}: unmatched difference of {}", date, difference);
            report
                .adjustments
                .push(StatementRow::adjustment(date, difference));
        }

        report.unmatched_bank.extend(bank_rows);
        report.unmatched_bookkeeping.extend(bookkeeping_rows);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn row(id: &str, day: u32, amount: &str) -> StatementRow {
        StatementRow::with_id(id, date(day), BigDecimal::from_str(amount).unwrap(), "Acme")
    }

    #[test]
    fn test_one_to_one_and_split_matches() {
        let bank = vec![row("b1", 1, "100.00"), row("b2", 1, "75.50")];
        let bookkeeping = vec![
            row("k1", 1, "25.50"),
            row("k2", 1, "100.00"),
            row("k3", 1, "50.00"),
        ];
        let report = StatementReconciler::new()
            .reconcile(&bookkeeping, &bank)
            .unwrap();

        assert_eq!(report.matches.len(), 2);
        assert_eq!(report.matches[0].bank_row.id, "b1");
        assert_eq!(report.matches[0].bookkeeping_rows[0].id, "k2");
        let split: Vec<&str> = report.matches[1]
            .bookkeeping_rows
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(split, vec!["k1", "k3"]);
        assert!(report.is_balanced());
        assert!(report.adjustments.is_empty());
    }

    #[test]
    fn test_rows_only_match_within_their_date() {
        let bank = vec![row("b1", 1, "10")];
        let bookkeeping = vec![row("k1", 2, "10")];
        let report = StatementReconciler::new()
            .reconcile(&bookkeeping, &bank)
            .unwrap();

        assert!(report.matches.is_empty());
        assert_eq!(report.unmatched_bank.len(), 1);
        assert_eq!(report.unmatched_bookkeeping.len(), 1);
        assert_eq!(report.adjustments.len(), 2);
        assert_eq!(report.adjustments[0].date, date(1));
        assert_eq!(report.adjustments[0].amount, BigDecimal::from(10));
        assert_eq!(report.adjustments[1].amount, BigDecimal::from(-10));
        assert!(report.adjustments.iter().all(StatementRow::is_system));
        assert_eq!(report.total_adjustment(), BigDecimal::from(0));
    }

    #[test]
    fn test_difference_row_for_partial_date() {
        let bank = vec![row("b1", 3, "40"), row("b2", 3, "99")];
        let bookkeeping = vec![row("k1", 3, "40"), row("k2", 3, "90")];
        let report = StatementReconciler::new()
            .reconcile(&bookkeeping, &bank)
            .unwrap();

        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.unmatched_bank[0].id, "b2");
        assert_eq!(report.unmatched_bookkeeping[0].id, "k2");
        assert_eq!(report.adjustments.len(), 1);
        assert_eq!(report.adjustments[0].amount, BigDecimal::from(9));
        assert!(!report.is_balanced());
    }

    #[test]
    fn test_adjustment_covers_only_unmatched_rows() {
        let bank = vec![row("b1", 5, "10"), row("b2", 5, "5"), row("b3", 5, "7")];
        let bookkeeping = vec![row("k1", 5, "10"), row("k2", 5, "3"), row("k3", 6, "8")];
        let report = StatementReconciler::new()
            .reconcile(&bookkeeping, &bank)
            .unwrap();

        assert_eq!(report.matches.len(), 1);
        let unmatched: Vec<&str> = report.unmatched_bank.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(unmatched, vec!["b2", "b3"]);
        assert!(!report.unmatched_bank.iter().any(StatementRow::is_system));

        // 5 + 7 - 3 on the shared date, -8 for the bookkeeping-only date
        assert_eq!(report.adjustments.len(), 2);
        assert_eq!(report.adjustments[0].date, date(5));
        assert_eq!(report.adjustments[0].amount, BigDecimal::from(9));
        assert_eq!(report.adjustments[1].date, date(6));
        assert_eq!(report.adjustments[1].amount, BigDecimal::from(-8));
        assert_eq!(report.unmatched_bookkeeping.len(), 2);
    }

    #[test]
    fn test_unmatched_rows_with_equal_totals_need_no_adjustment() {
        // Neither 4 can be drawn from a single 8
        let bank = vec![row("b1", 4, "4"), row("b2", 4, "4")];
        let bookkeeping = vec![row("k1", 4, "8")];
        let report = StatementReconciler::new()
            .reconcile(&bookkeeping, &bank)
            .unwrap();
        assert!(report.matches.is_empty());
        assert!(report.adjustments.is_empty());
        assert_eq!(report.unmatched_bank.len(), 2);
        assert!(!report.is_balanced());
    }

    #[test]
    fn test_invalid_rows_rejected() {
        let bank = vec![StatementRow::with_id("b1", date(1), BigDecimal::from(1), "  ")];
        let err = StatementReconciler::new().reconcile(&[], &bank).unwrap_err();
        assert!(matches!(err, ReconciliationError::Validation(_)));
    }

    #[test]
    fn test_report_serializes() {
        let bank = vec![row("b1", 1, "12.34")];
        let bookkeeping = vec![row("k1", 1, "12.34")];
        let report = StatementReconciler::new()
            .reconcile(&bookkeeping, &bank)
            .unwrap();
        let json = serde_json::to_string(&report).unwrap();
        let back: StatementReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
