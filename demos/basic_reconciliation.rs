//! Basic reconciliation example
//!
//! Run with `RUST_LOG=debug` to see each pass.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use reconcile_core::{process_lists, StatementReconciler, StatementRow};
use std::str::FromStr;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Subset-sum reconciliation\n");

    let mut demand = vec![7, 10, 12];
    let mut supply = vec![3, 3, 4, 5, 6];
    println!("  Demand: {:?}", demand);
    println!("  Supply: {:?}\n", supply);

    let (remaining_demand, remaining_supply) = process_lists(&mut demand, &mut supply)?;
    println!("  Remaining in demand: {:?}", remaining_demand);
    println!("  Remaining in supply: {:?}\n", remaining_supply);

    println!("Statement reconciliation\n");

    let date = NaiveDate::from_ymd_opt(2024, 1, 15).ok_or("invalid date")?;
    let bank = vec![
        StatementRow::new(date, BigDecimal::from_str("1250.00")?, "Client A"),
        StatementRow::new(date, BigDecimal::from_str("310.40")?, "Client B"),
    ];
    let bookkeeping = vec![
        StatementRow::new(date, BigDecimal::from_str("1000.00")?, "Invoice 1001"),
        StatementRow::new(date, BigDecimal::from_str("250.00")?, "Invoice 1002"),
        StatementRow::new(date, BigDecimal::from_str("300.00")?, "Invoice 1003"),
    ];

    let report = StatementReconciler::new().reconcile(&bookkeeping, &bank)?;

    for matched in &report.matches {
        let parts: Vec<String> = matched
            .bookkeeping_rows
            .iter()
            .map(|row| format!("{} ({})", row.amount, row.issuer))
            .collect();
        println!(
            "  ✓ {} from {} covered by {}",
            matched.bank_row.amount,
            matched.bank_row.issuer,
            parts.join(" + ")
        );
    }
    for row in &report.unmatched_bank {
        println!("  ✗ Bank {} from {} unmatched", row.amount, row.issuer);
    }
    for row in &report.unmatched_bookkeeping {
        println!("  ✗ Bookkeeping {} ({}) unmatched", row.amount, row.issuer);
    }
    for row in &report.adjustments {
        println!("  ± {} adjustment on {}: {}", row.issuer, row.date, row.amount);
    }

    Ok(())
}
