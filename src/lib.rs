//! # Reconcile Core
//!
//! Exhaustive subset-sum reconciliation of a demand list against a supply
//! list, plus dated bank/bookkeeping statement matching built on top of it.
//!
//! ## Features
//!
//! - **Subset-sum search**: first matching subset by size, then by position order
//! - **Reconciliation engine**: consumes demand values and the supply subsets covering them until nothing more matches
//! - **Statement matching**: per-date bank vs bookkeeping reconciliation with `System` adjustment rows
//! - **Exact amounts**: integers and `BigDecimal` compare exactly; sums never overflow silently
//!
//! ## Quick Start
//!
//! ```rust
//! use reconcile_core::{find_subset_sum, process_lists};
//!
//! let witness = find_subset_sum(&7, &[3, 3, 4, 5, 6]).unwrap().unwrap();
//! assert_eq!(witness.positions(), &[0, 2]);
//!
//! let mut demand = vec![7, 10, 12];
//! let mut supply = vec![3, 3, 4, 5, 6];
//! let (demand, supply) = process_lists(&mut demand, &mut supply).unwrap();
//! assert_eq!(demand, vec![10, 12]);
//! assert_eq!(supply, vec![3, 5, 6]);
//! ```

pub mod reconciliation;
pub mod statement;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use reconciliation::*;
pub use statement::*;
pub use traits::*;
pub use types::*;
