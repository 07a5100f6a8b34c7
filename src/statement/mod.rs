//! Dated statement reconciliation
//!
//! Bank rows and bookkeeping rows are grouped by date. Within one date each
//! bank row is matched against a subset of the bookkeeping rows that sums to
//! its amount, using the subset-sum engine. Whatever is left unmatched on a
//! date is reported together with a `System` adjustment row holding the
//! difference between the two sides.

pub mod reconciler;
pub mod row;

pub use reconciler::*;
pub use row::*;
