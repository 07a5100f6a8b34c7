//! Subset-sum reconciliation of demand values against supply values

pub mod combinations;
pub mod engine;
pub mod finder;
pub mod options;

pub use combinations::*;
pub use engine::*;
pub use finder::*;
pub use options::*;
