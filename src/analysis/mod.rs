//! Analysis modules.
//!
//! Salary statistics live in `salary`; frequency and skill tables in
//! `aggregator`.

pub mod aggregator;
pub mod salary;

pub use aggregator::*;
pub use salary::*;
