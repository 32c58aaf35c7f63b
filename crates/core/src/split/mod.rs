//! Share allocation for expenses.
//!
//! Splits an expense amount evenly across its participants at minor-unit
//! precision using the Largest Remainder Method:
//! 1. Round the amount to minor units
//! 2. Floor the per-head quotient to minor units
//! 3. Hand the leftover cents one-by-one to the first participants in
//!    input order
//!
//! The sum of the resulting shares EXACTLY equals the amount; no cents are
//! lost or invented.

pub mod allocator;
pub mod error;

#[cfg(test)]
mod props;

pub use allocator::{ShareAllocation, allocate_shares};
pub use error::SplitError;
