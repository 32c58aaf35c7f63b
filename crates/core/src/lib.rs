//! Core business logic for Splitpot.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `split` - Share allocation for expenses (equal split, exact sums)
//! - `balance` - Per-member balance computation and classification
//! - `settlement` - Settlement validation rules

pub mod balance;
pub mod settlement;
pub mod split;
