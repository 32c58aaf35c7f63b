//! Shared type definitions.

pub mod id;
pub mod money;

pub use id::{ExpenseId, GroupId, SettlementId, UserId};
pub use money::{MINOR_UNIT_PLACES, minor_unit, round_to_minor_units};
