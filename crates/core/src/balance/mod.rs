//! Per-member balance computation and classification.
//!
//! This module implements the balance engine: it folds a group's full
//! history of expense shares and settlements into one signed net balance
//! per member, classifies each member as creditor/debtor/settled, and
//! suggests who a debtor should pay first.
//!
//! The engine is pure and deterministic: it has no side effects, is
//! recomputed from committed history on every call, and never caches.

pub mod engine;
pub mod types;

#[cfg(test)]
mod props;

pub use engine::{BalanceEngine, settled_epsilon};
pub use types::{
    BalanceStatus, ExpenseRow, GroupBalances, MemberBalance, SettlementRow, ShareRow,
};
