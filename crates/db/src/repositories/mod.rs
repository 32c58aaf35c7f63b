//! Repository layer for database operations.

pub mod balance;
pub mod expense;
pub mod group;
pub mod settlement;
pub mod user;

pub use balance::{BalanceError, BalanceRepository, GroupBalanceSummary, MemberBalanceDetail};
pub use expense::{
    CreateExpenseInput, ExpenseError, ExpenseRepository, ExpenseWithShares, ShareDetail,
};
pub use group::{GroupError, GroupRepository, GroupWithMemberCount};
pub use settlement::{CreateSettlementInput, SettlementRepository, SettlementStoreError};
pub use user::{UserError, UserRepository};
