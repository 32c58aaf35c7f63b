//! `SeaORM` entity definitions.

pub mod expense_shares;
pub mod expenses;
pub mod groups;
pub mod settlements;
pub mod user_groups;
pub mod users;
