//! Balance repository: loads group history and runs the balance engine.
//!
//! All balance math lives in the core crate; this repository only gathers
//! the group's members, expenses, shares, and settlements and joins user
//! names onto the computed result.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
};
use serde::Serialize;
use uuid::Uuid;

use splitpot_core::balance::{
    BalanceEngine, BalanceStatus, ExpenseRow, SettlementRow, ShareRow,
};
use splitpot_shared::types::{GroupId, UserId};

use crate::entities::{expense_shares, expenses, groups, settlements, user_groups, users};

/// Error types for balance computation.
#[derive(Debug, thiserror::Error)]
pub enum BalanceError {
    /// Group not found.
    #[error("Group not found: {0}")]
    GroupNotFound(GroupId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A member's balance joined with their display name and initial.
#[derive(Debug, Clone, Serialize)]
pub struct MemberBalanceDetail {
    /// The member.
    pub user_id: UserId,
    /// The member's display name.
    pub name: String,
    /// The member's single-character initial.
    pub initial: String,
    /// Signed net balance: positive = owed money, negative = owes money.
    pub balance: Decimal,
    /// Classification of the balance.
    pub status: BalanceStatus,
}

/// Computed balances for a group, ready for the API layer.
#[derive(Debug, Clone, Serialize)]
pub struct GroupBalanceSummary {
    /// The group.
    pub group_id: GroupId,
    /// Sum of all positive balances.
    pub total_outstanding: Decimal,
    /// Per-member balances, ordered by user id.
    pub members: Vec<MemberBalanceDetail>,
    /// The member with the largest positive balance, if any.
    pub suggested_creditor: Option<UserId>,
}

/// Balance repository: read-only queries feeding the balance engine.
#[derive(Debug, Clone)]
pub struct BalanceRepository {
    db: DatabaseConnection,
}

impl BalanceRepository {
    /// Creates a new balance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Computes the full balance summary for a group.
    ///
    /// Users who appear in the group's history but have since left are
    /// still reported; dropping them would break the zero-sum invariant.
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError::GroupNotFound`] if the group does not exist,
    /// or a database error if a query fails.
    pub async fn compute_group_balances(
        &self,
        group_id: GroupId,
    ) -> Result<GroupBalanceSummary, BalanceError> {
        let group_exists = groups::Entity::find_by_id(group_id.into_inner())
            .count(&self.db)
            .await?;
        if group_exists == 0 {
            return Err(BalanceError::GroupNotFound(group_id));
        }

        let member_ids: Vec<UserId> = user_groups::Entity::find()
            .filter(user_groups::Column::GroupId.eq(group_id.into_inner()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| UserId::from(m.user_id))
            .collect();

        let expense_list = expenses::Entity::find()
            .filter(expenses::Column::GroupId.eq(group_id.into_inner()))
            .all(&self.db)
            .await?;

        let expense_ids: Vec<Uuid> = expense_list.iter().map(|e| e.id).collect();

        let mut shares_by_expense: HashMap<Uuid, Vec<ShareRow>> = HashMap::new();
        if !expense_ids.is_empty() {
            let share_list = expense_shares::Entity::find()
                .filter(expense_shares::Column::ExpenseId.is_in(expense_ids))
                .all(&self.db)
                .await?;

            for share in share_list {
                shares_by_expense
                    .entry(share.expense_id)
                    .or_default()
                    .push(ShareRow {
                        user_id: UserId::from(share.user_id),
                        amount: share.share_amount,
                    });
            }
        }

        let expense_rows: Vec<ExpenseRow> = expense_list
            .into_iter()
            .map(|expense| ExpenseRow {
                payer_id: UserId::from(expense.paid_by_user_id),
                amount: expense.amount,
                shares: shares_by_expense.remove(&expense.id).unwrap_or_default(),
            })
            .collect();

        let settlement_rows: Vec<SettlementRow> = settlements::Entity::find()
            .filter(settlements::Column::GroupId.eq(group_id.into_inner()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|s| SettlementRow {
                from_user_id: UserId::from(s.from_user_id),
                to_user_id: UserId::from(s.to_user_id),
                amount: s.amount,
            })
            .collect();

        let balances = BalanceEngine::compute(&member_ids, &expense_rows, &settlement_rows);
        let suggested_creditor = BalanceEngine::suggest_creditor(&balances.members);

        let balance_user_ids: Vec<Uuid> = balances
            .members
            .iter()
            .map(|m| m.user_id.into_inner())
            .collect();

        let names: HashMap<Uuid, (String, String)> = users::Entity::find()
            .filter(users::Column::Id.is_in(balance_user_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|u| (u.id, (u.name, u.initial)))
            .collect();

        let members = balances
            .members
            .into_iter()
            .map(|member| {
                let (name, initial) = names
                    .get(&member.user_id.into_inner())
                    .cloned()
                    .unwrap_or_default();
                MemberBalanceDetail {
                    user_id: member.user_id,
                    name,
                    initial,
                    balance: member.balance,
                    status: member.status,
                }
            })
            .collect();

        Ok(GroupBalanceSummary {
            group_id,
            total_outstanding: balances.total_outstanding,
            members,
            suggested_creditor,
        })
    }
}
