//! Expense repository for database operations.
//!
//! Expense creation allocates equal shares through the core split module
//! and persists the expense together with its share rows in a single
//! transaction, so an expense can never exist without a complete set of
//! shares summing to its amount.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use splitpot_core::split::{self, SplitError};
use splitpot_shared::types::{ExpenseId, GroupId, UserId};

use crate::entities::{expense_shares, expenses, groups, user_groups, users};

/// Error types for expense operations.
#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    /// Expense not found.
    #[error("Expense not found: {0}")]
    NotFound(ExpenseId),

    /// Group not found.
    #[error("Group not found: {0}")]
    GroupNotFound(GroupId),

    /// The payer is not a member of the group.
    #[error("Payer {0} is not a member of the group")]
    PayerNotMember(UserId),

    /// A participant is not a member of the group.
    #[error("Participant {0} is not a member of the group")]
    ParticipantNotMember(UserId),

    /// A participant appears more than once.
    #[error("Participant {0} listed more than once")]
    DuplicateParticipant(UserId),

    /// Share allocation failed.
    #[error(transparent)]
    Split(#[from] SplitError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    /// Group the expense belongs to.
    pub group_id: GroupId,
    /// Short description of what was paid for.
    pub title: String,
    /// Total amount paid (positive).
    pub amount: Decimal,
    /// Date the expense occurred.
    pub date: NaiveDate,
    /// The member who paid.
    pub paid_by_user_id: UserId,
    /// Members the expense is split between.
    pub participant_ids: Vec<UserId>,
    /// Optional category label.
    pub category: Option<String>,
    /// Optional receipt image URL.
    pub receipt_url: Option<String>,
}

/// One share of an expense, joined with the participant's name.
#[derive(Debug, Clone)]
pub struct ShareDetail {
    /// The participant.
    pub user_id: UserId,
    /// The participant's display name.
    pub user_name: String,
    /// The allocated amount.
    pub share_amount: Decimal,
}

/// An expense together with its share rows.
#[derive(Debug, Clone)]
pub struct ExpenseWithShares {
    /// The expense row.
    pub expense: expenses::Model,
    /// The allocated shares, with participant names.
    pub shares: Vec<ShareDetail>,
}

/// Expense repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an expense and its equal-split share rows atomically.
    ///
    /// Shares are allocated with the largest remainder method; the first
    /// participants in list order carry any extra minor unit.
    ///
    /// # Errors
    ///
    /// Returns [`ExpenseError::GroupNotFound`] if the group does not exist,
    /// [`ExpenseError::PayerNotMember`] or
    /// [`ExpenseError::ParticipantNotMember`] on membership violations,
    /// [`ExpenseError::DuplicateParticipant`] if a participant repeats,
    /// [`ExpenseError::Split`] if the amount cannot be allocated, or a
    /// database error if the insert fails.
    pub async fn create(&self, input: CreateExpenseInput) -> Result<expenses::Model, ExpenseError> {
        let group_exists = groups::Entity::find_by_id(input.group_id.into_inner())
            .count(&self.db)
            .await?;
        if group_exists == 0 {
            return Err(ExpenseError::GroupNotFound(input.group_id));
        }

        let member_ids: BTreeSet<Uuid> = user_groups::Entity::find()
            .filter(user_groups::Column::GroupId.eq(input.group_id.into_inner()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| m.user_id)
            .collect();

        if !member_ids.contains(&input.paid_by_user_id.into_inner()) {
            return Err(ExpenseError::PayerNotMember(input.paid_by_user_id));
        }

        let mut seen = BTreeSet::new();
        for participant in &input.participant_ids {
            if !seen.insert(*participant) {
                return Err(ExpenseError::DuplicateParticipant(*participant));
            }
            if !member_ids.contains(&participant.into_inner()) {
                return Err(ExpenseError::ParticipantNotMember(*participant));
            }
        }

        let allocations = split::allocate_shares(input.amount, &input.participant_ids)?;

        let txn = self.db.begin().await?;

        let now = chrono::Utc::now().into();
        let expense_id = ExpenseId::new();

        let expense = expenses::ActiveModel {
            id: Set(expense_id.into_inner()),
            group_id: Set(input.group_id.into_inner()),
            title: Set(input.title),
            amount: Set(input.amount),
            date: Set(input.date),
            paid_by_user_id: Set(input.paid_by_user_id.into_inner()),
            category: Set(input.category),
            receipt_url: Set(input.receipt_url),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let expense = expense.insert(&txn).await?;

        for allocation in allocations {
            let share = expense_shares::ActiveModel {
                expense_id: Set(expense_id.into_inner()),
                user_id: Set(allocation.user_id.into_inner()),
                share_amount: Set(allocation.amount),
                created_at: Set(now),
            };
            share.insert(&txn).await?;
        }

        txn.commit().await?;

        Ok(expense)
    }

    /// Finds an expense with its shares and participant names.
    ///
    /// # Errors
    ///
    /// Returns [`ExpenseError::NotFound`] if the expense does not exist,
    /// or a database error if the query fails.
    pub async fn find_with_shares(&self, id: ExpenseId) -> Result<ExpenseWithShares, ExpenseError> {
        let expense = expenses::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(ExpenseError::NotFound(id))?;

        let shares = expense_shares::Entity::find()
            .filter(expense_shares::Column::ExpenseId.eq(id.into_inner()))
            .find_also_related(users::Entity)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(share, user)| ShareDetail {
                user_id: UserId::from(share.user_id),
                user_name: user.map(|u| u.name).unwrap_or_default(),
                share_amount: share.share_amount,
            })
            .collect();

        Ok(ExpenseWithShares { expense, shares })
    }

    /// Lists a group's expenses, newest first (by date, then creation time).
    ///
    /// An optional search term filters on the title, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_group(
        &self,
        group_id: GroupId,
        title_search: Option<&str>,
    ) -> Result<Vec<expenses::Model>, DbErr> {
        let mut query = expenses::Entity::find()
            .filter(expenses::Column::GroupId.eq(group_id.into_inner()));

        if let Some(term) = title_search {
            let pattern = format!("%{}%", escape_like(term));
            query = query.filter(
                Expr::col((expenses::Entity, expenses::Column::Title)).ilike(pattern),
            );
        }

        query
            .order_by_desc(expenses::Column::Date)
            .order_by_desc(expenses::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Loads the raw share rows for a set of expenses.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn shares_for_expenses(
        &self,
        expense_ids: &[Uuid],
    ) -> Result<Vec<expense_shares::Model>, DbErr> {
        if expense_ids.is_empty() {
            return Ok(Vec::new());
        }

        expense_shares::Entity::find()
            .filter(expense_shares::Column::ExpenseId.is_in(expense_ids.iter().copied()))
            .all(&self.db)
            .await
    }
}

/// Escapes LIKE metacharacters in a user-supplied search term.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
