//! Settlement repository for database operations.
//!
//! Settlements record real-world payments between members. They are
//! append-only except for deletion by their creator; there is no update.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use splitpot_core::settlement::{self, SettlementError};
use splitpot_shared::types::{GroupId, SettlementId, UserId};

use crate::entities::{groups, settlements, user_groups};

/// Error types for settlement storage operations.
#[derive(Debug, thiserror::Error)]
pub enum SettlementStoreError {
    /// Settlement not found.
    #[error("Settlement not found: {0}")]
    NotFound(SettlementId),

    /// Group not found.
    #[error("Group not found: {0}")]
    GroupNotFound(GroupId),

    /// A settlement party is not a member of the group.
    #[error("User {0} is not a member of the group")]
    NotMember(UserId),

    /// The settlement violates a validation rule.
    #[error(transparent)]
    Invalid(#[from] SettlementError),

    /// Only the creator may delete a settlement.
    #[error("Settlement {0} was recorded by another user")]
    NotOwner(SettlementId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording a settlement.
#[derive(Debug, Clone)]
pub struct CreateSettlementInput {
    /// Group the settlement belongs to.
    pub group_id: GroupId,
    /// The member who paid.
    pub from_user_id: UserId,
    /// The member who received the payment.
    pub to_user_id: UserId,
    /// Amount paid (positive).
    pub amount: Decimal,
    /// How the payment was made (e.g. "cash", "transfer").
    pub payment_method: String,
    /// Optional free-form note.
    pub notes: Option<String>,
    /// The member recording the settlement.
    pub created_by_user_id: UserId,
}

/// Settlement repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct SettlementRepository {
    db: DatabaseConnection,
}

impl SettlementRepository {
    /// Creates a new settlement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a settlement.
    ///
    /// Over-payment is accepted: the amount is not capped at the current
    /// debt, and a larger payment simply flips the balance direction.
    ///
    /// # Errors
    ///
    /// Returns [`SettlementStoreError::Invalid`] if the parties coincide or
    /// the amount is not positive, [`SettlementStoreError::GroupNotFound`]
    /// if the group does not exist, [`SettlementStoreError::NotMember`] if
    /// either party or the recorder is not a member, or a database error if
    /// the insert fails.
    pub async fn create(
        &self,
        input: CreateSettlementInput,
    ) -> Result<settlements::Model, SettlementStoreError> {
        settlement::validate_settlement(input.from_user_id, input.to_user_id, input.amount)?;

        let group_exists = groups::Entity::find_by_id(input.group_id.into_inner())
            .count(&self.db)
            .await?;
        if group_exists == 0 {
            return Err(SettlementStoreError::GroupNotFound(input.group_id));
        }

        for party in [input.from_user_id, input.to_user_id, input.created_by_user_id] {
            if !self.is_member(input.group_id, party).await? {
                return Err(SettlementStoreError::NotMember(party));
            }
        }

        let record = settlements::ActiveModel {
            id: Set(SettlementId::new().into_inner()),
            group_id: Set(input.group_id.into_inner()),
            from_user_id: Set(input.from_user_id.into_inner()),
            to_user_id: Set(input.to_user_id.into_inner()),
            amount: Set(input.amount),
            payment_method: Set(input.payment_method),
            notes: Set(input.notes),
            created_by_user_id: Set(input.created_by_user_id.into_inner()),
            created_at: Set(chrono::Utc::now().into()),
        };

        Ok(record.insert(&self.db).await?)
    }

    /// Finds a settlement by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        id: SettlementId,
    ) -> Result<Option<settlements::Model>, DbErr> {
        settlements::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
    }

    /// Lists a group's settlements, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_group(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<settlements::Model>, DbErr> {
        settlements::Entity::find()
            .filter(settlements::Column::GroupId.eq(group_id.into_inner()))
            .order_by_desc(settlements::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Deletes a settlement, enforcing that only its creator may do so.
    ///
    /// # Errors
    ///
    /// Returns [`SettlementStoreError::NotFound`] if the settlement does
    /// not exist, [`SettlementStoreError::NotOwner`] if the acting user did
    /// not record it, or a database error if the delete fails.
    pub async fn delete_by_creator(
        &self,
        id: SettlementId,
        acting_user_id: UserId,
    ) -> Result<(), SettlementStoreError> {
        let record = settlements::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(SettlementStoreError::NotFound(id))?;

        if record.created_by_user_id != acting_user_id.into_inner() {
            return Err(SettlementStoreError::NotOwner(id));
        }

        record.delete(&self.db).await?;

        Ok(())
    }

    async fn is_member(&self, group_id: GroupId, user_id: UserId) -> Result<bool, DbErr> {
        let count = user_groups::Entity::find()
            .filter(user_groups::Column::GroupId.eq(group_id.into_inner()))
            .filter(user_groups::Column::UserId.eq(user_id.into_inner()))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}
