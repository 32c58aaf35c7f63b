//! Group repository for database operations.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use splitpot_shared::types::{GroupId, UserId};

use crate::entities::{groups, user_groups, users};

/// Error types for group operations.
#[derive(Debug, thiserror::Error)]
pub enum GroupError {
    /// Group not found.
    #[error("Group not found: {0}")]
    NotFound(GroupId),

    /// User not found.
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// User is already a member of the group.
    #[error("User {0} is already a member")]
    AlreadyMember(UserId),

    /// User is not a member of the group.
    #[error("User {0} is not a member")]
    NotMember(UserId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A group together with its member count, for list views.
#[derive(Debug, Clone)]
pub struct GroupWithMemberCount {
    /// The group.
    pub group: groups::Model,
    /// Number of current members.
    pub member_count: u64,
}

/// Group repository for CRUD and membership operations.
#[derive(Debug, Clone)]
pub struct GroupRepository {
    db: DatabaseConnection,
}

impl GroupRepository {
    /// Creates a new group repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new group with the creator as its first member.
    ///
    /// # Errors
    ///
    /// Returns [`GroupError::UserNotFound`] if the creator does not exist,
    /// or a database error if the insert fails.
    pub async fn create_with_creator(
        &self,
        name: &str,
        description: Option<&str>,
        creator_id: UserId,
    ) -> Result<groups::Model, GroupError> {
        let creator_exists = users::Entity::find_by_id(creator_id.into_inner())
            .count(&self.db)
            .await?;
        if creator_exists == 0 {
            return Err(GroupError::UserNotFound(creator_id));
        }

        let txn = self.db.begin().await?;

        let now = chrono::Utc::now().into();
        let group_id = GroupId::new();

        let group = groups::ActiveModel {
            id: Set(group_id.into_inner()),
            name: Set(name.to_string()),
            description: Set(description.map(ToString::to_string)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let group = group.insert(&txn).await?;

        let membership = user_groups::ActiveModel {
            user_id: Set(creator_id.into_inner()),
            group_id: Set(group_id.into_inner()),
            created_at: Set(now),
        };

        membership.insert(&txn).await?;

        txn.commit().await?;

        Ok(group)
    }

    /// Finds a group by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: GroupId) -> Result<Option<groups::Model>, DbErr> {
        groups::Entity::find_by_id(id.into_inner()).one(&self.db).await
    }

    /// Lists the groups a user belongs to, with member counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<GroupWithMemberCount>, DbErr> {
        let memberships = user_groups::Entity::find()
            .filter(user_groups::Column::UserId.eq(user_id.into_inner()))
            .all(&self.db)
            .await?;

        let group_ids: Vec<Uuid> = memberships.iter().map(|m| m.group_id).collect();
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }

        let group_list = groups::Entity::find()
            .filter(groups::Column::Id.is_in(group_ids.clone()))
            .all(&self.db)
            .await?;

        let all_memberships = user_groups::Entity::find()
            .filter(user_groups::Column::GroupId.is_in(group_ids))
            .all(&self.db)
            .await?;

        let mut counts: HashMap<Uuid, u64> = HashMap::new();
        for membership in &all_memberships {
            *counts.entry(membership.group_id).or_default() += 1;
        }

        Ok(group_list
            .into_iter()
            .map(|group| {
                let member_count = counts.get(&group.id).copied().unwrap_or(0);
                GroupWithMemberCount {
                    group,
                    member_count,
                }
            })
            .collect())
    }

    /// Gets all members of a group.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_members(&self, group_id: GroupId) -> Result<Vec<users::Model>, DbErr> {
        user_groups::Entity::find()
            .filter(user_groups::Column::GroupId.eq(group_id.into_inner()))
            .find_also_related(users::Entity)
            .all(&self.db)
            .await
            .map(|rows| rows.into_iter().filter_map(|(_, user)| user).collect())
    }

    /// Adds a user to a group.
    ///
    /// # Errors
    ///
    /// Returns [`GroupError::NotFound`] if the group does not exist,
    /// [`GroupError::UserNotFound`] if the user does not exist,
    /// [`GroupError::AlreadyMember`] if the user is already a member,
    /// or a database error if the insert fails.
    pub async fn add_member(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<user_groups::Model, GroupError> {
        let group_exists = groups::Entity::find_by_id(group_id.into_inner())
            .count(&self.db)
            .await?;
        if group_exists == 0 {
            return Err(GroupError::NotFound(group_id));
        }

        let user_exists = users::Entity::find_by_id(user_id.into_inner())
            .count(&self.db)
            .await?;
        if user_exists == 0 {
            return Err(GroupError::UserNotFound(user_id));
        }

        if self.is_member(group_id, user_id).await? {
            return Err(GroupError::AlreadyMember(user_id));
        }

        let membership = user_groups::ActiveModel {
            user_id: Set(user_id.into_inner()),
            group_id: Set(group_id.into_inner()),
            created_at: Set(chrono::Utc::now().into()),
        };

        Ok(membership.insert(&self.db).await?)
    }

    /// Removes a user from a group.
    ///
    /// Departed members keep their rows in expense and settlement history,
    /// so their balance stays visible in the group summary.
    ///
    /// # Errors
    ///
    /// Returns [`GroupError::NotMember`] if the user is not a member,
    /// or a database error if the delete fails.
    pub async fn remove_member(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<(), GroupError> {
        let membership = user_groups::Entity::find()
            .filter(user_groups::Column::GroupId.eq(group_id.into_inner()))
            .filter(user_groups::Column::UserId.eq(user_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(GroupError::NotMember(user_id))?;

        membership.delete(&self.db).await?;

        Ok(())
    }

    /// Checks if a user is a member of a group.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn is_member(&self, group_id: GroupId, user_id: UserId) -> Result<bool, DbErr> {
        let count = user_groups::Entity::find()
            .filter(user_groups::Column::GroupId.eq(group_id.into_inner()))
            .filter(user_groups::Column::UserId.eq(user_id.into_inner()))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}
