//! User repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};

use splitpot_shared::types::UserId;

use crate::entities::users;

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// User not found.
    #[error("User not found: {0}")]
    NotFound(UserId),

    /// Email address is already registered.
    #[error("Email already registered: {0}")]
    EmailTaken(String),

    /// Update request carried no fields to change.
    #[error("Nothing to update")]
    EmptyUpdate,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new user.
    ///
    /// The display initial is derived from the first character of the name.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::EmailTaken`] if the email is already registered,
    /// or a database error if the insert fails.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        notifications_enabled: bool,
    ) -> Result<users::Model, UserError> {
        let taken = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        if taken > 0 {
            return Err(UserError::EmailTaken(email.to_string()));
        }

        let now = chrono::Utc::now().into();

        let user = users::ActiveModel {
            id: Set(UserId::new().into_inner()),
            name: Set(name.to_string()),
            initial: Set(derive_initial(name)),
            email: Set(email.to_string()),
            notifications_enabled: Set(notifications_enabled),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(user.insert(&self.db).await?)
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id.into_inner()).one(&self.db).await
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Updates a user's profile.
    ///
    /// Only the provided fields change; the initial follows the name.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::EmptyUpdate`] if no field was provided,
    /// [`UserError::NotFound`] if the user does not exist, or a database
    /// error if the update fails.
    pub async fn update_profile(
        &self,
        id: UserId,
        name: Option<&str>,
        notifications_enabled: Option<bool>,
    ) -> Result<users::Model, UserError> {
        if name.is_none() && notifications_enabled.is_none() {
            return Err(UserError::EmptyUpdate);
        }

        let user = users::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(UserError::NotFound(id))?;

        let mut active: users::ActiveModel = user.into();

        if let Some(name) = name {
            active.name = Set(name.to_string());
            active.initial = Set(derive_initial(name));
        }
        if let Some(enabled) = notifications_enabled {
            active.notifications_enabled = Set(enabled);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }
}

/// Derives the single-character display initial from a name.
fn derive_initial(name: &str) -> String {
    name.chars()
        .find(|c| !c.is_whitespace())
        .map_or_else(|| "?".to_string(), |c| c.to_uppercase().to_string())
}

#[cfg(test)]
mod tests {
    use super::derive_initial;

    #[test]
    fn test_derive_initial_uppercases() {
        assert_eq!(derive_initial("alice"), "A");
        assert_eq!(derive_initial("Bob"), "B");
    }

    #[test]
    fn test_derive_initial_skips_leading_whitespace() {
        assert_eq!(derive_initial("  carol"), "C");
    }

    #[test]
    fn test_derive_initial_empty_name() {
        assert_eq!(derive_initial(""), "?");
        assert_eq!(derive_initial("   "), "?");
    }
}
