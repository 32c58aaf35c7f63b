//! User management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use splitpot_db::UserRepository;
use splitpot_db::entities::users;
use splitpot_db::repositories::user::UserError;
use splitpot_shared::types::UserId;

use crate::AppState;

/// Request body for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Display name.
    pub name: String,
    /// Email address (unique).
    pub email: String,
    /// Whether the user wants notifications. Defaults to true.
    #[serde(default = "default_notifications")]
    pub notifications_enabled: bool,
}

const fn default_notifications() -> bool {
    true
}

/// Request body for updating a user's profile.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    /// New display name.
    pub name: Option<String>,
    /// New notification preference.
    pub notifications_enabled: Option<bool>,
}

/// Creates the users router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/{user_id}", get(get_user))
        .route("/users/{user_id}", patch(update_user))
}

fn user_json(user: &users::Model) -> serde_json::Value {
    json!({
        "id": user.id,
        "name": user.name,
        "initial": user.initial,
        "email": user.email,
        "notifications_enabled": user.notifications_enabled,
        "created_at": user.created_at,
        "updated_at": user.updated_at
    })
}

fn user_error_response(err: &UserError) -> Response {
    match err {
        UserError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "User not found"
            })),
        )
            .into_response(),
        UserError::EmailTaken(_) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "email_taken",
                "message": "A user with this email already exists"
            })),
        )
            .into_response(),
        UserError::EmptyUpdate => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "No fields to update"
            })),
        )
            .into_response(),
        UserError::Database(e) => {
            error!(error = %e, "Database error in user operation");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}

/// POST /users - Create a new user.
async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> impl IntoResponse {
    if payload.name.trim().is_empty() || payload.email.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "Name and email are required"
            })),
        )
            .into_response();
    }

    let repo = UserRepository::new((*state.db).clone());

    match repo
        .create(
            payload.name.trim(),
            payload.email.trim(),
            payload.notifications_enabled,
        )
        .await
    {
        Ok(user) => {
            info!(user_id = %user.id, "User created");
            (StatusCode::CREATED, Json(user_json(&user))).into_response()
        }
        Err(e) => user_error_response(&e),
    }
}

/// GET `/users/{user_id}` - Get user details.
async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> impl IntoResponse {
    let repo = UserRepository::new((*state.db).clone());

    match repo.find_by_id(user_id).await {
        Ok(Some(user)) => (StatusCode::OK, Json(user_json(&user))).into_response(),
        Ok(None) => user_error_response(&UserError::NotFound(user_id)),
        Err(e) => user_error_response(&UserError::Database(e)),
    }
}

/// PATCH `/users/{user_id}` - Update a user's profile.
async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(payload): Json<UpdateUserRequest>,
) -> impl IntoResponse {
    let repo = UserRepository::new((*state.db).clone());

    match repo
        .update_profile(
            user_id,
            payload.name.as_deref(),
            payload.notifications_enabled,
        )
        .await
    {
        Ok(user) => {
            info!(user_id = %user.id, "User profile updated");
            (StatusCode::OK, Json(user_json(&user))).into_response()
        }
        Err(e) => user_error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::State;
    use rstest::rstest;
    use sea_orm::DatabaseConnection;

    use super::*;

    // Input validation runs before the repository is touched, so a
    // disconnected handle is enough to exercise the rejection paths.
    fn disconnected_state() -> AppState {
        AppState {
            db: Arc::new(DatabaseConnection::Disconnected),
        }
    }

    #[rstest]
    #[case("", "alice@example.com")]
    #[case("   ", "alice@example.com")]
    #[case("Alice", "")]
    #[case("Alice", "   ")]
    #[tokio::test]
    async fn test_create_user_requires_name_and_email(#[case] name: &str, #[case] email: &str) {
        let response = create_user(
            State(disconnected_state()),
            Json(CreateUserRequest {
                name: name.to_string(),
                email: email.to_string(),
                notifications_enabled: true,
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
