//! Group management routes, including membership and the balance summary.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use splitpot_db::repositories::balance::BalanceError;
use splitpot_db::repositories::group::GroupError;
use splitpot_db::{BalanceRepository, GroupRepository};
use splitpot_shared::types::{GroupId, UserId};

use crate::AppState;

/// Request body for creating a group.
#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    /// Group name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// The user creating the group; becomes its first member.
    pub creator_id: UserId,
}

/// Request body for adding a member.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// The user to add.
    pub user_id: UserId,
}

/// Creates the groups router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/groups", post(create_group))
        .route("/groups/{group_id}", get(get_group))
        .route("/users/{user_id}/groups", get(list_groups_for_user))
        .route("/groups/{group_id}/members", get(list_members))
        .route("/groups/{group_id}/members", post(add_member))
        .route(
            "/groups/{group_id}/members/{user_id}",
            delete(remove_member),
        )
        .route("/groups/{group_id}/summary", get(get_group_summary))
}

fn group_error_response(err: &GroupError) -> Response {
    match err {
        GroupError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Group not found"
            })),
        )
            .into_response(),
        GroupError::UserNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "User not found"
            })),
        )
            .into_response(),
        GroupError::AlreadyMember(_) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "already_member",
                "message": "User is already a member of this group"
            })),
        )
            .into_response(),
        GroupError::NotMember(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_member",
                "message": "User is not a member of this group"
            })),
        )
            .into_response(),
        GroupError::Database(e) => {
            error!(error = %e, "Database error in group operation");
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

/// POST /groups - Create a new group.
async fn create_group(
    State(state): State<AppState>,
    Json(payload): Json<CreateGroupRequest>,
) -> impl IntoResponse {
    if payload.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "Group name is required"
            })),
        )
            .into_response();
    }

    let repo = GroupRepository::new((*state.db).clone());

    match repo
        .create_with_creator(
            payload.name.trim(),
            payload.description.as_deref(),
            payload.creator_id,
        )
        .await
    {
        Ok(group) => {
            info!(group_id = %group.id, creator_id = %payload.creator_id, "Group created");
            (
                StatusCode::CREATED,
                Json(json!({
                    "id": group.id,
                    "name": group.name,
                    "description": group.description,
                    "created_at": group.created_at
                })),
            )
                .into_response()
        }
        Err(e) => group_error_response(&e),
    }
}

/// GET `/groups/{group_id}` - Get group details.
async fn get_group(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
) -> impl IntoResponse {
    let repo = GroupRepository::new((*state.db).clone());

    match repo.find_by_id(group_id).await {
        Ok(Some(group)) => (
            StatusCode::OK,
            Json(json!({
                "id": group.id,
                "name": group.name,
                "description": group.description,
                "created_at": group.created_at,
                "updated_at": group.updated_at
            })),
        )
            .into_response(),
        Ok(None) => group_error_response(&GroupError::NotFound(group_id)),
        Err(e) => group_error_response(&GroupError::Database(e)),
    }
}

/// GET `/users/{user_id}/groups` - List the groups a user belongs to.
async fn list_groups_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> impl IntoResponse {
    let repo = GroupRepository::new((*state.db).clone());

    match repo.list_for_user(user_id).await {
        Ok(groups) => {
            let body: Vec<_> = groups
                .iter()
                .map(|g| {
                    json!({
                        "id": g.group.id,
                        "name": g.group.name,
                        "description": g.group.description,
                        "member_count": g.member_count,
                        "created_at": g.group.created_at
                    })
                })
                .collect();
            (StatusCode::OK, Json(json!({ "groups": body }))).into_response()
        }
        Err(e) => group_error_response(&GroupError::Database(e)),
    }
}

/// GET `/groups/{group_id}/members` - List a group's members.
async fn list_members(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
) -> impl IntoResponse {
    let repo = GroupRepository::new((*state.db).clone());

    match repo.find_by_id(group_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return group_error_response(&GroupError::NotFound(group_id)),
        Err(e) => return group_error_response(&GroupError::Database(e)),
    }

    match repo.get_members(group_id).await {
        Ok(members) => {
            let body: Vec<_> = members
                .iter()
                .map(|u| {
                    json!({
                        "id": u.id,
                        "name": u.name,
                        "initial": u.initial
                    })
                })
                .collect();
            (StatusCode::OK, Json(json!({ "members": body }))).into_response()
        }
        Err(e) => group_error_response(&GroupError::Database(e)),
    }
}

/// POST `/groups/{group_id}/members` - Add a member to a group.
async fn add_member(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
    Json(payload): Json<AddMemberRequest>,
) -> impl IntoResponse {
    let repo = GroupRepository::new((*state.db).clone());

    match repo.add_member(group_id, payload.user_id).await {
        Ok(membership) => {
            info!(group_id = %group_id, user_id = %payload.user_id, "Member added");
            (
                StatusCode::CREATED,
                Json(json!({
                    "group_id": membership.group_id,
                    "user_id": membership.user_id,
                    "created_at": membership.created_at
                })),
            )
                .into_response()
        }
        Err(e) => group_error_response(&e),
    }
}

/// DELETE `/groups/{group_id}/members/{user_id}` - Remove a member.
async fn remove_member(
    State(state): State<AppState>,
    Path((group_id, user_id)): Path<(GroupId, UserId)>,
) -> impl IntoResponse {
    let repo = GroupRepository::new((*state.db).clone());

    match repo.remove_member(group_id, user_id).await {
        Ok(()) => {
            info!(group_id = %group_id, user_id = %user_id, "Member removed");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => group_error_response(&e),
    }
}

/// GET `/groups/{group_id}/summary` - Compute the group's balance summary.
async fn get_group_summary(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
) -> impl IntoResponse {
    let repo = BalanceRepository::new((*state.db).clone());

    match repo.compute_group_balances(group_id).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(BalanceError::GroupNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Group not found"
            })),
        )
            .into_response(),
        Err(BalanceError::Database(e)) => {
            error!(error = %e, "Database error computing group summary");
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
