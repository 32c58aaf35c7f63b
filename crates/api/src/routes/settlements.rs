//! Settlement routes: recording, listing, and creator-only deletion.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use splitpot_db::SettlementRepository;
use splitpot_db::entities::settlements;
use splitpot_db::repositories::settlement::{CreateSettlementInput, SettlementStoreError};
use splitpot_shared::types::{GroupId, SettlementId, UserId};

use crate::AppState;

/// Request body for recording a settlement.
#[derive(Debug, Deserialize)]
pub struct CreateSettlementRequest {
    /// The member who paid.
    pub from_user_id: UserId,
    /// The member who received the payment.
    pub to_user_id: UserId,
    /// Amount paid (positive).
    pub amount: Decimal,
    /// How the payment was made. Defaults to "cash".
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
    /// Optional free-form note.
    pub notes: Option<String>,
    /// The member recording the settlement.
    pub created_by_user_id: UserId,
}

fn default_payment_method() -> String {
    "cash".to_string()
}

/// Query parameters for deleting a settlement.
#[derive(Debug, Deserialize)]
pub struct DeleteSettlementQuery {
    /// The member requesting the deletion; must be the creator.
    pub user_id: UserId,
}

/// Creates the settlements router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/groups/{group_id}/settlements", post(create_settlement))
        .route("/groups/{group_id}/settlements", get(list_settlements))
        .route("/settlements/{settlement_id}", get(get_settlement))
        .route("/settlements/{settlement_id}", delete(delete_settlement))
}

fn settlement_json(settlement: &settlements::Model) -> serde_json::Value {
    json!({
        "id": settlement.id,
        "group_id": settlement.group_id,
        "from_user_id": settlement.from_user_id,
        "to_user_id": settlement.to_user_id,
        "amount": settlement.amount,
        "payment_method": settlement.payment_method,
        "notes": settlement.notes,
        "created_by_user_id": settlement.created_by_user_id,
        "created_at": settlement.created_at
    })
}

fn settlement_error_response(err: &SettlementStoreError) -> Response {
    match err {
        SettlementStoreError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Settlement not found"
            })),
        )
            .into_response(),
        SettlementStoreError::GroupNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Group not found"
            })),
        )
            .into_response(),
        SettlementStoreError::NotMember(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "not_member",
                "message": format!("User {id} is not a member of this group")
            })),
        )
            .into_response(),
        SettlementStoreError::Invalid(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": e.error_code(),
                "message": e.to_string()
            })),
        )
            .into_response(),
        SettlementStoreError::NotOwner(_) => (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "forbidden",
                "message": "Only the user who recorded a settlement can delete it"
            })),
        )
            .into_response(),
        SettlementStoreError::Database(e) => {
            error!(error = %e, "Database error in settlement operation");
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

/// POST `/groups/{group_id}/settlements` - Record a settlement.
async fn create_settlement(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
    Json(payload): Json<CreateSettlementRequest>,
) -> impl IntoResponse {
    let repo = SettlementRepository::new((*state.db).clone());

    match repo
        .create(CreateSettlementInput {
            group_id,
            from_user_id: payload.from_user_id,
            to_user_id: payload.to_user_id,
            amount: payload.amount,
            payment_method: payload.payment_method,
            notes: payload.notes,
            created_by_user_id: payload.created_by_user_id,
        })
        .await
    {
        Ok(settlement) => {
            info!(
                settlement_id = %settlement.id,
                group_id = %group_id,
                amount = %settlement.amount,
                "Settlement recorded"
            );
            (StatusCode::CREATED, Json(settlement_json(&settlement))).into_response()
        }
        Err(e) => settlement_error_response(&e),
    }
}

/// GET `/settlements/{settlement_id}` - Get settlement details.
async fn get_settlement(
    State(state): State<AppState>,
    Path(settlement_id): Path<SettlementId>,
) -> impl IntoResponse {
    let repo = SettlementRepository::new((*state.db).clone());

    match repo.find_by_id(settlement_id).await {
        Ok(Some(settlement)) => {
            (StatusCode::OK, Json(settlement_json(&settlement))).into_response()
        }
        Ok(None) => settlement_error_response(&SettlementStoreError::NotFound(settlement_id)),
        Err(e) => settlement_error_response(&SettlementStoreError::Database(e)),
    }
}

/// GET `/groups/{group_id}/settlements` - List a group's settlements.
async fn list_settlements(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
) -> impl IntoResponse {
    let repo = SettlementRepository::new((*state.db).clone());

    match repo.list_for_group(group_id).await {
        Ok(settlement_list) => {
            let body: Vec<_> = settlement_list.iter().map(settlement_json).collect();
            (StatusCode::OK, Json(json!({ "settlements": body }))).into_response()
        }
        Err(e) => settlement_error_response(&SettlementStoreError::Database(e)),
    }
}

/// DELETE `/settlements/{settlement_id}` - Delete a settlement (creator only).
async fn delete_settlement(
    State(state): State<AppState>,
    Path(settlement_id): Path<SettlementId>,
    Query(query): Query<DeleteSettlementQuery>,
) -> impl IntoResponse {
    let repo = SettlementRepository::new((*state.db).clone());

    match repo.delete_by_creator(settlement_id, query.user_id).await {
        Ok(()) => {
            info!(settlement_id = %settlement_id, user_id = %query.user_id, "Settlement deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => settlement_error_response(&e),
    }
}
