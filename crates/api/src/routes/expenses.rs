//! Expense routes: creation with equal-split allocation, detail, and listing.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use splitpot_db::ExpenseRepository;
use splitpot_db::entities::expenses;
use splitpot_db::repositories::expense::{CreateExpenseInput, ExpenseError};
use splitpot_shared::types::{ExpenseId, GroupId, UserId};

use crate::AppState;

/// Request body for creating an expense.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    /// Short description of what was paid for.
    pub title: String,
    /// Total amount paid (positive, at most 2 decimal places of precision
    /// are kept).
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

/// Query parameters for listing expenses.
#[derive(Debug, Deserialize)]
pub struct ListExpensesQuery {
    /// Case-insensitive title filter.
    pub search: Option<String>,
}

/// Creates the expenses router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/groups/{group_id}/expenses", post(create_expense))
        .route("/groups/{group_id}/expenses", get(list_expenses))
        .route("/expenses/{expense_id}", get(get_expense))
}

fn expense_json(expense: &expenses::Model) -> serde_json::Value {
    json!({
        "id": expense.id,
        "group_id": expense.group_id,
        "title": expense.title,
        "amount": expense.amount,
        "date": expense.date,
        "paid_by_user_id": expense.paid_by_user_id,
        "category": expense.category,
        "receipt_url": expense.receipt_url,
        "created_at": expense.created_at
    })
}

fn expense_error_response(err: &ExpenseError) -> Response {
    match err {
        ExpenseError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Expense not found"
            })),
        )
            .into_response(),
        ExpenseError::GroupNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Group not found"
            })),
        )
            .into_response(),
        ExpenseError::PayerNotMember(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "payer_not_member",
                "message": format!("Payer {id} is not a member of this group")
            })),
        )
            .into_response(),
        ExpenseError::ParticipantNotMember(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "participant_not_member",
                "message": format!("Participant {id} is not a member of this group")
            })),
        )
            .into_response(),
        ExpenseError::DuplicateParticipant(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "duplicate_participant",
                "message": format!("Participant {id} is listed more than once")
            })),
        )
            .into_response(),
        ExpenseError::Split(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": e.error_code(),
                "message": e.to_string()
            })),
        )
            .into_response(),
        ExpenseError::Database(e) => {
            error!(error = %e, "Database error in expense operation");
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

/// POST `/groups/{group_id}/expenses` - Create an expense with equal shares.
async fn create_expense(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
    Json(payload): Json<CreateExpenseRequest>,
) -> impl IntoResponse {
    if payload.title.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "Title is required"
            })),
        )
            .into_response();
    }

    let repo = ExpenseRepository::new((*state.db).clone());

    match repo
        .create(CreateExpenseInput {
            group_id,
            title: payload.title.trim().to_string(),
            amount: payload.amount,
            date: payload.date,
            paid_by_user_id: payload.paid_by_user_id,
            participant_ids: payload.participant_ids,
            category: payload.category,
            receipt_url: payload.receipt_url,
        })
        .await
    {
        Ok(expense) => {
            info!(
                expense_id = %expense.id,
                group_id = %group_id,
                amount = %expense.amount,
                "Expense created"
            );
            (StatusCode::CREATED, Json(expense_json(&expense))).into_response()
        }
        Err(e) => expense_error_response(&e),
    }
}

/// GET `/expenses/{expense_id}` - Get an expense with its shares.
async fn get_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<ExpenseId>,
) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());

    match repo.find_with_shares(expense_id).await {
        Ok(detail) => {
            let shares: Vec<_> = detail
                .shares
                .iter()
                .map(|s| {
                    json!({
                        "user_id": s.user_id,
                        "user_name": s.user_name,
                        "share_amount": s.share_amount
                    })
                })
                .collect();
            let mut body = expense_json(&detail.expense);
            if let Some(map) = body.as_object_mut() {
                map.insert("shares".to_string(), json!(shares));
            }
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => expense_error_response(&e),
    }
}

/// GET `/groups/{group_id}/expenses` - List a group's expenses, newest first.
async fn list_expenses(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
    Query(query): Query<ListExpensesQuery>,
) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());

    match repo
        .list_for_group(group_id, query.search.as_deref())
        .await
    {
        Ok(expense_list) => {
            let body: Vec<_> = expense_list.iter().map(expense_json).collect();
            (StatusCode::OK, Json(json!({ "expenses": body }))).into_response()
        }
        Err(e) => expense_error_response(&ExpenseError::Database(e)),
    }
}

#[cfg(test)]
mod tests {
    use splitpot_core::split::SplitError;

    use super::*;

    #[test]
    fn test_validation_errors_map_to_bad_request() {
        let user = UserId::new();
        for err in [
            ExpenseError::PayerNotMember(user),
            ExpenseError::ParticipantNotMember(user),
            ExpenseError::DuplicateParticipant(user),
            ExpenseError::Split(SplitError::InvalidAmount),
            ExpenseError::Split(SplitError::NoParticipants),
        ] {
            let response = expense_error_response(&err);
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_missing_records_map_to_not_found() {
        assert_eq!(
            expense_error_response(&ExpenseError::NotFound(ExpenseId::new())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            expense_error_response(&ExpenseError::GroupNotFound(GroupId::new())).status(),
            StatusCode::NOT_FOUND
        );
    }
}
