//! Expense API endpoints

use api_types::expense::{ExpenseListResponse, ExpenseNew, ExpenseUpdate, ExpenseView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

pub(crate) fn expense_view(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        trip_id: expense.trip_id,
        category: expense.category,
        amount_minor: expense.amount_minor,
        date: expense.date,
        note: expense.note,
        created_at: expense.created_at,
    }
}

/// Handle requests for recording a new expense
pub async fn expense_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let mut cmd = engine::ExpenseNewCmd::new(
        payload.trip_id,
        user.username,
        payload.category,
        payload.amount_minor,
        payload.date,
    );
    if let Some(note) = payload.note {
        cmd = cmd.note(note);
    }

    let expense = state.engine.create_expense(cmd).await?;
    Ok((StatusCode::CREATED, Json(expense_view(expense))))
}

/// Handle requests for a single expense
pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state.engine.expense(expense_id, &user.username).await?;
    Ok(Json(expense_view(expense)))
}

/// Handle requests for updating an expense
pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<ExpenseView>, ServerError> {
    let mut cmd = engine::ExpenseUpdateCmd::new(expense_id, user.username);
    if let Some(category) = payload.category {
        cmd = cmd.category(category);
    }
    if let Some(amount_minor) = payload.amount_minor {
        cmd = cmd.amount_minor(amount_minor);
    }
    if let Some(date) = payload.date {
        cmd = cmd.date(date);
    }
    if let Some(note) = payload.note {
        cmd = cmd.note(note);
    }

    let expense = state.engine.update_expense(cmd).await?;
    Ok(Json(expense_view(expense)))
}

/// Handle requests for deleting an expense (restores the trip budget)
pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_expense(expense_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle requests for listing a trip's expenses
pub async fn list_for_trip(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let expenses = state.engine.list_expenses(trip_id, &user.username).await?;

    Ok(Json(ExpenseListResponse {
        expenses: expenses.into_iter().map(expense_view).collect(),
    }))
}
