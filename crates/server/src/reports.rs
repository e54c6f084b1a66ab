//! Report API endpoints

use api_types::report::{ReportListResponse, ReportView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn report_view(report: engine::Report) -> ReportView {
    ReportView {
        id: report.id,
        trip_id: report.trip_id,
        total_spent_minor: report.total_spent_minor,
        breakdown: report.breakdown,
        created_at: report.created_at,
    }
}

/// Handle requests for snapshotting a trip's spending into a report
pub async fn report_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ReportView>), ServerError> {
    let report = state.engine.create_report(trip_id, &user.username).await?;
    Ok((StatusCode::CREATED, Json(report_view(report))))
}

/// Handle requests for a single report
pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(report_id): Path<Uuid>,
) -> Result<Json<ReportView>, ServerError> {
    let report = state.engine.report(report_id, &user.username).await?;
    Ok(Json(report_view(report)))
}

/// Handle requests for listing a trip's reports
pub async fn list_for_trip(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<ReportListResponse>, ServerError> {
    let reports = state.engine.list_reports(trip_id, &user.username).await?;

    Ok(Json(ReportListResponse {
        reports: reports.into_iter().map(report_view).collect(),
    }))
}

/// Handle requests for listing every report across the caller's trips
pub async fn list_all(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ReportListResponse>, ServerError> {
    let reports = state.engine.list_all_reports(&user.username).await?;

    Ok(Json(ReportListResponse {
        reports: reports.into_iter().map(report_view).collect(),
    }))
}

/// Handle requests for deleting a report
pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(report_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_report(report_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
