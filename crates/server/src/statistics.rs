//! Statistics API endpoints

use api_types::stats::{
    SpendDifferences, TripComparisonResponse, TripSpendSummary, TripStatisticsResponse,
};
use api_types::trip::TripCompare;
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn summary_view(summary: engine::TripSpendSummary) -> TripSpendSummary {
    TripSpendSummary {
        trip_id: summary.trip_id,
        name: summary.name,
        total_spent_minor: summary.total_spent_minor,
        breakdown: summary.breakdown,
        daily_average_minor: summary.daily_average_minor,
        duration_days: summary.duration_days,
    }
}

/// Handle requests for a trip's spending statistics
pub async fn get_statistics(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<TripStatisticsResponse>, ServerError> {
    let stats = state
        .engine
        .trip_statistics(trip_id, &user.username)
        .await?;

    Ok(Json(TripStatisticsResponse {
        total_spent_minor: stats.total_spent_minor,
        total_budget_minor: stats.total_budget_minor,
        remaining_budget_minor: stats.remaining_budget_minor,
        category_breakdown: stats.category_breakdown,
        daily_spending: stats.daily_spending,
    }))
}

/// Handle requests for comparing two trips of the caller
pub async fn compare(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TripCompare>,
) -> Result<Json<TripComparisonResponse>, ServerError> {
    let comparison = state
        .engine
        .compare_trips(
            payload.first_trip_id,
            payload.second_trip_id,
            &user.username,
        )
        .await?;

    Ok(Json(TripComparisonResponse {
        first: summary_view(comparison.first),
        second: summary_view(comparison.second),
        differences: SpendDifferences {
            total_spent_minor: comparison.differences.total_spent_minor,
            daily_average_minor: comparison.differences.daily_average_minor,
            percentage: comparison.differences.percentage,
        },
    }))
}
