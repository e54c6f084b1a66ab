//! Trip API endpoints

use api_types::trip::{TripListResponse, TripNew, TripUpdate, TripView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

pub(crate) fn map_status(status: engine::TripStatus) -> api_types::TripStatus {
    match status {
        engine::TripStatus::Upcoming => api_types::TripStatus::Upcoming,
        engine::TripStatus::Active => api_types::TripStatus::Active,
        engine::TripStatus::Deactive => api_types::TripStatus::Deactive,
    }
}

pub(crate) fn trip_view(trip: engine::Trip) -> TripView {
    TripView {
        id: trip.id,
        name: trip.name.clone(),
        status: map_status(trip.status),
        total_budget_minor: trip.total_budget_minor,
        remaining_budget_minor: trip.remaining_public_minor(),
        daily_average_minor: trip.daily_average_minor,
        start_date: trip.start_date,
        end_date: trip.end_date,
        duration_days: trip.duration_days(),
        created_at: trip.created_at,
    }
}

/// Handle requests for creating a new trip
pub async fn trip_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TripNew>,
) -> Result<(StatusCode, Json<TripView>), ServerError> {
    let trip = state
        .engine
        .create_trip(
            engine::TripNewCmd::new(
                user.username,
                payload.name,
                payload.total_budget_minor,
                payload.start_date,
                payload.end_date,
            ),
            Utc::now().date_naive(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(trip_view(trip))))
}

/// Handle requests for listing the caller's trips
pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<TripListResponse>, ServerError> {
    let trips = state
        .engine
        .list_trips(&user.username, Utc::now().date_naive())
        .await?;

    Ok(Json(TripListResponse {
        trips: trips.into_iter().map(trip_view).collect(),
    }))
}

/// Handle requests for a single trip
pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<TripView>, ServerError> {
    let trip = state
        .engine
        .trip(trip_id, &user.username, Utc::now().date_naive())
        .await?;

    Ok(Json(trip_view(trip)))
}

/// Handle requests for updating a trip
pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
    Json(payload): Json<TripUpdate>,
) -> Result<Json<TripView>, ServerError> {
    let mut cmd = engine::TripUpdateCmd::new(trip_id, user.username);
    if let Some(name) = payload.name {
        cmd = cmd.name(name);
    }
    if let Some(total_budget_minor) = payload.total_budget_minor {
        cmd = cmd.total_budget_minor(total_budget_minor);
    }
    if let Some(start_date) = payload.start_date {
        cmd = cmd.start_date(start_date);
    }
    if let Some(end_date) = payload.end_date {
        cmd = cmd.end_date(end_date);
    }

    let trip = state
        .engine
        .update_trip(cmd, Utc::now().date_naive())
        .await?;

    Ok(Json(trip_view(trip)))
}

/// Handle requests for deleting a trip (expenses and reports go with it)
pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_trip(trip_id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}
