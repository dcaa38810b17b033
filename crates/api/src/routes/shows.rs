//! Show listing and booking endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use common::ShowId;
use domain::ShowForm;
use projections::ShowListing;
use serde::Serialize;
use store::BookingStore;

use super::AppState;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct ShowResponse {
    pub id: i64,
    pub success: bool,
}

/// GET /shows — every show with venue and artist names.
#[tracing::instrument(skip(state))]
pub async fn list<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<ShowListing>>, ApiError> {
    let shows = state.projections.show_listing(Utc::now()).await?;
    Ok(Json(shows))
}

/// POST /shows — book an artist at a venue.
#[tracing::instrument(skip(state))]
pub async fn create<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(form): Json<ShowForm>,
) -> Result<(StatusCode, Json<ShowResponse>), ApiError> {
    let id = state.bookings.create_show(&form, Utc::now()).await?;
    let response = ShowResponse {
        id: id.as_i64(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /shows/{id}/edit — reschedule or reassign a show.
#[tracing::instrument(skip(state))]
pub async fn update<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
    Json(form): Json<ShowForm>,
) -> Result<Json<ShowResponse>, ApiError> {
    state
        .bookings
        .update_show(ShowId::new(id), &form, Utc::now())
        .await?;
    Ok(Json(ShowResponse { id, success: true }))
}

/// DELETE /shows/{id} — cancel a show.
#[tracing::instrument(skip(state))]
pub async fn delete<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> Result<Json<ShowResponse>, ApiError> {
    state.bookings.delete_show(ShowId::new(id)).await?;
    Ok(Json(ShowResponse { id, success: true }))
}
