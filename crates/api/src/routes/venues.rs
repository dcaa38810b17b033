//! Venue browse, search, detail and CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use common::VenueId;
use domain::VenueForm;
use projections::{CityStateGroup, SearchKind, SearchResults, VenueDetail};
use store::BookingStore;

use super::{AppState, CreatedResponse, DeletedResponse, SearchRequest};
use crate::error::ApiError;

/// GET /venues — venues grouped by city and state.
#[tracing::instrument(skip(state))]
pub async fn list<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<CityStateGroup>>, ApiError> {
    let groups = state.projections.city_state_groups(Utc::now()).await?;
    Ok(Json(groups))
}

/// POST /venues/search — venues whose name contains the term.
#[tracing::instrument(skip(state))]
pub async fn search<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResults>, ApiError> {
    let results = state
        .projections
        .search(SearchKind::Venue, &req.search_term, Utc::now())
        .await?;
    Ok(Json(results))
}

/// GET /venues/{id} — venue page with past and upcoming shows.
#[tracing::instrument(skip(state))]
pub async fn get<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> Result<Json<VenueDetail>, ApiError> {
    let detail = state
        .projections
        .venue_detail(VenueId::new(id), Utc::now())
        .await?;
    Ok(Json(detail))
}

/// POST /venues — create a venue.
#[tracing::instrument(skip(state, form))]
pub async fn create<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(form): Json<VenueForm>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let id = state.bookings.create_venue(&form).await?;
    let response = CreatedResponse {
        id: id.as_i64(),
        name: form.name.trim().to_string(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /venues/{id}/edit — current values for the edit form.
#[tracing::instrument(skip(state))]
pub async fn edit_form<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> Result<Json<VenueForm>, ApiError> {
    let venue = state.projections.venue_form_data(VenueId::new(id)).await?;
    Ok(Json(VenueForm::from(&venue)))
}

/// POST /venues/{id}/edit — replace every field, then return the venue page.
#[tracing::instrument(skip(state, form))]
pub async fn update<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
    Json(form): Json<VenueForm>,
) -> Result<Json<VenueDetail>, ApiError> {
    let id = VenueId::new(id);
    state.bookings.update_venue(id, &form).await?;
    let detail = state.projections.venue_detail(id, Utc::now()).await?;
    Ok(Json(detail))
}

/// DELETE /venues/{id} — delete a venue and its shows.
#[tracing::instrument(skip(state))]
pub async fn delete<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let summary = state.bookings.delete_venue(VenueId::new(id)).await?;
    Ok(Json(DeletedResponse {
        success: true,
        name: summary.name,
        shows_removed: summary.shows_removed,
    }))
}
