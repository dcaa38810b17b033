//! Artist listing, search, detail and CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use common::ArtistId;
use domain::ArtistForm;
use projections::{ArtistDetail, ArtistSummary, SearchKind, SearchResults};
use store::BookingStore;

use super::{AppState, CreatedResponse, DeletedResponse, SearchRequest};
use crate::error::ApiError;

/// GET /artists — every artist by id.
#[tracing::instrument(skip(state))]
pub async fn list<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<ArtistSummary>>, ApiError> {
    let artists = state.projections.artist_listing().await?;
    Ok(Json(artists))
}

/// POST /artists/search — artists whose name contains the term.
#[tracing::instrument(skip(state))]
pub async fn search<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResults>, ApiError> {
    let results = state
        .projections
        .search(SearchKind::Artist, &req.search_term, Utc::now())
        .await?;
    Ok(Json(results))
}

/// GET /artists/{id} — artist page with past and upcoming shows.
#[tracing::instrument(skip(state))]
pub async fn get<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> Result<Json<ArtistDetail>, ApiError> {
    let detail = state
        .projections
        .artist_detail(ArtistId::new(id), Utc::now())
        .await?;
    Ok(Json(detail))
}

/// POST /artists — create an artist.
#[tracing::instrument(skip(state, form))]
pub async fn create<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(form): Json<ArtistForm>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let id = state.bookings.create_artist(&form).await?;
    let response = CreatedResponse {
        id: id.as_i64(),
        name: form.name.trim().to_string(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /artists/{id}/edit — current values for the edit form.
#[tracing::instrument(skip(state))]
pub async fn edit_form<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> Result<Json<ArtistForm>, ApiError> {
    let artist = state.projections.artist_form_data(ArtistId::new(id)).await?;
    Ok(Json(ArtistForm::from(&artist)))
}

/// POST /artists/{id}/edit — replace every field, then return the artist page.
#[tracing::instrument(skip(state, form))]
pub async fn update<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
    Json(form): Json<ArtistForm>,
) -> Result<Json<ArtistDetail>, ApiError> {
    let id = ArtistId::new(id);
    state.bookings.update_artist(id, &form).await?;
    let detail = state.projections.artist_detail(id, Utc::now()).await?;
    Ok(Json(detail))
}

/// DELETE /artists/{id} — delete an artist and their shows.
#[tracing::instrument(skip(state))]
pub async fn delete<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let summary = state.bookings.delete_artist(ArtistId::new(id)).await?;
    Ok(Json(DeletedResponse {
        success: true,
        name: summary.name,
        shows_removed: summary.shows_removed,
    }))
}
