//! HTTP API server with observability for the booking directory.
//!
//! Provides JSON endpoints for browsing, searching and editing venues,
//! artists and shows, with structured logging (tracing) and Prometheus
//! metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use domain::BookingService;
use metrics_exporter_prometheus::PrometheusHandle;
use projections::ProjectionBuilder;
use store::BookingStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: BookingStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/venues",
            get(routes::venues::list::<S>).post(routes::venues::create::<S>),
        )
        .route("/venues/search", post(routes::venues::search::<S>))
        .route(
            "/venues/{id}",
            get(routes::venues::get::<S>).delete(routes::venues::delete::<S>),
        )
        .route(
            "/venues/{id}/edit",
            get(routes::venues::edit_form::<S>).post(routes::venues::update::<S>),
        )
        .route(
            "/artists",
            get(routes::artists::list::<S>).post(routes::artists::create::<S>),
        )
        .route("/artists/search", post(routes::artists::search::<S>))
        .route(
            "/artists/{id}",
            get(routes::artists::get::<S>).delete(routes::artists::delete::<S>),
        )
        .route(
            "/artists/{id}/edit",
            get(routes::artists::edit_form::<S>).post(routes::artists::update::<S>),
        )
        .route(
            "/shows",
            get(routes::shows::list::<S>).post(routes::shows::create::<S>),
        )
        .route("/shows/{id}", axum::routing::delete(routes::shows::delete::<S>))
        .route("/shows/{id}/edit", post(routes::shows::update::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state: one mutation service and one projection
/// builder over the same store.
pub fn create_default_state<S: BookingStore + Clone + 'static>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState {
        bookings: BookingService::new(store.clone()),
        projections: ProjectionBuilder::new(store),
    })
}
