//! HTTP handlers.

pub mod artists;
pub mod health;
pub mod metrics;
pub mod shows;
pub mod venues;

use domain::BookingService;
use projections::ProjectionBuilder;
use serde::{Deserialize, Serialize};
use store::BookingStore;

/// Shared application state accessible from all handlers.
pub struct AppState<S: BookingStore> {
    pub bookings: BookingService<S>,
    pub projections: ProjectionBuilder<S>,
}

// -- Shared request and response types --

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub search_term: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub name: String,
    pub shows_removed: u64,
}
