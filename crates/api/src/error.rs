//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{DomainError, FieldError};
use projections::ProjectionError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Mutation error.
    Domain(DomainError),
    /// Read-side error.
    Projection(ProjectionError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, fields) = match self {
            ApiError::Domain(err) => domain_error_to_response(err),
            ApiError::Projection(err) => {
                let (status, msg) = projection_error_to_response(err);
                (status, msg, Vec::new())
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %message, "internal server error");
        }

        let body = if fields.is_empty() {
            serde_json::json!({ "error": message })
        } else {
            serde_json::json!({ "error": message, "fields": fields })
        };
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String, Vec<FieldError>) {
    match err {
        DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string(), Vec::new()),
        DomainError::Validation(validation) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("validation failed: {validation}"),
            validation.errors,
        ),
        DomainError::Persistence { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            err.to_string(),
            Vec::new(),
        ),
    }
}

fn projection_error_to_response(err: ProjectionError) -> (StatusCode, String) {
    match &err {
        ProjectionError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        ProjectionError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<ProjectionError> for ApiError {
    fn from(err: ProjectionError) -> Self {
        ApiError::Projection(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::EntityKind;
    use domain::ValidationError;

    #[test]
    fn not_found_maps_to_404() {
        let response =
            ApiError::from(ProjectionError::NotFound {
                kind: EntityKind::Venue,
                id: 3,
            })
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_maps_to_422() {
        let err = DomainError::Validation(ValidationError::single("venue_id", "is required"));
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn persistence_maps_to_500() {
        let err = DomainError::Persistence {
            operation: domain::Operation::Delete,
            kind: EntityKind::Artist,
            target: "Guns N Petals".to_string(),
            source: store::StoreError::EmptyCommit,
        };
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
