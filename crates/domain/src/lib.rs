//! Mutation layer for the booking directory.
//!
//! This crate turns submitted forms into store writes:
//! - form types with field-level validation
//! - explicit cascade plans for venue and artist deletion
//! - `BookingService`, which commits every mutation atomically

pub mod cascade;
pub mod error;
pub mod forms;
pub mod service;
pub mod validation;

pub use error::{DomainError, Operation, Result};
pub use forms::{ArtistForm, FORM_DATETIME_FORMAT, ShowForm, US_STATES, VenueForm};
pub use service::{BookingService, DeletionSummary};
pub use validation::{FieldError, ValidationError};
