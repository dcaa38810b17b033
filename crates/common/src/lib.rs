//! Shared types for the booking directory crates.

pub mod genres;
pub mod types;

pub use genres::{GENRE_DELIMITER, GenreError, Genres};
pub use types::{ArtistId, EntityKind, ShowId, ShowOwner, VenueId};
