//! Read side of the booking directory.
//!
//! This crate turns store rows into plain serializable view models:
//! - [`partition`] classifies shows as past or upcoming for a reference instant
//! - [`search`] matches names case-insensitively
//! - [`ProjectionBuilder`] assembles detail pages, location groups, search
//!   results and listings
//! - [`format_datetime`] renders show times for display

pub mod builder;
pub mod error;
pub mod format;
pub mod partition;
pub mod search;
pub mod views;

pub use builder::ProjectionBuilder;
pub use error::{ProjectionError, Result};
pub use format::{DateFormat, format_datetime};
pub use partition::{PartitionCounts, ShowPartition, is_upcoming, partition};
pub use search::{SearchTerm, matches};
pub use views::{
    ArtistDetail, ArtistShowEntry, ArtistSummary, CityStateGroup, ListedEntity, SearchKind,
    SearchResults, ShowListing, VenueDetail, VenueShowEntry,
};
