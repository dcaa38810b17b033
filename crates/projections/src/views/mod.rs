//! View models served to the presentation layer.

pub mod detail;
pub mod directory;
pub mod form_data;
pub mod shows;

pub use detail::{ArtistDetail, ArtistShowEntry, VenueDetail, VenueShowEntry};
pub use directory::{ArtistSummary, CityStateGroup, ListedEntity, SearchKind, SearchResults};
pub use shows::ShowListing;
