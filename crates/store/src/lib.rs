pub mod entity;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod store;
pub mod write;

pub use common::{ArtistId, EntityKind, Genres, ShowId, ShowOwner, VenueId};
pub use entity::{Artist, ArtistFields, Show, ShowFields, Venue, VenueFields};
pub use error::{Result, StoreError};
pub use memory::InMemoryBookingStore;
pub use postgres::PostgresBookingStore;
pub use query::ShowQuery;
pub use store::{BookingStore, BookingStoreExt};
pub use write::{Write, WriteOutcome};
