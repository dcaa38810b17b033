use std::collections::HashMap;

use async_trait::async_trait;
use common::{ArtistId, ShowId, ShowOwner, VenueId};

use crate::{Artist, Result, Show, ShowQuery, StoreError, Venue, Write, WriteOutcome};

/// Core trait for booking store implementations.
///
/// Reads never fail because related rows are absent; they return empty
/// collections or `None`. All implementations must be thread-safe.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Applies writes in order as one atomic unit.
    ///
    /// Either every write succeeds or none is visible. Returns one outcome
    /// per write, in order.
    async fn commit(&self, writes: Vec<Write>) -> Result<Vec<WriteOutcome>>;

    async fn get_venue(&self, id: VenueId) -> Result<Option<Venue>>;

    async fn get_artist(&self, id: ArtistId) -> Result<Option<Artist>>;

    async fn get_show(&self, id: ShowId) -> Result<Option<Show>>;

    /// All venues ordered by id.
    async fn list_venues(&self) -> Result<Vec<Venue>>;

    /// All artists ordered by id.
    async fn list_artists(&self) -> Result<Vec<Artist>>;

    /// Batch lookup used to resolve show references. Unknown ids are skipped.
    async fn venues_by_ids(&self, ids: &[VenueId]) -> Result<Vec<Venue>>;

    /// Batch lookup used to resolve show references. Unknown ids are skipped.
    async fn artists_by_ids(&self, ids: &[ArtistId]) -> Result<Vec<Artist>>;

    /// Shows matching a query, ordered by start time then id.
    async fn query_shows(&self, query: ShowQuery) -> Result<Vec<Show>>;

    /// Number of shows matching a query.
    async fn count_shows(&self, query: ShowQuery) -> Result<u64>;

    /// Shows matching a query, counted per venue. Venues without a match
    /// are absent from the map.
    async fn count_shows_by_venue(&self, query: ShowQuery) -> Result<HashMap<VenueId, u64>>;

    /// Shows matching a query, counted per artist.
    async fn count_shows_by_artist(&self, query: ShowQuery) -> Result<HashMap<ArtistId, u64>>;
}

/// Extension trait providing convenience methods for booking stores.
#[async_trait]
pub trait BookingStoreExt: BookingStore {
    /// Commits a single write.
    async fn commit_one(&self, write: Write) -> Result<WriteOutcome> {
        let mut outcomes = self.commit(vec![write]).await?;
        outcomes.pop().ok_or(StoreError::EmptyCommit)
    }

    async fn venue_exists(&self, id: VenueId) -> Result<bool> {
        Ok(self.get_venue(id).await?.is_some())
    }

    async fn artist_exists(&self, id: ArtistId) -> Result<bool> {
        Ok(self.get_artist(id).await?.is_some())
    }

    /// Every show booked at or by `owner`.
    async fn shows_for(&self, owner: ShowOwner) -> Result<Vec<Show>> {
        self.query_shows(ShowQuery::for_owner(owner)).await
    }
}

// Blanket implementation for all BookingStore implementations
impl<T: BookingStore + ?Sized> BookingStoreExt for T {}

/// Checks a write list before it reaches a backend.
pub fn validate_writes(writes: &[Write]) -> Result<()> {
    if writes.is_empty() {
        return Err(StoreError::EmptyCommit);
    }
    Ok(())
}
