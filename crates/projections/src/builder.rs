//! Entry point of the read side.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use common::{ArtistId, ShowOwner, VenueId};
use futures_util::future::try_join;
use store::{Artist, BookingStore, Show, ShowQuery, Venue};

use crate::Result;
use crate::partition::PartitionCounts;

/// Builds view models from the current store contents.
///
/// Every view is a pure function of the rows and the caller-supplied `now`.
/// Related rows are fetched in batches, never one lookup per show.
#[derive(Clone)]
pub struct ProjectionBuilder<S: BookingStore> {
    store: S,
}

impl<S: BookingStore> ProjectionBuilder<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Shows at or by `owner` that started before `now`.
    pub async fn count_past(&self, owner: ShowOwner, now: DateTime<Utc>) -> Result<u64> {
        Ok(self
            .store
            .count_shows(ShowQuery::for_owner(owner).starts_before(now))
            .await?)
    }

    /// Shows at or by `owner` starting at or after `now`.
    pub async fn count_upcoming(&self, owner: ShowOwner, now: DateTime<Utc>) -> Result<u64> {
        Ok(self
            .store
            .count_shows(ShowQuery::for_owner(owner).starts_from(now))
            .await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn partition_counts(
        &self,
        owner: ShowOwner,
        now: DateTime<Utc>,
    ) -> Result<PartitionCounts> {
        let (past, upcoming) =
            try_join(self.count_past(owner, now), self.count_upcoming(owner, now)).await?;
        Ok(PartitionCounts { past, upcoming })
    }

    /// Upcoming show totals per venue, from a single grouped count.
    pub(crate) async fn upcoming_by_venue(
        &self,
        now: DateTime<Utc>,
    ) -> store::Result<HashMap<VenueId, u64>> {
        self.store
            .count_shows_by_venue(ShowQuery::new().starts_from(now))
            .await
    }

    /// Upcoming show totals per artist, from a single grouped count.
    pub(crate) async fn upcoming_by_artist(
        &self,
        now: DateTime<Utc>,
    ) -> store::Result<HashMap<ArtistId, u64>> {
        self.store
            .count_shows_by_artist(ShowQuery::new().starts_from(now))
            .await
    }

    /// Resolves the venues referenced by `shows`, keyed by id.
    pub(crate) async fn venues_for(
        &self,
        shows: &[Show],
    ) -> store::Result<HashMap<VenueId, Venue>> {
        let ids = distinct(shows.iter().map(|show| show.venue_id));
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let venues = self.store.venues_by_ids(&ids).await?;
        Ok(venues.into_iter().map(|venue| (venue.id, venue)).collect())
    }

    /// Resolves the artists referenced by `shows`, keyed by id.
    pub(crate) async fn artists_for(
        &self,
        shows: &[Show],
    ) -> store::Result<HashMap<ArtistId, Artist>> {
        let ids = distinct(shows.iter().map(|show| show.artist_id));
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let artists = self.store.artists_by_ids(&ids).await?;
        Ok(artists.into_iter().map(|artist| (artist.id, artist)).collect())
    }
}

pub(crate) fn record_built(view: &'static str) {
    metrics::counter!("booking_projections_built_total", "view" => view).increment(1);
}

fn distinct<T: Ord + Copy>(ids: impl Iterator<Item = T>) -> Vec<T> {
    let mut ids: Vec<T> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_sorts_and_dedupes() {
        let ids = distinct([3, 1, 3, 2, 1].into_iter().map(ArtistId::new));
        assert_eq!(ids, [1, 2, 3].map(ArtistId::new));
    }
}
