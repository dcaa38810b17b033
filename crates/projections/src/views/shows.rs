//! The all-shows page.

use chrono::{DateTime, Utc};
use common::{ArtistId, ShowId, VenueId};
use futures_util::future::try_join;
use serde::Serialize;
use store::{BookingStore, ShowQuery};

use crate::Result;
use crate::builder::{ProjectionBuilder, record_built};
use crate::format::{DateFormat, format_datetime};
use crate::partition::{ShowPartition, partition};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowListing {
    pub show_id: ShowId,
    pub venue_id: VenueId,
    pub venue_name: String,
    pub artist_id: ArtistId,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
    pub start_time_display: String,
    pub partition: ShowPartition,
}

impl<S: BookingStore> ProjectionBuilder<S> {
    /// Every show ordered by start time, with venue and artist names.
    #[tracing::instrument(skip(self))]
    pub async fn show_listing(&self, now: DateTime<Utc>) -> Result<Vec<ShowListing>> {
        let shows = self.store().query_shows(ShowQuery::new()).await?;
        let (venues, artists) = try_join(self.venues_for(&shows), self.artists_for(&shows)).await?;

        let listing = shows
            .iter()
            .filter_map(|show| {
                let venue = venues.get(&show.venue_id)?;
                let artist = artists.get(&show.artist_id)?;
                Some(ShowListing {
                    show_id: show.id,
                    venue_id: venue.id,
                    venue_name: venue.name.clone(),
                    artist_id: artist.id,
                    artist_name: artist.name.clone(),
                    artist_image_link: artist.image_link.clone(),
                    start_time: show.start_time,
                    start_time_display: format_datetime(show.start_time, DateFormat::Full),
                    partition: partition(show.start_time, now),
                })
            })
            .collect();

        record_built("show_listing");
        Ok(listing)
    }
}
