//! Venue and artist detail pages.

use chrono::{DateTime, Utc};
use common::{ArtistId, EntityKind, VenueId};
use futures_util::future::try_join;
use serde::Serialize;
use store::{BookingStore, BookingStoreExt};

use crate::builder::{ProjectionBuilder, record_built};
use crate::partition::{ShowPartition, partition};
use crate::{ProjectionError, Result};

/// A show as listed on a venue page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueShowEntry {
    pub artist_id: ArtistId,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

/// A show as listed on an artist page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistShowEntry {
    pub venue_id: VenueId,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueDetail {
    pub id: VenueId,
    pub name: String,
    pub genres: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<VenueShowEntry>,
    pub upcoming_shows: Vec<VenueShowEntry>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistDetail {
    pub id: ArtistId,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<ArtistShowEntry>,
    pub upcoming_shows: Vec<ArtistShowEntry>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

/// Splits entries already ordered by start time into (past, upcoming).
fn split<T>(
    entries: impl IntoIterator<Item = (DateTime<Utc>, T)>,
    now: DateTime<Utc>,
) -> (Vec<T>, Vec<T>) {
    let mut past = Vec::new();
    let mut upcoming = Vec::new();
    for (start_time, entry) in entries {
        match partition(start_time, now) {
            ShowPartition::Past => past.push(entry),
            ShowPartition::Upcoming => upcoming.push(entry),
        }
    }
    (past, upcoming)
}

impl<S: BookingStore> ProjectionBuilder<S> {
    /// Venue page: every column plus its shows split around `now`.
    #[tracing::instrument(skip(self))]
    pub async fn venue_detail(&self, id: VenueId, now: DateTime<Utc>) -> Result<VenueDetail> {
        let (venue, shows) =
            try_join(self.store().get_venue(id), self.store().shows_for(id.into())).await?;
        let venue = venue.ok_or(ProjectionError::NotFound {
            kind: EntityKind::Venue,
            id: id.as_i64(),
        })?;
        let artists = self.artists_for(&shows).await?;

        // Shows come ordered by start time, then id
        let entries = shows.iter().filter_map(|show| {
            let artist = artists.get(&show.artist_id)?;
            Some((
                show.start_time,
                VenueShowEntry {
                    artist_id: artist.id,
                    artist_name: artist.name.clone(),
                    artist_image_link: artist.image_link.clone(),
                    start_time: show.start_time,
                },
            ))
        });
        let (past_shows, upcoming_shows) = split(entries, now);

        record_built("venue_detail");
        Ok(VenueDetail {
            id: venue.id,
            name: venue.name,
            genres: venue.genres.iter().map(str::to_string).collect(),
            address: venue.address,
            city: venue.city,
            state: venue.state,
            phone: venue.phone,
            website: venue.website,
            facebook_link: venue.facebook_link,
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description,
            image_link: venue.image_link,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        })
    }

    /// Artist page: every column plus their shows split around `now`.
    #[tracing::instrument(skip(self))]
    pub async fn artist_detail(&self, id: ArtistId, now: DateTime<Utc>) -> Result<ArtistDetail> {
        let (artist, shows) =
            try_join(self.store().get_artist(id), self.store().shows_for(id.into())).await?;
        let artist = artist.ok_or(ProjectionError::NotFound {
            kind: EntityKind::Artist,
            id: id.as_i64(),
        })?;
        let venues = self.venues_for(&shows).await?;

        let entries = shows.iter().filter_map(|show| {
            let venue = venues.get(&show.venue_id)?;
            Some((
                show.start_time,
                ArtistShowEntry {
                    venue_id: venue.id,
                    venue_name: venue.name.clone(),
                    venue_image_link: venue.image_link.clone(),
                    start_time: show.start_time,
                },
            ))
        });
        let (past_shows, upcoming_shows) = split(entries, now);

        record_built("artist_detail");
        Ok(ArtistDetail {
            id: artist.id,
            name: artist.name,
            genres: artist.genres.iter().map(str::to_string).collect(),
            city: artist.city,
            state: artist.state,
            phone: artist.phone,
            website: artist.website,
            facebook_link: artist.facebook_link,
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description,
            image_link: artist.image_link,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        })
    }
}
