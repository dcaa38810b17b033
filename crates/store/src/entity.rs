//! Persisted records.

use chrono::{DateTime, Utc};
use common::{ArtistId, Genres, ShowId, ShowOwner, VenueId};
use serde::{Deserialize, Serialize};

/// Mutable columns of a venue row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueFields {
    pub name: String,
    pub genres: Genres,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
}

/// A venue row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
    pub genres: Genres,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
}

impl Venue {
    pub fn from_fields(id: VenueId, fields: VenueFields) -> Self {
        Self {
            id,
            name: fields.name,
            genres: fields.genres,
            address: fields.address,
            city: fields.city,
            state: fields.state,
            phone: fields.phone,
            website: fields.website,
            facebook_link: fields.facebook_link,
            seeking_talent: fields.seeking_talent,
            seeking_description: fields.seeking_description,
            image_link: fields.image_link,
        }
    }
}

/// Mutable columns of an artist row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistFields {
    pub name: String,
    pub genres: Genres,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
}

/// An artist row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
    pub genres: Genres,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
}

impl Artist {
    pub fn from_fields(id: ArtistId, fields: ArtistFields) -> Self {
        Self {
            id,
            name: fields.name,
            genres: fields.genres,
            city: fields.city,
            state: fields.state,
            phone: fields.phone,
            website: fields.website,
            facebook_link: fields.facebook_link,
            seeking_venue: fields.seeking_venue,
            seeking_description: fields.seeking_description,
            image_link: fields.image_link,
        }
    }
}

/// Columns of a show row other than its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowFields {
    pub venue_id: VenueId,
    pub artist_id: ArtistId,
    pub start_time: DateTime<Utc>,
}

/// A show: one artist playing one venue at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    pub id: ShowId,
    pub venue_id: VenueId,
    pub artist_id: ArtistId,
    pub start_time: DateTime<Utc>,
}

impl Show {
    pub fn from_fields(id: ShowId, fields: ShowFields) -> Self {
        Self {
            id,
            venue_id: fields.venue_id,
            artist_id: fields.artist_id,
            start_time: fields.start_time,
        }
    }

    /// Returns true when this show is booked at or by `owner`.
    pub fn belongs_to(&self, owner: ShowOwner) -> bool {
        match owner {
            ShowOwner::Venue(id) => self.venue_id == id,
            ShowOwner::Artist(id) => self.artist_id == id,
        }
    }
}
