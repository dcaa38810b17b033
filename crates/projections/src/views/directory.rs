//! Browse and search pages: venues grouped by location, name search and the
//! artist list.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use common::EntityKind;
use futures_util::future::try_join;
use serde::{Deserialize, Serialize};
use store::BookingStore;

use crate::Result;
use crate::builder::{ProjectionBuilder, record_built};
use crate::search::SearchTerm;

/// A venue or artist in a list, with its upcoming show total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedEntity {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: u64,
}

/// Venues sharing one (city, state).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityStateGroup {
    pub city: String,
    pub state: String,
    pub venues: Vec<ListedEntity>,
}

/// Which table a search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    Venue,
    Artist,
}

impl From<SearchKind> for EntityKind {
    fn from(kind: SearchKind) -> Self {
        match kind {
            SearchKind::Venue => EntityKind::Venue,
            SearchKind::Artist => EntityKind::Artist,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub results: Vec<ListedEntity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistSummary {
    pub id: i64,
    pub name: String,
}

impl<S: BookingStore> ProjectionBuilder<S> {
    /// Every venue grouped by its own (city, state). Groups are ordered by
    /// state then city; venues inside a group by id.
    #[tracing::instrument(skip(self))]
    pub async fn city_state_groups(&self, now: DateTime<Utc>) -> Result<Vec<CityStateGroup>> {
        let (venues, upcoming) =
            try_join(self.store().list_venues(), self.upcoming_by_venue(now)).await?;

        let mut groups: BTreeMap<(String, String), Vec<ListedEntity>> = BTreeMap::new();
        for venue in venues {
            groups
                .entry((venue.state.clone(), venue.city.clone()))
                .or_default()
                .push(ListedEntity {
                    id: venue.id.as_i64(),
                    num_upcoming_shows: upcoming.get(&venue.id).copied().unwrap_or(0),
                    name: venue.name,
                });
        }

        record_built("city_state_groups");
        Ok(groups
            .into_iter()
            .map(|((state, city), mut venues)| {
                venues.sort_by_key(|v| v.id);
                CityStateGroup {
                    city,
                    state,
                    venues,
                }
            })
            .collect())
    }

    /// Venues or artists whose name contains `term`, ignoring case, ordered
    /// by id.
    #[tracing::instrument(skip(self))]
    pub async fn search(
        &self,
        kind: SearchKind,
        term: &str,
        now: DateTime<Utc>,
    ) -> Result<SearchResults> {
        let term = SearchTerm::new(term);
        let results = match kind {
            SearchKind::Venue => {
                let (venues, upcoming) =
                    try_join(self.store().list_venues(), self.upcoming_by_venue(now)).await?;
                venues
                    .into_iter()
                    .filter(|venue| term.matches(&venue.name))
                    .map(|venue| ListedEntity {
                        id: venue.id.as_i64(),
                        num_upcoming_shows: upcoming.get(&venue.id).copied().unwrap_or(0),
                        name: venue.name,
                    })
                    .collect::<Vec<_>>()
            }
            SearchKind::Artist => {
                let (artists, upcoming) =
                    try_join(self.store().list_artists(), self.upcoming_by_artist(now)).await?;
                artists
                    .into_iter()
                    .filter(|artist| term.matches(&artist.name))
                    .map(|artist| ListedEntity {
                        id: artist.id.as_i64(),
                        num_upcoming_shows: upcoming.get(&artist.id).copied().unwrap_or(0),
                        name: artist.name,
                    })
                    .collect()
            }
        };

        record_built("search");
        Ok(SearchResults {
            count: results.len(),
            results,
        })
    }

    /// Every artist as id and name, ordered by id.
    #[tracing::instrument(skip(self))]
    pub async fn artist_listing(&self) -> Result<Vec<ArtistSummary>> {
        let artists = self.store().list_artists().await?;
        record_built("artist_listing");
        Ok(artists
            .into_iter()
            .map(|artist| ArtistSummary {
                id: artist.id.as_i64(),
                name: artist.name,
            })
            .collect())
    }
}
