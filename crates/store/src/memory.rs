use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use common::{ArtistId, EntityKind, ShowId, ShowOwner, VenueId};
use tokio::sync::RwLock;

use crate::{
    Artist, Result, Show, ShowFields, ShowQuery, StoreError, Venue, Write, WriteOutcome,
    store::{BookingStore, validate_writes},
};

/// Row storage plus the id sequences.
#[derive(Debug, Default)]
struct Tables {
    venues: BTreeMap<VenueId, Venue>,
    artists: BTreeMap<ArtistId, Artist>,
    shows: BTreeMap<ShowId, Show>,
    seq: Sequences,
}

#[derive(Debug, Clone, Copy, Default)]
struct Sequences {
    venue: i64,
    artist: i64,
    show: i64,
}

/// Inverse of one applied write.
#[derive(Debug)]
enum Undo {
    RemoveVenue(VenueId),
    RestoreVenue(Venue),
    RemoveArtist(ArtistId),
    RestoreArtist(Artist),
    RemoveShow(ShowId),
    RestoreShows(Vec<Show>),
}

impl Tables {
    /// Applies one write in place. A failing write changes nothing.
    fn apply(&mut self, write: Write) -> Result<(WriteOutcome, Undo)> {
        match write {
            Write::InsertVenue(fields) => {
                self.seq.venue += 1;
                let id = VenueId::new(self.seq.venue);
                self.venues.insert(id, Venue::from_fields(id, fields));
                Ok((WriteOutcome::VenueInserted(id), Undo::RemoveVenue(id)))
            }
            Write::UpdateVenue { id, fields } => {
                let row = self.venues.get_mut(&id).ok_or(StoreError::NotFound {
                    kind: EntityKind::Venue,
                    id: id.as_i64(),
                })?;
                let previous = std::mem::replace(row, Venue::from_fields(id, fields));
                Ok((WriteOutcome::Updated, Undo::RestoreVenue(previous)))
            }
            Write::DeleteVenue(id) => {
                let venue = self.venues.remove(&id).ok_or(StoreError::NotFound {
                    kind: EntityKind::Venue,
                    id: id.as_i64(),
                })?;
                if let Err(e) = self.ensure_unreferenced(id.into()) {
                    self.venues.insert(id, venue);
                    return Err(e);
                }
                Ok((WriteOutcome::Deleted(1), Undo::RestoreVenue(venue)))
            }
            Write::InsertArtist(fields) => {
                self.seq.artist += 1;
                let id = ArtistId::new(self.seq.artist);
                self.artists.insert(id, Artist::from_fields(id, fields));
                Ok((WriteOutcome::ArtistInserted(id), Undo::RemoveArtist(id)))
            }
            Write::UpdateArtist { id, fields } => {
                let row = self.artists.get_mut(&id).ok_or(StoreError::NotFound {
                    kind: EntityKind::Artist,
                    id: id.as_i64(),
                })?;
                let previous = std::mem::replace(row, Artist::from_fields(id, fields));
                Ok((WriteOutcome::Updated, Undo::RestoreArtist(previous)))
            }
            Write::DeleteArtist(id) => {
                let artist = self.artists.remove(&id).ok_or(StoreError::NotFound {
                    kind: EntityKind::Artist,
                    id: id.as_i64(),
                })?;
                if let Err(e) = self.ensure_unreferenced(id.into()) {
                    self.artists.insert(id, artist);
                    return Err(e);
                }
                Ok((WriteOutcome::Deleted(1), Undo::RestoreArtist(artist)))
            }
            Write::InsertShow(fields) => {
                self.check_references(&fields)?;
                self.seq.show += 1;
                let id = ShowId::new(self.seq.show);
                self.shows.insert(id, Show::from_fields(id, fields));
                Ok((WriteOutcome::ShowInserted(id), Undo::RemoveShow(id)))
            }
            Write::UpdateShow { id, fields } => {
                if !self.shows.contains_key(&id) {
                    return Err(StoreError::NotFound {
                        kind: EntityKind::Show,
                        id: id.as_i64(),
                    });
                }
                self.check_references(&fields)?;
                let previous = self.shows.insert(id, Show::from_fields(id, fields));
                Ok((
                    WriteOutcome::Updated,
                    Undo::RestoreShows(previous.into_iter().collect()),
                ))
            }
            Write::DeleteShow(id) => match self.shows.remove(&id) {
                Some(show) => Ok((WriteOutcome::Deleted(1), Undo::RestoreShows(vec![show]))),
                None => Err(StoreError::NotFound {
                    kind: EntityKind::Show,
                    id: id.as_i64(),
                }),
            },
            Write::DeleteShowsFor(owner) => {
                let ids: Vec<ShowId> = self
                    .shows
                    .values()
                    .filter(|show| show.belongs_to(owner))
                    .map(|show| show.id)
                    .collect();
                let removed: Vec<Show> =
                    ids.iter().filter_map(|id| self.shows.remove(id)).collect();
                Ok((
                    WriteOutcome::Deleted(removed.len() as u64),
                    Undo::RestoreShows(removed),
                ))
            }
        }
    }

    /// Reverts applied writes, newest first, and restores the sequences.
    fn roll_back(&mut self, undo: Vec<Undo>, seq: Sequences) {
        for step in undo.into_iter().rev() {
            match step {
                Undo::RemoveVenue(id) => {
                    self.venues.remove(&id);
                }
                Undo::RestoreVenue(venue) => {
                    self.venues.insert(venue.id, venue);
                }
                Undo::RemoveArtist(id) => {
                    self.artists.remove(&id);
                }
                Undo::RestoreArtist(artist) => {
                    self.artists.insert(artist.id, artist);
                }
                Undo::RemoveShow(id) => {
                    self.shows.remove(&id);
                }
                Undo::RestoreShows(shows) => {
                    self.shows.extend(shows.into_iter().map(|show| (show.id, show)));
                }
            }
        }
        self.seq = seq;
    }

    // Mirrors the ON DELETE RESTRICT foreign keys of the SQL schema.
    fn ensure_unreferenced(&self, owner: ShowOwner) -> Result<()> {
        if self.shows.values().any(|show| show.belongs_to(owner)) {
            return Err(StoreError::StillReferenced(owner));
        }
        Ok(())
    }

    fn check_references(&self, fields: &ShowFields) -> Result<()> {
        if !self.venues.contains_key(&fields.venue_id) {
            return Err(StoreError::MissingReference {
                kind: EntityKind::Venue,
                id: fields.venue_id.as_i64(),
            });
        }
        if !self.artists.contains_key(&fields.artist_id) {
            return Err(StoreError::MissingReference {
                kind: EntityKind::Artist,
                id: fields.artist_id.as_i64(),
            });
        }
        Ok(())
    }

    fn matching_shows(&self, query: &ShowQuery) -> Vec<Show> {
        let mut shows: Vec<_> = self
            .shows
            .values()
            .filter(|show| query.matches(show))
            .copied()
            .collect();
        shows.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));
        shows
    }
}

/// In-memory booking store.
///
/// Used by tests and by the server when no database is configured. Behaves
/// like the PostgreSQL store, including foreign-key checks.
#[derive(Clone, Default)]
pub struct InMemoryBookingStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryBookingStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of shows stored.
    pub async fn show_count(&self) -> usize {
        self.tables.read().await.shows.len()
    }

    /// Returns the total number of venues stored.
    pub async fn venue_count(&self) -> usize {
        self.tables.read().await.venues.len()
    }

    /// Clears every table and resets the id sequences.
    pub async fn clear(&self) {
        *self.tables.write().await = Tables::default();
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn commit(&self, writes: Vec<Write>) -> Result<Vec<WriteOutcome>> {
        validate_writes(&writes)?;

        let mut tables = self.tables.write().await;

        let seq = tables.seq;
        let mut outcomes = Vec::with_capacity(writes.len());
        let mut undo = Vec::with_capacity(writes.len());
        for write in writes {
            let label = write.label();
            match tables.apply(write) {
                Ok((outcome, step)) => {
                    outcomes.push(outcome);
                    undo.push(step);
                }
                Err(e) => {
                    tables.roll_back(undo, seq);
                    tracing::debug!(write = label, error = %e, "commit rolled back");
                    return Err(e);
                }
            }
        }

        metrics::counter!("store_commits_total").increment(1);
        Ok(outcomes)
    }

    async fn get_venue(&self, id: VenueId) -> Result<Option<Venue>> {
        Ok(self.tables.read().await.venues.get(&id).cloned())
    }

    async fn get_artist(&self, id: ArtistId) -> Result<Option<Artist>> {
        Ok(self.tables.read().await.artists.get(&id).cloned())
    }

    async fn get_show(&self, id: ShowId) -> Result<Option<Show>> {
        Ok(self.tables.read().await.shows.get(&id).copied())
    }

    async fn list_venues(&self) -> Result<Vec<Venue>> {
        Ok(self.tables.read().await.venues.values().cloned().collect())
    }

    async fn list_artists(&self) -> Result<Vec<Artist>> {
        Ok(self.tables.read().await.artists.values().cloned().collect())
    }

    async fn venues_by_ids(&self, ids: &[VenueId]) -> Result<Vec<Venue>> {
        let tables = self.tables.read().await;
        Ok(tables
            .venues
            .values()
            .filter(|v| ids.contains(&v.id))
            .cloned()
            .collect())
    }

    async fn artists_by_ids(&self, ids: &[ArtistId]) -> Result<Vec<Artist>> {
        let tables = self.tables.read().await;
        Ok(tables
            .artists
            .values()
            .filter(|a| ids.contains(&a.id))
            .cloned()
            .collect())
    }

    async fn query_shows(&self, query: ShowQuery) -> Result<Vec<Show>> {
        Ok(self.tables.read().await.matching_shows(&query))
    }

    async fn count_shows(&self, query: ShowQuery) -> Result<u64> {
        let tables = self.tables.read().await;
        Ok(tables.shows.values().filter(|s| query.matches(s)).count() as u64)
    }

    async fn count_shows_by_venue(&self, query: ShowQuery) -> Result<HashMap<VenueId, u64>> {
        let tables = self.tables.read().await;
        let mut counts = HashMap::new();
        for show in tables.shows.values().filter(|s| query.matches(s)) {
            *counts.entry(show.venue_id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn count_shows_by_artist(&self, query: ShowQuery) -> Result<HashMap<ArtistId, u64>> {
        let tables = self.tables.read().await;
        let mut counts = HashMap::new();
        for show in tables.shows.values().filter(|s| query.matches(s)) {
            *counts.entry(show.artist_id).or_insert(0) += 1;
        }
        Ok(counts)
    }
}
