use common::{ArtistId, EntityKind, ShowId, ShowOwner, VenueId};

use crate::{ArtistFields, ShowFields, VenueFields};

/// A single row change. A commit applies a list of these atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    InsertVenue(VenueFields),
    UpdateVenue { id: VenueId, fields: VenueFields },
    DeleteVenue(VenueId),
    InsertArtist(ArtistFields),
    UpdateArtist { id: ArtistId, fields: ArtistFields },
    DeleteArtist(ArtistId),
    InsertShow(ShowFields),
    UpdateShow { id: ShowId, fields: ShowFields },
    DeleteShow(ShowId),
    /// Removes every show booked at or by the owner. Matching zero rows is
    /// not an error.
    DeleteShowsFor(ShowOwner),
}

impl Write {
    /// The table this write touches.
    pub fn kind(&self) -> EntityKind {
        match self {
            Write::InsertVenue(_) | Write::UpdateVenue { .. } | Write::DeleteVenue(_) => {
                EntityKind::Venue
            }
            Write::InsertArtist(_) | Write::UpdateArtist { .. } | Write::DeleteArtist(_) => {
                EntityKind::Artist
            }
            Write::InsertShow(_)
            | Write::UpdateShow { .. }
            | Write::DeleteShow(_)
            | Write::DeleteShowsFor(_) => EntityKind::Show,
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Write::InsertVenue(_) => "insert_venue",
            Write::UpdateVenue { .. } => "update_venue",
            Write::DeleteVenue(_) => "delete_venue",
            Write::InsertArtist(_) => "insert_artist",
            Write::UpdateArtist { .. } => "update_artist",
            Write::DeleteArtist(_) => "delete_artist",
            Write::InsertShow(_) => "insert_show",
            Write::UpdateShow { .. } => "update_show",
            Write::DeleteShow(_) => "delete_show",
            Write::DeleteShowsFor(_) => "delete_shows_for",
        }
    }
}

/// Result of one applied [`Write`], in the same position as the write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    VenueInserted(VenueId),
    ArtistInserted(ArtistId),
    ShowInserted(ShowId),
    Updated,
    Deleted(u64),
}

impl WriteOutcome {
    pub fn venue_id(&self) -> Option<VenueId> {
        match self {
            WriteOutcome::VenueInserted(id) => Some(*id),
            _ => None,
        }
    }

    pub fn artist_id(&self) -> Option<ArtistId> {
        match self {
            WriteOutcome::ArtistInserted(id) => Some(*id),
            _ => None,
        }
    }

    pub fn show_id(&self) -> Option<ShowId> {
        match self {
            WriteOutcome::ShowInserted(id) => Some(*id),
            _ => None,
        }
    }

    /// Rows removed by a delete; zero for every other outcome.
    pub fn rows_deleted(&self) -> u64 {
        match self {
            WriteOutcome::Deleted(rows) => *rows,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cascade_write_touches_show_table() {
        let write = Write::DeleteShowsFor(VenueId::new(1).into());
        assert_eq!(write.kind(), EntityKind::Show);
        assert_eq!(write.label(), "delete_shows_for");
        assert_eq!(Write::DeleteVenue(VenueId::new(1)).kind(), EntityKind::Venue);
    }

    #[test]
    fn outcome_accessors() {
        assert_eq!(
            WriteOutcome::VenueInserted(VenueId::new(4)).venue_id(),
            Some(VenueId::new(4))
        );
        assert_eq!(WriteOutcome::Updated.venue_id(), None);
        assert_eq!(WriteOutcome::Deleted(3).rows_deleted(), 3);
        assert_eq!(WriteOutcome::ShowInserted(ShowId::new(2)).rows_deleted(), 0);
    }
}
