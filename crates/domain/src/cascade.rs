//! Ordered write plans for deletions that must take dependent shows along.
//!
//! Show foreign keys restrict deletes, so removing a venue or an artist is
//! always planned as "shows first, then the row" and committed as one unit.

use common::{ArtistId, ShowOwner, VenueId};
use store::Write;

/// Removes every show at the venue, then the venue.
pub fn venue_deletion(id: VenueId) -> Vec<Write> {
    owner_deletion(ShowOwner::Venue(id), Write::DeleteVenue(id))
}

/// Removes every show by the artist, then the artist.
pub fn artist_deletion(id: ArtistId) -> Vec<Write> {
    owner_deletion(ShowOwner::Artist(id), Write::DeleteArtist(id))
}

fn owner_deletion(owner: ShowOwner, delete_owner: Write) -> Vec<Write> {
    vec![Write::DeleteShowsFor(owner), delete_owner]
}
