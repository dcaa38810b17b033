//! Current values used to pre-fill the edit forms.

use common::{ArtistId, EntityKind, VenueId};
use store::{Artist, BookingStore, Venue};

use crate::builder::ProjectionBuilder;
use crate::{ProjectionError, Result};

impl<S: BookingStore> ProjectionBuilder<S> {
    #[tracing::instrument(skip(self))]
    pub async fn venue_form_data(&self, id: VenueId) -> Result<Venue> {
        self.store()
            .get_venue(id)
            .await?
            .ok_or(ProjectionError::NotFound {
                kind: EntityKind::Venue,
                id: id.as_i64(),
            })
    }

    #[tracing::instrument(skip(self))]
    pub async fn artist_form_data(&self, id: ArtistId) -> Result<Artist> {
        self.store()
            .get_artist(id)
            .await?
            .ok_or(ProjectionError::NotFound {
                kind: EntityKind::Artist,
                id: id.as_i64(),
            })
    }
}
