use chrono::{DateTime, Utc};
use common::{ArtistId, ShowOwner, VenueId};

use crate::Show;

/// Builder for show queries.
///
/// Results are always ordered by start time, then show id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowQuery {
    /// Filter by venue.
    pub venue_id: Option<VenueId>,

    /// Filter by artist.
    pub artist_id: Option<ArtistId>,

    /// Shows starting strictly before this instant.
    pub starts_before: Option<DateTime<Utc>>,

    /// Shows starting at or after this instant.
    pub starts_from: Option<DateTime<Utc>>,
}

impl ShowQuery {
    /// Creates a query matching every show.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query for the shows of one venue or artist.
    pub fn for_owner(owner: ShowOwner) -> Self {
        match owner {
            ShowOwner::Venue(id) => Self::new().venue_id(id),
            ShowOwner::Artist(id) => Self::new().artist_id(id),
        }
    }

    pub fn venue_id(mut self, id: VenueId) -> Self {
        self.venue_id = Some(id);
        self
    }

    pub fn artist_id(mut self, id: ArtistId) -> Self {
        self.artist_id = Some(id);
        self
    }

    /// Restricts to shows starting strictly before `instant`.
    pub fn starts_before(mut self, instant: DateTime<Utc>) -> Self {
        self.starts_before = Some(instant);
        self
    }

    /// Restricts to shows starting at or after `instant`.
    pub fn starts_from(mut self, instant: DateTime<Utc>) -> Self {
        self.starts_from = Some(instant);
        self
    }

    /// Evaluates the filter against a single row.
    pub fn matches(&self, show: &Show) -> bool {
        if let Some(id) = self.venue_id
            && show.venue_id != id
        {
            return false;
        }
        if let Some(id) = self.artist_id
            && show.artist_id != id
        {
            return false;
        }
        if let Some(before) = self.starts_before
            && show.start_time >= before
        {
            return false;
        }
        if let Some(from) = self.starts_from
            && show.start_time < from
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use common::ShowId;

    fn show_at(start_time: DateTime<Utc>) -> Show {
        Show {
            id: ShowId::new(1),
            venue_id: VenueId::new(1),
            artist_id: ArtistId::new(2),
            start_time,
        }
    }

    #[test]
    fn query_for_owner() {
        let query = ShowQuery::for_owner(ArtistId::new(2).into());
        assert_eq!(query.artist_id, Some(ArtistId::new(2)));
        assert!(query.venue_id.is_none());
    }

    #[test]
    fn time_bounds_split_at_the_instant() {
        let now = Utc::now();
        let at_now = show_at(now);
        let earlier = show_at(now - Duration::hours(1));

        assert!(!ShowQuery::new().starts_before(now).matches(&at_now));
        assert!(ShowQuery::new().starts_from(now).matches(&at_now));
        assert!(ShowQuery::new().starts_before(now).matches(&earlier));
        assert!(!ShowQuery::new().starts_from(now).matches(&earlier));
    }

    #[test]
    fn owner_filters() {
        let show = show_at(Utc::now());
        assert!(ShowQuery::new().venue_id(VenueId::new(1)).matches(&show));
        assert!(!ShowQuery::new().venue_id(VenueId::new(2)).matches(&show));
        assert!(
            !ShowQuery::new()
                .venue_id(VenueId::new(1))
                .artist_id(ArtistId::new(3))
                .matches(&show)
        );
    }
}
