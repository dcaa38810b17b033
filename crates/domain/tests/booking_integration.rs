//! Integration tests for the booking service.
//!
//! These tests run every mutation against the in-memory store and check that
//! failures leave the store untouched.

use chrono::{Duration, Utc};
use common::{ArtistId, EntityKind, ShowId, VenueId};
use domain::{ArtistForm, BookingService, DomainError, ShowForm, VenueForm};
use store::{BookingStore, BookingStoreExt, InMemoryBookingStore};

/// Helper to create a test booking service
fn create_service() -> BookingService<InMemoryBookingStore> {
    BookingService::new(InMemoryBookingStore::new())
}

fn venue_form(name: &str, city: &str, state: &str) -> VenueForm {
    VenueForm {
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        address: "1015 Folsom Street".to_string(),
        phone: Some("123-123-1234".to_string()),
        genres: vec!["Jazz".to_string(), "Swing".to_string()],
        seeking_talent: true,
        seeking_description: Some("We are on the lookout for a local artist".to_string()),
        ..VenueForm::default()
    }
}

fn artist_form(name: &str) -> ArtistForm {
    ArtistForm {
        name: name.to_string(),
        city: "San Francisco".to_string(),
        state: "CA".to_string(),
        genres: vec!["Rock n Roll".to_string()],
        image_link: Some("https://images.example/artist.jpg".to_string()),
        ..ArtistForm::default()
    }
}

fn show_form(venue_id: VenueId, artist_id: ArtistId, start: &str) -> ShowForm {
    ShowForm {
        venue_id: Some(venue_id.as_i64()),
        artist_id: Some(artist_id.as_i64()),
        start_time: Some(start.to_string()),
    }
}

mod venues {
    use super::*;

    #[tokio::test]
    async fn create_then_update_venue() {
        let service = create_service();

        let id = service
            .create_venue(&venue_form("The Musical Hop", "San Francisco", "ca"))
            .await
            .unwrap();
        let venue = service.store().get_venue(id).await.unwrap().unwrap();
        assert_eq!(venue.state, "CA");
        assert_eq!(venue.genres.to_stored(), "Jazz,Swing");

        let mut edited = venue_form("The Musical Hop", "Oakland", "CA");
        edited.genres = vec!["Folk".to_string()];
        service.update_venue(id, &edited).await.unwrap();

        let venue = service.store().get_venue(id).await.unwrap().unwrap();
        assert_eq!(venue.city, "Oakland");
        assert_eq!(venue.genres.as_slice(), ["Folk"]);
    }

    #[tokio::test]
    async fn invalid_form_writes_nothing() {
        let service = create_service();

        let result = service
            .create_venue(&venue_form("", "Austin", "Lone Star"))
            .await;

        match result {
            Err(DomainError::Validation(err)) => {
                assert!(err.has_field("name"));
                assert!(err.has_field("state"));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert_eq!(service.store().venue_count().await, 0);
    }

    #[tokio::test]
    async fn update_missing_venue_is_not_found() {
        let service = create_service();

        let result = service
            .update_venue(VenueId::new(42), &venue_form("Nowhere", "Austin", "TX"))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::NotFound {
                kind: EntityKind::Venue,
                id: 42
            })
        ));
    }

    #[tokio::test]
    async fn delete_venue_cascades_to_its_shows() {
        let service = create_service();
        let venue = service
            .create_venue(&venue_form("Park Square Live", "San Francisco", "CA"))
            .await
            .unwrap();
        let other = service
            .create_venue(&venue_form("The Dueling Pianos Bar", "New York", "NY"))
            .await
            .unwrap();
        let artist = service.create_artist(&artist_form("Guns N Petals")).await.unwrap();

        for start in ["2019-05-21 21:30:00", "2035-06-15 23:00:00"] {
            service
                .create_show(&show_form(venue, artist, start), Utc::now())
                .await
                .unwrap();
        }
        service
            .create_show(&show_form(other, artist, "2035-01-01 20:00:00"), Utc::now())
            .await
            .unwrap();

        let summary = service.delete_venue(venue).await.unwrap();
        assert_eq!(summary.name, "Park Square Live");
        assert_eq!(summary.shows_removed, 2);

        let store = service.store();
        assert!(!store.venue_exists(venue).await.unwrap());
        assert!(store.shows_for(venue.into()).await.unwrap().is_empty());
        assert_eq!(store.shows_for(artist.into()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_missing_venue_is_not_found() {
        let service = create_service();

        let result = service.delete_venue(VenueId::new(9)).await;

        assert!(matches!(
            result,
            Err(DomainError::NotFound {
                kind: EntityKind::Venue,
                ..
            })
        ));
    }
}

mod artists {
    use super::*;

    #[tokio::test]
    async fn delete_artist_keeps_other_artists_shows() {
        let service = create_service();
        let venue = service
            .create_venue(&venue_form("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let leaving = service.create_artist(&artist_form("Matt Quevedo")).await.unwrap();
        let staying = service
            .create_artist(&artist_form("The Wild Sax Band"))
            .await
            .unwrap();

        service
            .create_show(&show_form(venue, leaving, "2035-04-01 20:00:00"), Utc::now())
            .await
            .unwrap();
        service
            .create_show(&show_form(venue, staying, "2035-04-08 20:00:00"), Utc::now())
            .await
            .unwrap();

        let summary = service.delete_artist(leaving).await.unwrap();
        assert_eq!(summary.shows_removed, 1);

        let remaining = service.store().shows_for(venue.into()).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].artist_id, staying);
        assert!(service.store().get_artist(leaving).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn artist_genres_are_deduplicated_in_order() {
        let service = create_service();
        let mut form = artist_form("Guns N Petals");
        form.genres = vec!["Rock n Roll".into(), "Blues".into(), "Rock n Roll".into()];

        let id = service.create_artist(&form).await.unwrap();

        let artist = service.store().get_artist(id).await.unwrap().unwrap();
        assert_eq!(artist.genres.as_slice(), ["Rock n Roll", "Blues"]);
    }
}

mod shows {
    use super::*;

    #[tokio::test]
    async fn show_with_unknown_references_is_rejected() {
        let service = create_service();
        let venue = service
            .create_venue(&venue_form("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();

        let result = service
            .create_show(
                &show_form(VenueId::new(77), ArtistId::new(88), "2035-01-01 20:00:00"),
                Utc::now(),
            )
            .await;
        match result {
            Err(DomainError::Validation(err)) => {
                assert!(err.has_field("venue_id"));
                assert!(err.has_field("artist_id"));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }

        let result = service
            .create_show(
                &show_form(venue, ArtistId::new(88), "2035-01-01 20:00:00"),
                Utc::now(),
            )
            .await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(service.store().show_count().await, 0);
    }

    #[tokio::test]
    async fn show_without_start_time_starts_now() {
        let service = create_service();
        let venue = service
            .create_venue(&venue_form("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let artist = service.create_artist(&artist_form("Guns N Petals")).await.unwrap();
        let now = Utc::now();

        let form = ShowForm {
            venue_id: Some(venue.as_i64()),
            artist_id: Some(artist.as_i64()),
            start_time: None,
        };
        let id = service.create_show(&form, now).await.unwrap();

        let show = service.store().get_show(id).await.unwrap().unwrap();
        assert_eq!(show.start_time, now);
    }

    #[tokio::test]
    async fn reschedule_and_delete_show() {
        let service = create_service();
        let venue = service
            .create_venue(&venue_form("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let artist = service.create_artist(&artist_form("Guns N Petals")).await.unwrap();
        let now = Utc::now();
        let id = service
            .create_show(&show_form(venue, artist, "2035-01-01 20:00:00"), now)
            .await
            .unwrap();

        let later = (now + Duration::days(30)).to_rfc3339();
        service
            .update_show(id, &show_form(venue, artist, &later), now)
            .await
            .unwrap();
        let show = service.store().get_show(id).await.unwrap().unwrap();
        assert!(show.start_time > now + Duration::days(29));

        service.delete_show(id).await.unwrap();
        assert!(service.store().get_show(id).await.unwrap().is_none());

        let again = service.delete_show(id).await;
        assert!(matches!(
            again,
            Err(DomainError::NotFound {
                kind: EntityKind::Show,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn update_missing_show_is_not_found() {
        let service = create_service();
        let venue = service
            .create_venue(&venue_form("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let artist = service.create_artist(&artist_form("Guns N Petals")).await.unwrap();

        let result = service
            .update_show(
                ShowId::new(5),
                &show_form(venue, artist, "2035-01-01 20:00:00"),
                Utc::now(),
            )
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}

mod forms {
    use super::*;

    #[test]
    fn venue_form_deserializes_with_defaults() {
        let json = serde_json::json!({
            "name": "The Musical Hop",
            "city": "San Francisco",
            "state": "CA",
            "address": "1015 Folsom Street",
            "genres": ["Jazz"]
        });

        let form: VenueForm = serde_json::from_value(json).unwrap();

        assert!(!form.seeking_talent);
        assert_eq!(form.website, None);
        assert!(form.validate().is_ok());
    }
}
