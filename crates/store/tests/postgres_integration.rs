//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use chrono::{Duration, DurationRound, Utc};
use sqlx::PgPool;
use store::{
    ArtistFields, ArtistId, BookingStore, BookingStoreExt, EntityKind, Genres,
    PostgresBookingStore, ShowFields, ShowQuery, StoreError, VenueFields, VenueId, Write,
};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            // Run migrations using raw_sql to execute multiple statements
            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_booking_tables.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and cleared tables
async fn get_test_store() -> PostgresBookingStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE shows, venues, artists RESTART IDENTITY")
        .execute(&pool)
        .await
        .unwrap();

    PostgresBookingStore::new(pool)
}

fn venue_fields(name: &str, city: &str, state: &str) -> VenueFields {
    VenueFields {
        name: name.to_string(),
        genres: Genres::try_from_values(["Jazz", "Reggae", "Swing"]).unwrap(),
        address: "1015 Folsom Street".to_string(),
        city: city.to_string(),
        state: state.to_string(),
        phone: Some("123-123-1234".to_string()),
        website: Some("https://www.themusicalhop.com".to_string()),
        facebook_link: None,
        seeking_talent: true,
        seeking_description: Some("Looking for local artists".to_string()),
        image_link: None,
    }
}

fn artist_fields(name: &str) -> ArtistFields {
    ArtistFields {
        name: name.to_string(),
        genres: Genres::try_from_values(["Rock n Roll"]).unwrap(),
        city: "San Francisco".to_string(),
        state: "CA".to_string(),
        phone: None,
        website: None,
        facebook_link: None,
        seeking_venue: false,
        seeking_description: None,
        image_link: Some("https://images.example/artist.jpg".to_string()),
    }
}

async fn seed_pair(store: &PostgresBookingStore) -> (VenueId, ArtistId) {
    let outcomes = store
        .commit(vec![
            Write::InsertVenue(venue_fields("The Musical Hop", "San Francisco", "CA")),
            Write::InsertArtist(artist_fields("Guns N Petals")),
        ])
        .await
        .unwrap();
    (
        outcomes[0].venue_id().unwrap(),
        outcomes[1].artist_id().unwrap(),
    )
}

// Postgres keeps microseconds; truncate so round-tripped values compare equal
fn now_micros() -> chrono::DateTime<Utc> {
    Utc::now().duration_trunc(Duration::microseconds(1)).unwrap()
}

#[tokio::test]
async fn insert_and_read_back_venue() {
    let store = get_test_store().await;
    let (venue_id, _) = seed_pair(&store).await;

    let venue = store.get_venue(venue_id).await.unwrap().unwrap();
    assert_eq!(venue.name, "The Musical Hop");
    assert_eq!(venue.genres.as_slice(), ["Jazz", "Reggae", "Swing"]);
    assert_eq!(venue.state, "CA");
    assert!(venue.seeking_talent);
    assert_eq!(venue.facebook_link, None);
}

#[tokio::test]
async fn failed_commit_rolls_back_every_write() {
    let store = get_test_store().await;

    let result = store
        .commit(vec![
            Write::InsertVenue(venue_fields("Orphan Hall", "Austin", "TX")),
            Write::InsertShow(ShowFields {
                venue_id: VenueId::new(1),
                artist_id: ArtistId::new(99),
                start_time: now_micros(),
            }),
        ])
        .await;

    assert!(matches!(
        result,
        Err(StoreError::MissingReference {
            kind: EntityKind::Artist,
            ..
        })
    ));
    assert!(store.list_venues().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_with_shows_is_restricted_until_shows_are_removed() {
    let store = get_test_store().await;
    let (venue_id, artist_id) = seed_pair(&store).await;
    store
        .commit_one(Write::InsertShow(ShowFields {
            venue_id,
            artist_id,
            start_time: now_micros(),
        }))
        .await
        .unwrap();

    let result = store.commit_one(Write::DeleteVenue(venue_id)).await;
    assert!(matches!(result, Err(StoreError::StillReferenced(_))));
    assert!(store.venue_exists(venue_id).await.unwrap());

    let outcomes = store
        .commit(vec![
            Write::DeleteShowsFor(venue_id.into()),
            Write::DeleteVenue(venue_id),
        ])
        .await
        .unwrap();
    assert_eq!(outcomes[0].rows_deleted(), 1);
    assert!(!store.venue_exists(venue_id).await.unwrap());
    assert!(store.shows_for(artist_id.into()).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_missing_row_is_not_found() {
    let store = get_test_store().await;

    let result = store
        .commit_one(Write::UpdateVenue {
            id: VenueId::new(404),
            fields: venue_fields("Ghost", "Austin", "TX"),
        })
        .await;

    assert!(matches!(
        result,
        Err(StoreError::NotFound {
            kind: EntityKind::Venue,
            id: 404
        })
    ));
}

#[tokio::test]
async fn show_queries_split_on_the_reference_instant() {
    let store = get_test_store().await;
    let (venue_id, artist_id) = seed_pair(&store).await;
    let now = now_micros();

    for start_time in [now - Duration::days(1), now, now + Duration::days(2)] {
        store
            .commit_one(Write::InsertShow(ShowFields {
                venue_id,
                artist_id,
                start_time,
            }))
            .await
            .unwrap();
    }

    let past = store
        .query_shows(ShowQuery::for_owner(venue_id.into()).starts_before(now))
        .await
        .unwrap();
    assert_eq!(past.len(), 1);
    assert_eq!(past[0].start_time, now - Duration::days(1));

    let upcoming = store
        .count_shows(ShowQuery::for_owner(artist_id.into()).starts_from(now))
        .await
        .unwrap();
    assert_eq!(upcoming, 2);
}

#[tokio::test]
async fn batch_lookup_by_ids() {
    let store = get_test_store().await;
    let outcomes = store
        .commit(vec![
            Write::InsertVenue(venue_fields("A", "Austin", "TX")),
            Write::InsertVenue(venue_fields("B", "Austin", "TX")),
            Write::InsertVenue(venue_fields("C", "Dallas", "TX")),
        ])
        .await
        .unwrap();
    let first = outcomes[0].venue_id().unwrap();
    let third = outcomes[2].venue_id().unwrap();

    let venues = store
        .venues_by_ids(&[third, first, VenueId::new(999)])
        .await
        .unwrap();
    let names: Vec<_> = venues.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, ["A", "C"]);
}

#[tokio::test]
async fn grouped_counts_are_computed_per_owner() {
    let store = get_test_store().await;
    let (venue_id, artist_id) = seed_pair(&store).await;
    let other = store
        .commit_one(Write::InsertArtist(artist_fields("The Wild Sax Band")))
        .await
        .unwrap()
        .artist_id()
        .unwrap();
    let now = now_micros();

    for (artist, start_time) in [
        (artist_id, now - Duration::days(3)),
        (artist_id, now),
        (other, now + Duration::days(1)),
    ] {
        store
            .commit_one(Write::InsertShow(ShowFields {
                venue_id,
                artist_id: artist,
                start_time,
            }))
            .await
            .unwrap();
    }

    let by_venue = store
        .count_shows_by_venue(ShowQuery::new().starts_from(now))
        .await
        .unwrap();
    assert_eq!(by_venue.len(), 1);
    assert_eq!(by_venue[&venue_id], 2);

    let by_artist = store
        .count_shows_by_artist(ShowQuery::new().starts_from(now))
        .await
        .unwrap();
    assert_eq!(by_artist[&artist_id], 1);
    assert_eq!(by_artist[&other], 1);
}
