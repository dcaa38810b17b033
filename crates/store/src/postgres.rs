use std::collections::HashMap;

use async_trait::async_trait;
use common::{ArtistId, EntityKind, Genres, ShowId, ShowOwner, VenueId};
use sqlx::postgres::{PgArguments, PgPoolOptions, PgQueryResult, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};

use crate::{
    Artist, ArtistFields, Result, Show, ShowFields, ShowQuery, StoreError, Venue, VenueFields,
    Write, WriteOutcome,
    store::{BookingStore, validate_writes},
};

const VENUE_COLUMNS: &str = "id, name, genres, address, city, state, phone, website, \
     facebook_link, seeking_talent, seeking_description, image_link";

const ARTIST_COLUMNS: &str = "id, name, genres, city, state, phone, website, \
     facebook_link, seeking_venue, seeking_description, image_link";

const SHOW_COLUMNS: &str = "id, venue_id, artist_id, start_time";

/// PostgreSQL-backed booking store.
#[derive(Clone)]
pub struct PostgresBookingStore {
    pool: PgPool,
}

impl PostgresBookingStore {
    /// Creates a new PostgreSQL booking store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool to `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_venue(row: PgRow) -> Result<Venue> {
        Ok(Venue {
            id: VenueId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            genres: Genres::parse_stored(row.try_get::<&str, _>("genres")?),
            address: row.try_get("address")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            phone: row.try_get("phone")?,
            website: row.try_get("website")?,
            facebook_link: row.try_get("facebook_link")?,
            seeking_talent: row.try_get("seeking_talent")?,
            seeking_description: row.try_get("seeking_description")?,
            image_link: row.try_get("image_link")?,
        })
    }

    fn row_to_artist(row: PgRow) -> Result<Artist> {
        Ok(Artist {
            id: ArtistId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            genres: Genres::parse_stored(row.try_get::<&str, _>("genres")?),
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            phone: row.try_get("phone")?,
            website: row.try_get("website")?,
            facebook_link: row.try_get("facebook_link")?,
            seeking_venue: row.try_get("seeking_venue")?,
            seeking_description: row.try_get("seeking_description")?,
            image_link: row.try_get("image_link")?,
        })
    }

    fn row_to_show(row: PgRow) -> Result<Show> {
        Ok(Show {
            id: ShowId::new(row.try_get("id")?),
            venue_id: VenueId::new(row.try_get("venue_id")?),
            artist_id: ArtistId::new(row.try_get("artist_id")?),
            start_time: row.try_get("start_time")?,
        })
    }

    async fn apply(tx: &mut Transaction<'_, Postgres>, write: &Write) -> Result<WriteOutcome> {
        match write {
            Write::InsertVenue(fields) => {
                let id: i64 = sqlx::query_scalar(
                    r#"
                    INSERT INTO venues (name, genres, address, city, state, phone, website,
                                        facebook_link, seeking_talent, seeking_description, image_link)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                    RETURNING id
                    "#,
                )
                .bind(&fields.name)
                .bind(fields.genres.to_stored())
                .bind(&fields.address)
                .bind(&fields.city)
                .bind(&fields.state)
                .bind(&fields.phone)
                .bind(&fields.website)
                .bind(&fields.facebook_link)
                .bind(fields.seeking_talent)
                .bind(&fields.seeking_description)
                .bind(&fields.image_link)
                .fetch_one(&mut **tx)
                .await?;
                Ok(WriteOutcome::VenueInserted(VenueId::new(id)))
            }
            Write::UpdateVenue { id, fields } => {
                let result = Self::update_venue_row(tx, *id, fields).await?;
                not_found_unless_affected(result.rows_affected(), EntityKind::Venue, id.as_i64())
            }
            Write::DeleteVenue(id) => {
                let result = sqlx::query("DELETE FROM venues WHERE id = $1")
                    .bind(id.as_i64())
                    .execute(&mut **tx)
                    .await
                    .map_err(|e| restrict_violation(e, ShowOwner::Venue(*id)))?;
                if result.rows_affected() == 0 {
                    return Err(StoreError::NotFound {
                        kind: EntityKind::Venue,
                        id: id.as_i64(),
                    });
                }
                Ok(WriteOutcome::Deleted(result.rows_affected()))
            }
            Write::InsertArtist(fields) => {
                let id: i64 = sqlx::query_scalar(
                    r#"
                    INSERT INTO artists (name, genres, city, state, phone, website,
                                         facebook_link, seeking_venue, seeking_description, image_link)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                    RETURNING id
                    "#,
                )
                .bind(&fields.name)
                .bind(fields.genres.to_stored())
                .bind(&fields.city)
                .bind(&fields.state)
                .bind(&fields.phone)
                .bind(&fields.website)
                .bind(&fields.facebook_link)
                .bind(fields.seeking_venue)
                .bind(&fields.seeking_description)
                .bind(&fields.image_link)
                .fetch_one(&mut **tx)
                .await?;
                Ok(WriteOutcome::ArtistInserted(ArtistId::new(id)))
            }
            Write::UpdateArtist { id, fields } => {
                let result = Self::update_artist_row(tx, *id, fields).await?;
                not_found_unless_affected(result.rows_affected(), EntityKind::Artist, id.as_i64())
            }
            Write::DeleteArtist(id) => {
                let result = sqlx::query("DELETE FROM artists WHERE id = $1")
                    .bind(id.as_i64())
                    .execute(&mut **tx)
                    .await
                    .map_err(|e| restrict_violation(e, ShowOwner::Artist(*id)))?;
                if result.rows_affected() == 0 {
                    return Err(StoreError::NotFound {
                        kind: EntityKind::Artist,
                        id: id.as_i64(),
                    });
                }
                Ok(WriteOutcome::Deleted(result.rows_affected()))
            }
            Write::InsertShow(fields) => {
                let id: i64 = sqlx::query_scalar(
                    "INSERT INTO shows (venue_id, artist_id, start_time) VALUES ($1, $2, $3) RETURNING id",
                )
                .bind(fields.venue_id.as_i64())
                .bind(fields.artist_id.as_i64())
                .bind(fields.start_time)
                .fetch_one(&mut **tx)
                .await
                .map_err(|e| missing_reference(e, fields))?;
                Ok(WriteOutcome::ShowInserted(ShowId::new(id)))
            }
            Write::UpdateShow { id, fields } => {
                let result = sqlx::query(
                    "UPDATE shows SET venue_id = $2, artist_id = $3, start_time = $4 WHERE id = $1",
                )
                .bind(id.as_i64())
                .bind(fields.venue_id.as_i64())
                .bind(fields.artist_id.as_i64())
                .bind(fields.start_time)
                .execute(&mut **tx)
                .await
                .map_err(|e| missing_reference(e, fields))?;
                not_found_unless_affected(result.rows_affected(), EntityKind::Show, id.as_i64())
            }
            Write::DeleteShow(id) => {
                let result = sqlx::query("DELETE FROM shows WHERE id = $1")
                    .bind(id.as_i64())
                    .execute(&mut **tx)
                    .await?;
                if result.rows_affected() == 0 {
                    return Err(StoreError::NotFound {
                        kind: EntityKind::Show,
                        id: id.as_i64(),
                    });
                }
                Ok(WriteOutcome::Deleted(result.rows_affected()))
            }
            Write::DeleteShowsFor(owner) => {
                let sql = match owner {
                    ShowOwner::Venue(_) => "DELETE FROM shows WHERE venue_id = $1",
                    ShowOwner::Artist(_) => "DELETE FROM shows WHERE artist_id = $1",
                };
                let result = sqlx::query(sql)
                    .bind(owner.raw_id())
                    .execute(&mut **tx)
                    .await?;
                Ok(WriteOutcome::Deleted(result.rows_affected()))
            }
        }
    }

    async fn update_venue_row(
        tx: &mut Transaction<'_, Postgres>,
        id: VenueId,
        fields: &VenueFields,
    ) -> Result<PgQueryResult> {
        let result = sqlx::query(
            r#"
            UPDATE venues SET name = $2, genres = $3, address = $4, city = $5, state = $6,
                phone = $7, website = $8, facebook_link = $9, seeking_talent = $10,
                seeking_description = $11, image_link = $12
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .bind(&fields.name)
        .bind(fields.genres.to_stored())
        .bind(&fields.address)
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.phone)
        .bind(&fields.website)
        .bind(&fields.facebook_link)
        .bind(fields.seeking_talent)
        .bind(&fields.seeking_description)
        .bind(&fields.image_link)
        .execute(&mut **tx)
        .await?;
        Ok(result)
    }

    async fn update_artist_row(
        tx: &mut Transaction<'_, Postgres>,
        id: ArtistId,
        fields: &ArtistFields,
    ) -> Result<PgQueryResult> {
        let result = sqlx::query(
            r#"
            UPDATE artists SET name = $2, genres = $3, city = $4, state = $5, phone = $6,
                website = $7, facebook_link = $8, seeking_venue = $9,
                seeking_description = $10, image_link = $11
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .bind(&fields.name)
        .bind(fields.genres.to_stored())
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.phone)
        .bind(&fields.website)
        .bind(&fields.facebook_link)
        .bind(fields.seeking_venue)
        .bind(&fields.seeking_description)
        .bind(&fields.image_link)
        .execute(&mut **tx)
        .await?;
        Ok(result)
    }

    /// Builds the WHERE clause for a show query, returning the SQL suffix.
    fn show_filter_sql(query: &ShowQuery) -> String {
        let mut sql = String::from(" WHERE 1=1");
        let mut param_count = 0;

        if query.venue_id.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND venue_id = ${param_count}"));
        }
        if query.artist_id.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND artist_id = ${param_count}"));
        }
        if query.starts_before.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND start_time < ${param_count}"));
        }
        if query.starts_from.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND start_time >= ${param_count}"));
        }
        sql
    }

    /// Counts matching shows grouped by one of the reference columns.
    async fn grouped_show_counts(
        &self,
        column: &'static str,
        query: &ShowQuery,
    ) -> Result<Vec<(i64, u64)>> {
        let sql = format!(
            "SELECT {column} AS owner_id, COUNT(*) AS total FROM shows{} GROUP BY {column}",
            Self::show_filter_sql(query)
        );
        let rows = Self::bind_show_filter(sqlx::query(&sql), query)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter()
            .map(|row| -> Result<(i64, u64)> {
                let id: i64 = row.try_get("owner_id")?;
                let total: i64 = row.try_get("total")?;
                Ok((id, total as u64))
            })
            .collect()
    }

    fn bind_show_filter<'q>(
        mut q: sqlx::query::Query<'q, Postgres, PgArguments>,
        query: &ShowQuery,
    ) -> sqlx::query::Query<'q, Postgres, PgArguments> {
        if let Some(id) = query.venue_id {
            q = q.bind(id.as_i64());
        }
        if let Some(id) = query.artist_id {
            q = q.bind(id.as_i64());
        }
        if let Some(before) = query.starts_before {
            q = q.bind(before);
        }
        if let Some(from) = query.starts_from {
            q = q.bind(from);
        }
        q
    }
}

fn not_found_unless_affected(rows: u64, kind: EntityKind, id: i64) -> Result<WriteOutcome> {
    if rows == 0 {
        return Err(StoreError::NotFound { kind, id });
    }
    Ok(WriteOutcome::Updated)
}

fn restrict_violation(e: sqlx::Error, owner: ShowOwner) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_foreign_key_violation()
    {
        return StoreError::StillReferenced(owner);
    }
    StoreError::Database(e)
}

fn missing_reference(e: sqlx::Error, fields: &ShowFields) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e {
        match db_err.constraint() {
            Some("shows_venue_id_fkey") => {
                return StoreError::MissingReference {
                    kind: EntityKind::Venue,
                    id: fields.venue_id.as_i64(),
                };
            }
            Some("shows_artist_id_fkey") => {
                return StoreError::MissingReference {
                    kind: EntityKind::Artist,
                    id: fields.artist_id.as_i64(),
                };
            }
            _ => {}
        }
    }
    StoreError::Database(e)
}

#[async_trait]
impl BookingStore for PostgresBookingStore {
    async fn commit(&self, writes: Vec<Write>) -> Result<Vec<WriteOutcome>> {
        validate_writes(&writes)?;

        // Dropping the transaction on error rolls it back
        let mut tx = self.pool.begin().await?;

        let mut outcomes = Vec::with_capacity(writes.len());
        for write in &writes {
            let outcome = Self::apply(&mut tx, write).await.inspect_err(|e| {
                tracing::debug!(write = write.label(), error = %e, "commit rolled back");
            })?;
            outcomes.push(outcome);
        }

        tx.commit().await?;
        metrics::counter!("store_commits_total").increment(1);
        Ok(outcomes)
    }

    async fn get_venue(&self, id: VenueId) -> Result<Option<Venue>> {
        let row = sqlx::query(&format!("SELECT {VENUE_COLUMNS} FROM venues WHERE id = $1"))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_venue).transpose()
    }

    async fn get_artist(&self, id: ArtistId) -> Result<Option<Artist>> {
        let row = sqlx::query(&format!("SELECT {ARTIST_COLUMNS} FROM artists WHERE id = $1"))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_artist).transpose()
    }

    async fn get_show(&self, id: ShowId) -> Result<Option<Show>> {
        let row = sqlx::query(&format!("SELECT {SHOW_COLUMNS} FROM shows WHERE id = $1"))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_show).transpose()
    }

    async fn list_venues(&self) -> Result<Vec<Venue>> {
        let rows = sqlx::query(&format!("SELECT {VENUE_COLUMNS} FROM venues ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::row_to_venue).collect()
    }

    async fn list_artists(&self) -> Result<Vec<Artist>> {
        let rows = sqlx::query(&format!(
            "SELECT {ARTIST_COLUMNS} FROM artists ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_artist).collect()
    }

    async fn venues_by_ids(&self, ids: &[VenueId]) -> Result<Vec<Venue>> {
        let raw: Vec<i64> = ids.iter().map(VenueId::as_i64).collect();
        let rows = sqlx::query(&format!(
            "SELECT {VENUE_COLUMNS} FROM venues WHERE id = ANY($1) ORDER BY id ASC"
        ))
        .bind(raw)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_venue).collect()
    }

    async fn artists_by_ids(&self, ids: &[ArtistId]) -> Result<Vec<Artist>> {
        let raw: Vec<i64> = ids.iter().map(ArtistId::as_i64).collect();
        let rows = sqlx::query(&format!(
            "SELECT {ARTIST_COLUMNS} FROM artists WHERE id = ANY($1) ORDER BY id ASC"
        ))
        .bind(raw)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_artist).collect()
    }

    async fn query_shows(&self, query: ShowQuery) -> Result<Vec<Show>> {
        let sql = format!(
            "SELECT {SHOW_COLUMNS} FROM shows{} ORDER BY start_time ASC, id ASC",
            Self::show_filter_sql(&query)
        );
        let rows = Self::bind_show_filter(sqlx::query(&sql), &query)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::row_to_show).collect()
    }

    async fn count_shows(&self, query: ShowQuery) -> Result<u64> {
        let sql = format!(
            "SELECT COUNT(*) AS total FROM shows{}",
            Self::show_filter_sql(&query)
        );
        let row = Self::bind_show_filter(sqlx::query(&sql), &query)
            .fetch_one(&self.pool)
            .await?;
        let total: i64 = row.try_get("total")?;
        Ok(total as u64)
    }

    async fn count_shows_by_venue(&self, query: ShowQuery) -> Result<HashMap<VenueId, u64>> {
        let counts = self.grouped_show_counts("venue_id", &query).await?;
        Ok(counts
            .into_iter()
            .map(|(id, total)| (VenueId::new(id), total))
            .collect())
    }

    async fn count_shows_by_artist(&self, query: ShowQuery) -> Result<HashMap<ArtistId, u64>> {
        let counts = self.grouped_show_counts("artist_id", &query).await?;
        Ok(counts
            .into_iter()
            .map(|(id, total)| (ArtistId::new(id), total))
            .collect())
    }
}
