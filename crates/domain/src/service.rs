//! Booking service: validated create, update and delete for every entity.

use chrono::{DateTime, Utc};
use common::{ArtistId, EntityKind, ShowId, VenueId};
use serde::Serialize;
use store::{BookingStore, BookingStoreExt, ShowFields, StoreError, Write, WriteOutcome};

use crate::cascade;
use crate::error::{DomainError, Operation, Result};
use crate::forms::{ArtistForm, ShowForm, VenueForm};
use crate::validation::ValidationError;

/// What a venue or artist deletion removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionSummary {
    pub name: String,
    pub shows_removed: u64,
}

/// Service for managing venues, artists and shows.
///
/// Every mutation is validated first and then applied as one store commit,
/// so a failure never leaves a partial change behind.
pub struct BookingService<S: BookingStore> {
    store: S,
}

impl<S: BookingStore> BookingService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    #[tracing::instrument(skip(self, form), fields(name = %form.name))]
    pub async fn create_venue(&self, form: &VenueForm) -> Result<VenueId> {
        let fields = self.check(EntityKind::Venue, Operation::Create, form.validate())?;
        let target = fields.name.clone();
        let outcomes = self
            .commit(
                Operation::Create,
                EntityKind::Venue,
                &target,
                vec![Write::InsertVenue(fields)],
            )
            .await?;
        first_outcome(&outcomes, WriteOutcome::venue_id)
            .ok_or_else(|| missing_outcome(Operation::Create, EntityKind::Venue, target))
    }

    #[tracing::instrument(skip(self, form), fields(name = %form.name))]
    pub async fn update_venue(&self, id: VenueId, form: &VenueForm) -> Result<()> {
        let fields = self.check(EntityKind::Venue, Operation::Update, form.validate())?;
        let target = fields.name.clone();
        self.commit(
            Operation::Update,
            EntityKind::Venue,
            &target,
            vec![Write::UpdateVenue { id, fields }],
        )
        .await?;
        Ok(())
    }

    /// Deletes a venue together with every show booked there.
    #[tracing::instrument(skip(self))]
    pub async fn delete_venue(&self, id: VenueId) -> Result<DeletionSummary> {
        let venue = self
            .store
            .get_venue(id)
            .await
            .map_err(|e| self.failed(Operation::Delete, EntityKind::Venue, &id.to_string(), e))?
            .ok_or_else(|| DomainError::not_found(EntityKind::Venue, id))?;

        let outcomes = self
            .commit(
                Operation::Delete,
                EntityKind::Venue,
                &venue.name,
                cascade::venue_deletion(id),
            )
            .await?;
        Ok(DeletionSummary {
            name: venue.name,
            shows_removed: outcomes.first().map_or(0, WriteOutcome::rows_deleted),
        })
    }

    #[tracing::instrument(skip(self, form), fields(name = %form.name))]
    pub async fn create_artist(&self, form: &ArtistForm) -> Result<ArtistId> {
        let fields = self.check(EntityKind::Artist, Operation::Create, form.validate())?;
        let target = fields.name.clone();
        let outcomes = self
            .commit(
                Operation::Create,
                EntityKind::Artist,
                &target,
                vec![Write::InsertArtist(fields)],
            )
            .await?;
        first_outcome(&outcomes, WriteOutcome::artist_id)
            .ok_or_else(|| missing_outcome(Operation::Create, EntityKind::Artist, target))
    }

    #[tracing::instrument(skip(self, form), fields(name = %form.name))]
    pub async fn update_artist(&self, id: ArtistId, form: &ArtistForm) -> Result<()> {
        let fields = self.check(EntityKind::Artist, Operation::Update, form.validate())?;
        let target = fields.name.clone();
        self.commit(
            Operation::Update,
            EntityKind::Artist,
            &target,
            vec![Write::UpdateArtist { id, fields }],
        )
        .await?;
        Ok(())
    }

    /// Deletes an artist together with every show they play.
    #[tracing::instrument(skip(self))]
    pub async fn delete_artist(&self, id: ArtistId) -> Result<DeletionSummary> {
        let artist = self
            .store
            .get_artist(id)
            .await
            .map_err(|e| self.failed(Operation::Delete, EntityKind::Artist, &id.to_string(), e))?
            .ok_or_else(|| DomainError::not_found(EntityKind::Artist, id))?;

        let outcomes = self
            .commit(
                Operation::Delete,
                EntityKind::Artist,
                &artist.name,
                cascade::artist_deletion(id),
            )
            .await?;
        Ok(DeletionSummary {
            name: artist.name,
            shows_removed: outcomes.first().map_or(0, WriteOutcome::rows_deleted),
        })
    }

    /// Books a show. Both references must point at existing rows.
    #[tracing::instrument(skip(self, form))]
    pub async fn create_show(&self, form: &ShowForm, now: DateTime<Utc>) -> Result<ShowId> {
        let fields = self.check(EntityKind::Show, Operation::Create, form.validate(now))?;
        let fields = self.check_references(Operation::Create, fields).await?;
        let target = show_target(&fields);
        let outcomes = self
            .commit(
                Operation::Create,
                EntityKind::Show,
                &target,
                vec![Write::InsertShow(fields)],
            )
            .await?;
        first_outcome(&outcomes, WriteOutcome::show_id)
            .ok_or_else(|| missing_outcome(Operation::Create, EntityKind::Show, target))
    }

    /// Reschedules or reassigns a show.
    #[tracing::instrument(skip(self, form))]
    pub async fn update_show(
        &self,
        id: ShowId,
        form: &ShowForm,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let fields = self.check(EntityKind::Show, Operation::Update, form.validate(now))?;
        let fields = self.check_references(Operation::Update, fields).await?;
        let target = show_target(&fields);
        self.commit(
            Operation::Update,
            EntityKind::Show,
            &target,
            vec![Write::UpdateShow { id, fields }],
        )
        .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_show(&self, id: ShowId) -> Result<()> {
        self.commit(
            Operation::Delete,
            EntityKind::Show,
            &format!("show {id}"),
            vec![Write::DeleteShow(id)],
        )
        .await?;
        Ok(())
    }

    /// Rejects a show whose venue or artist does not exist, naming both when
    /// both are missing.
    async fn check_references(
        &self,
        operation: Operation,
        fields: ShowFields,
    ) -> Result<ShowFields> {
        let target = show_target(&fields);
        let lookup = |e| self.failed(operation, EntityKind::Show, &target, e);

        let mut errors = Vec::new();
        if !self.store.venue_exists(fields.venue_id).await.map_err(lookup)? {
            errors.extend(reference_error(EntityKind::Venue, fields.venue_id.as_i64()).errors);
        }
        if !self.store.artist_exists(fields.artist_id).await.map_err(lookup)? {
            errors.extend(reference_error(EntityKind::Artist, fields.artist_id.as_i64()).errors);
        }
        if errors.is_empty() {
            Ok(fields)
        } else {
            let err = ValidationError { errors };
            Err(self.rejected(EntityKind::Show, operation, err))
        }
    }

    fn check<T>(
        &self,
        kind: EntityKind,
        operation: Operation,
        validated: std::result::Result<T, ValidationError>,
    ) -> Result<T> {
        validated.map_err(|err| self.rejected(kind, operation, err))
    }

    fn rejected(&self, kind: EntityKind, operation: Operation, err: ValidationError) -> DomainError {
        metrics::counter!(
            "booking_mutation_failures_total",
            "kind" => kind.as_str(),
            "operation" => operation.as_str(),
            "reason" => "validation"
        )
        .increment(1);
        tracing::info!(%kind, %operation, error = %err, "form rejected");
        DomainError::Validation(err)
    }

    async fn commit(
        &self,
        operation: Operation,
        kind: EntityKind,
        target: &str,
        writes: Vec<Write>,
    ) -> Result<Vec<WriteOutcome>> {
        match self.store.commit(writes).await {
            Ok(outcomes) => {
                metrics::counter!(
                    "booking_mutations_total",
                    "kind" => kind.as_str(),
                    "operation" => operation.as_str()
                )
                .increment(1);
                tracing::info!(%kind, %operation, target, "mutation committed");
                Ok(outcomes)
            }
            Err(e) => Err(self.failed(operation, kind, target, e)),
        }
    }

    fn failed(
        &self,
        operation: Operation,
        kind: EntityKind,
        target: &str,
        err: StoreError,
    ) -> DomainError {
        let (reason, mapped) = match err {
            StoreError::NotFound { kind, id } => ("not_found", DomainError::NotFound { kind, id }),
            StoreError::MissingReference { kind, id } => {
                ("validation", DomainError::Validation(reference_error(kind, id)))
            }
            source => (
                "persistence",
                DomainError::Persistence {
                    operation,
                    kind,
                    target: target.to_string(),
                    source,
                },
            ),
        };
        metrics::counter!(
            "booking_mutation_failures_total",
            "kind" => kind.as_str(),
            "operation" => operation.as_str(),
            "reason" => reason
        )
        .increment(1);
        match &mapped {
            DomainError::Persistence { .. } => {
                tracing::error!(%kind, %operation, target, error = %mapped, "mutation failed")
            }
            _ => tracing::warn!(%kind, %operation, target, error = %mapped, "mutation refused"),
        }
        mapped
    }
}

fn reference_error(kind: EntityKind, id: i64) -> ValidationError {
    let field = match kind {
        EntityKind::Venue => "venue_id",
        EntityKind::Artist => "artist_id",
        EntityKind::Show => "show_id",
    };
    ValidationError::single(field, format!("{kind} {id} does not exist"))
}

fn show_target(fields: &ShowFields) -> String {
    format!("artist {} at venue {}", fields.artist_id, fields.venue_id)
}

fn first_outcome<T>(
    outcomes: &[WriteOutcome],
    pick: impl Fn(&WriteOutcome) -> Option<T>,
) -> Option<T> {
    outcomes.first().and_then(pick)
}

fn missing_outcome(operation: Operation, kind: EntityKind, target: String) -> DomainError {
    DomainError::Persistence {
        operation,
        kind,
        target,
        source: StoreError::EmptyCommit,
    }
}
