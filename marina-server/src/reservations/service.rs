//! Reservation domain service
//!
//! Single entry point for every reservation mutation, shared by the JSON
//! API and the web UI. It owns the non-overlap invariant: for any berth,
//! stored reservations are pairwise non-overlapping under the
//! boundary-inclusive predicate in [`super::overlaps`].
//!
//! The conflict read and the write happen under a per-berth lock, so two
//! requests racing for the same berth cannot both pass the check.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use super::locks::BerthLocks;
use super::overlap::find_conflict;
use super::ReservationError;
use crate::db::{BerthDirectory, ReservationStore};
use crate::models::{
    BerthNumber, DateRange, NewReservation, Reservation, ReservationPatch, ReservationRequest,
    ReservationUpdate,
};

pub type ReservationResult<T> = Result<T, ReservationError>;

/// Enforces berth existence and non-overlap around reservation writes
#[derive(Clone)]
pub struct ReservationService {
    berths: Arc<dyn BerthDirectory>,
    store: Arc<dyn ReservationStore>,
    locks: BerthLocks,
}

impl ReservationService {
    pub fn new(berths: Arc<dyn BerthDirectory>, store: Arc<dyn ReservationStore>) -> Self {
        Self {
            berths,
            store,
            locks: BerthLocks::new(),
        }
    }

    /// Fail with `BerthNotFound` unless `berth` is registered.
    ///
    /// Callers that parse request fields run this first, so an unknown
    /// catway wins over any field or date error.
    pub async fn require_berth(&self, berth: BerthNumber) -> ReservationResult<()> {
        if !self.berths.exists(berth).await? {
            tracing::debug!(berth = %berth, "reservation refused: unknown catway");
            return Err(ReservationError::BerthNotFound(berth));
        }
        Ok(())
    }

    /// Create a reservation on `request.berth`.
    ///
    /// Order of checks: berth existence, date range, then overlap with every
    /// reservation already on the berth.
    pub async fn propose_create(&self, request: ReservationRequest) -> ReservationResult<Reservation> {
        let berth = request.berth;
        self.require_berth(berth).await?;
        let range = DateRange::new(request.start, request.end)?;

        let _guard = self.locks.acquire(berth).await;

        let existing = self.store.list_by_berth(berth).await?;
        if let Some(conflict) = find_conflict(&existing, range.start(), range.end()) {
            tracing::debug!(
                berth = %berth,
                range = %range,
                conflicting = %conflict.id,
                "reservation refused: overlap"
            );
            return Err(ReservationError::ConflictingReservation {
                berth: berth.get(),
                conflicting: Some(conflict.id),
            });
        }

        let reservation = self
            .store
            .insert(NewReservation {
                berth,
                client_name: request.client_name,
                boat_name: request.boat_name,
                range,
            })
            .await?;

        tracing::info!(berth = %berth, id = %reservation.id, range = %range, "reservation created");
        Ok(reservation)
    }

    /// Apply a partial update to reservation `id`.
    ///
    /// Missing dates are taken from the stored record, so the overlap check
    /// always runs on a complete range, excluding the reservation itself.
    /// The berth never changes.
    pub async fn propose_update(
        &self,
        id: Uuid,
        patch: ReservationPatch,
    ) -> ReservationResult<Reservation> {
        let berth = self.berth_of(id).await?;
        let _guard = self.locks.acquire(berth).await;

        // re-read under the lock so omitted fields resolve against current values
        let existing = self
            .store
            .get_by_id(id)
            .await?
            .ok_or(ReservationError::ReservationNotFound(id))?;

        let (start, end) = patch.resolve_dates(&existing);
        let range = DateRange::new(start, end)?;

        let others = self.store.list_by_berth_excluding(berth, id).await?;
        if let Some(conflict) = find_conflict(&others, range.start(), range.end()) {
            tracing::debug!(
                berth = %berth,
                id = %id,
                range = %range,
                conflicting = %conflict.id,
                "update refused: overlap"
            );
            return Err(ReservationError::ConflictingReservation {
                berth: berth.get(),
                conflicting: Some(conflict.id),
            });
        }

        let update = ReservationUpdate {
            client_name: patch
                .client_name
                .map_or(existing.client_name, |n| n.into_string()),
            boat_name: patch
                .boat_name
                .map_or(existing.boat_name, |n| n.into_string()),
            range,
        };

        let updated = self
            .store
            .update_fields(id, update)
            .await?
            .ok_or(ReservationError::ReservationNotFound(id))?;

        tracing::info!(berth = %berth, id = %id, range = %range, "reservation updated");
        Ok(updated)
    }

    /// Remove reservation `id`. Removal cannot create an overlap, so no check runs.
    pub async fn delete(&self, id: Uuid) -> ReservationResult<()> {
        if !self.store.delete_by_id(id).await? {
            return Err(ReservationError::ReservationNotFound(id));
        }
        tracing::info!(id = %id, "reservation deleted");
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> ReservationResult<Reservation> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or(ReservationError::ReservationNotFound(id))
    }

    /// Fetch `id` only if it belongs to `berth`; otherwise it is "not found".
    pub async fn get_on_berth(&self, berth: BerthNumber, id: Uuid) -> ReservationResult<Reservation> {
        let reservation = self.get(id).await?;
        if reservation.catway_number != berth.get() {
            return Err(ReservationError::ReservationNotFound(id));
        }
        Ok(reservation)
    }

    pub async fn list_by_berth(&self, berth: BerthNumber) -> ReservationResult<Vec<Reservation>> {
        Ok(self.store.list_by_berth(berth).await?)
    }

    pub async fn list_all(&self) -> ReservationResult<Vec<Reservation>> {
        Ok(self.store.list_all().await?)
    }

    /// Reservations in progress on `today`, endpoints included.
    pub async fn list_current(&self, today: NaiveDate) -> ReservationResult<Vec<Reservation>> {
        Ok(self.store.list_active_on(today).await?)
    }

    async fn berth_of(&self, id: Uuid) -> ReservationResult<BerthNumber> {
        let reservation = self.get(id).await?;
        Ok(BerthNumber::new(i64::from(reservation.catway_number))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{BerthStore, MemoryStore};
    use crate::models::{BerthKind, BerthState, NewBerth, PartyName};

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    async fn service_with_berths(numbers: &[i64]) -> (ReservationService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        for &n in numbers {
            store
                .create_berth(NewBerth {
                    number: BerthNumber::new(n).unwrap(),
                    kind: BerthKind::Short,
                    state: BerthState::default(),
                })
                .await
                .unwrap();
        }
        (ReservationService::new(store.clone(), store.clone()), store)
    }

    fn request(berth: i64, start: &str, end: &str) -> ReservationRequest {
        ReservationRequest {
            berth: BerthNumber::new(berth).unwrap(),
            client_name: PartyName::new("clientName", "Ada").unwrap(),
            boat_name: PartyName::new("boatName", "Sea Breeze").unwrap(),
            start: d(start),
            end: d(end),
        }
    }

    fn dates(start: &str, end: &str) -> ReservationPatch {
        ReservationPatch {
            start: Some(d(start)),
            end: Some(d(end)),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn touching_reservation_is_rejected() {
        let (service, _) = service_with_berths(&[1]).await;
        let a = service
            .propose_create(request(1, "2024-06-01", "2024-06-10"))
            .await
            .unwrap();

        let err = service
            .propose_create(request(1, "2024-06-10", "2024-06-15"))
            .await
            .unwrap_err();
        match err {
            ReservationError::ConflictingReservation { berth, conflicting } => {
                assert_eq!(berth, 1);
                assert_eq!(conflicting, Some(a.id));
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn disjoint_reservation_is_accepted() {
        let (service, _) = service_with_berths(&[1]).await;
        service
            .propose_create(request(1, "2024-06-01", "2024-06-10"))
            .await
            .unwrap();
        let c = service
            .propose_create(request(1, "2024-06-11", "2024-06-20"))
            .await
            .unwrap();
        assert_eq!(c.start_date, d("2024-06-11"));
        assert_eq!(service.list_by_berth(BerthNumber::new(1).unwrap()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn other_berths_do_not_conflict() {
        let (service, _) = service_with_berths(&[1, 2]).await;
        service
            .propose_create(request(1, "2024-06-01", "2024-06-10"))
            .await
            .unwrap();
        assert!(service
            .propose_create(request(2, "2024-06-01", "2024-06-10"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn unknown_berth_is_rejected() {
        let (service, store) = service_with_berths(&[1]).await;
        let err = service
            .propose_create(request(42, "2024-06-01", "2024-06-10"))
            .await
            .unwrap_err();
        assert!(matches!(err, ReservationError::BerthNotFound(b) if b.get() == 42));
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_berth_wins_over_inverted_range() {
        let (service, _) = service_with_berths(&[1]).await;
        let err = service
            .propose_create(request(42, "2024-09-10", "2024-09-05"))
            .await
            .unwrap_err();
        assert!(matches!(err, ReservationError::BerthNotFound(b) if b.get() == 42));

        // on a known berth the same range is a range error
        let err = service
            .propose_create(request(1, "2024-09-10", "2024-09-05"))
            .await
            .unwrap_err();
        assert!(matches!(err, ReservationError::InvalidDateRange(_)));
    }

    #[tokio::test]
    async fn require_berth_checks_the_directory() {
        let (service, _) = service_with_berths(&[4]).await;
        assert!(service.require_berth(BerthNumber::new(4).unwrap()).await.is_ok());
        assert!(matches!(
            service.require_berth(BerthNumber::new(5).unwrap()).await,
            Err(ReservationError::BerthNotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_excludes_itself() {
        let (service, _) = service_with_berths(&[3]).await;
        let x = service
            .propose_create(request(3, "2024-07-01", "2024-07-05"))
            .await
            .unwrap();

        let updated = service
            .propose_update(x.id, dates("2024-07-02", "2024-07-06"))
            .await
            .unwrap();
        assert_eq!(updated.id, x.id);
        assert_eq!(updated.range(), (d("2024-07-02"), d("2024-07-06")));
    }

    #[tokio::test]
    async fn update_conflicting_with_neighbour_leaves_record_untouched() {
        let (service, _) = service_with_berths(&[3]).await;
        let x = service
            .propose_create(request(3, "2024-07-01", "2024-07-05"))
            .await
            .unwrap();
        service
            .propose_create(request(3, "2024-07-10", "2024-07-12"))
            .await
            .unwrap();

        let err = service
            .propose_update(x.id, dates("2024-07-04", "2024-07-10"))
            .await
            .unwrap_err();
        assert!(matches!(err, ReservationError::ConflictingReservation { .. }));

        let stored = service.get(x.id).await.unwrap();
        assert_eq!(stored.range(), (d("2024-07-01"), d("2024-07-05")));
    }

    #[tokio::test]
    async fn name_only_update_rechecks_stored_range() {
        let (service, store) = service_with_berths(&[5]).await;
        let y = service
            .propose_create(request(5, "2024-08-01", "2024-08-10"))
            .await
            .unwrap();

        let patch = ReservationPatch {
            client_name: Some(PartyName::new("clientName", "Grace").unwrap()),
            ..Default::default()
        };
        let updated = service.propose_update(y.id, patch.clone()).await.unwrap();
        assert_eq!(updated.client_name, "Grace");
        assert_eq!(updated.boat_name, "Sea Breeze");
        assert_eq!(updated.range(), (d("2024-08-01"), d("2024-08-10")));

        // Plant an overlapping record behind the service's back: the
        // name-only update must now see the unchanged range collide.
        store
            .insert(NewReservation {
                berth: BerthNumber::new(5).unwrap(),
                client_name: PartyName::new("clientName", "Intruder").unwrap(),
                boat_name: PartyName::new("boatName", "Ghost").unwrap(),
                range: DateRange::new(d("2024-08-10"), d("2024-08-12")).unwrap(),
            })
            .await
            .unwrap();

        let err = service.propose_update(y.id, patch).await.unwrap_err();
        assert!(matches!(err, ReservationError::ConflictingReservation { .. }));
    }

    #[tokio::test]
    async fn partial_date_update_resolves_against_stored_value() {
        let (service, _) = service_with_berths(&[5]).await;
        let y = service
            .propose_create(request(5, "2024-08-01", "2024-08-10"))
            .await
            .unwrap();

        // new end before the stored start
        let patch = ReservationPatch {
            end: Some(d("2024-07-30")),
            ..Default::default()
        };
        let err = service.propose_update(y.id, patch).await.unwrap_err();
        assert!(matches!(err, ReservationError::InvalidDateRange(_)));

        let patch = ReservationPatch {
            end: Some(d("2024-08-20")),
            ..Default::default()
        };
        let updated = service.propose_update(y.id, patch).await.unwrap();
        assert_eq!(updated.range(), (d("2024-08-01"), d("2024-08-20")));
    }

    #[tokio::test]
    async fn update_and_delete_unknown_reservation() {
        let (service, _) = service_with_berths(&[1]).await;
        let missing = Uuid::new_v4();
        assert!(matches!(
            service.propose_update(missing, ReservationPatch::default()).await,
            Err(ReservationError::ReservationNotFound(id)) if id == missing
        ));
        assert!(matches!(
            service.delete(missing).await,
            Err(ReservationError::ReservationNotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_frees_the_period() {
        let (service, _) = service_with_berths(&[1]).await;
        let a = service
            .propose_create(request(1, "2024-06-01", "2024-06-10"))
            .await
            .unwrap();
        service.delete(a.id).await.unwrap();
        assert!(service
            .propose_create(request(1, "2024-06-05", "2024-06-08"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn get_on_berth_scopes_by_berth() {
        let (service, _) = service_with_berths(&[1, 2]).await;
        let a = service
            .propose_create(request(1, "2024-06-01", "2024-06-10"))
            .await
            .unwrap();
        assert!(service.get_on_berth(BerthNumber::new(1).unwrap(), a.id).await.is_ok());
        assert!(matches!(
            service.get_on_berth(BerthNumber::new(2).unwrap(), a.id).await,
            Err(ReservationError::ReservationNotFound(_))
        ));
    }

    #[tokio::test]
    async fn current_reservations_include_endpoints() {
        let (service, _) = service_with_berths(&[1, 2]).await;
        service
            .propose_create(request(1, "2024-06-01", "2024-06-10"))
            .await
            .unwrap();
        service
            .propose_create(request(2, "2024-06-10", "2024-06-12"))
            .await
            .unwrap();

        assert_eq!(service.list_current(d("2024-06-10")).await.unwrap().len(), 2);
        assert_eq!(service.list_current(d("2024-06-11")).await.unwrap().len(), 1);
        assert!(service.list_current(d("2024-05-31")).await.unwrap().is_empty());
    }
}
