//! Reservation service - booking, lifecycle transitions and the
//! "my reservations" listing.

use async_trait::async_trait;
use chrono::Local;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use super::container::parallel;
use super::UserService;
use crate::config::{RESERVATION_ACCEPTED_BODY, RESERVATION_ACCEPTED_TITLE};
use crate::domain::{
    Actor, CreateReservation, NewReservation, Reservation, ReservationAction, ReservationStatus,
    ReservationSummary,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{NotificationGateway, PushMessage, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReservationService: Send + Sync {
    /// Store a new `WAITING` reservation and return its id.
    async fn create(&self, input: NewReservation) -> AppResult<i64>;

    /// Partner confirms a waiting reservation; the owner gets a push
    /// notification on a best-effort basis.
    async fn accept(&self, id: i64, partner_id: i64) -> AppResult<ReservationStatus>;

    /// Partner declines a waiting or confirmed reservation.
    async fn reject(&self, id: i64, partner_id: i64) -> AppResult<ReservationStatus>;

    /// Owner cancels a waiting or confirmed reservation.
    async fn cancel(&self, id: i64, user_id: i64) -> AppResult<ReservationStatus>;

    async fn check_in(&self, id: i64, partner_id: i64) -> AppResult<ReservationStatus>;

    async fn complete(&self, id: i64, partner_id: i64) -> AppResult<ReservationStatus>;

    /// Reservations of `user_id` in storage order, optionally filtered by
    /// service type (case-insensitive).
    async fn my_reservations(
        &self,
        user_id: i64,
        service_type: Option<String>,
    ) -> AppResult<Vec<ReservationSummary>>;

    /// Replace the reservation image.
    async fn update_image(&self, id: i64, url: String) -> AppResult<()>;
}

pub struct ReservationManager<U: UnitOfWork> {
    uow: Arc<U>,
    users: Arc<dyn UserService>,
    notifier: Arc<dyn NotificationGateway>,
}

impl<U: UnitOfWork> ReservationManager<U> {
    pub fn new(
        uow: Arc<U>,
        users: Arc<dyn UserService>,
        notifier: Arc<dyn NotificationGateway>,
    ) -> Self {
        Self {
            uow,
            users,
            notifier,
        }
    }

    async fn find(&self, id: i64) -> AppResult<Reservation> {
        self.uow
            .reservations()
            .find_by_id(id)
            .await?
            .ok_or_not_found("reservation")
    }

    /// Apply a lifecycle action as one conditional update.
    async fn transition(
        &self,
        id: i64,
        action: ReservationAction,
        actor: Actor,
    ) -> AppResult<Reservation> {
        let mut reservation = self.find(id).await?;
        let next = reservation.check_action(action, actor)?;
        let canceled_at = next
            .is_cancellation()
            .then(|| Local::now().naive_local());

        let moved = self
            .uow
            .reservations()
            .transition_status(id, reservation.status, next, canceled_at)
            .await?;
        if !moved {
            // Another request changed the status since we read it
            let current = self.find(id).await?;
            return Err(AppError::InvalidTransition {
                from: current.status.to_string(),
                to: next.to_string(),
            });
        }

        tracing::info!(
            reservation_id = id,
            %action,
            from = %reservation.status,
            to = %next,
            "Reservation status changed"
        );

        reservation.status = next;
        reservation.canceled_at = canceled_at.or(reservation.canceled_at);
        Ok(reservation)
    }

    /// Notify the owner that the reservation was accepted. Never fails.
    async fn notify_accepted(&self, reservation: &Reservation) {
        let owner = match self.users.get_user(reservation.user_id).await {
            Ok(owner) => owner,
            Err(e) => {
                tracing::warn!(
                    reservation_id = reservation.id,
                    error = %e,
                    "Skipping accept notification, owner lookup failed"
                );
                return;
            }
        };

        let Some(token) = owner.push_token() else {
            tracing::debug!(
                reservation_id = reservation.id,
                user_id = owner.id,
                "Owner has no device token, no notification sent"
            );
            return;
        };

        let message = PushMessage {
            token: token.to_string(),
            title: RESERVATION_ACCEPTED_TITLE.to_string(),
            body: RESERVATION_ACCEPTED_BODY.to_string(),
            data: HashMap::from([("reservation_id".to_string(), reservation.id.to_string())]),
        };

        match self.notifier.send(message).await {
            Ok(()) => tracing::info!(reservation_id = reservation.id, "Accept notification sent"),
            Err(e) => tracing::warn!(
                reservation_id = reservation.id,
                error = %e,
                "Accept notification failed"
            ),
        }
    }

    /// Display names for every distinct partner, fetched concurrently.
    async fn partner_names(&self, reservations: &[Reservation]) -> AppResult<HashMap<i64, String>> {
        let ids: BTreeSet<i64> = reservations.iter().map(|r| r.partner_id).collect();

        let lookups: Vec<_> = ids
            .into_iter()
            .map(|id| async move {
                match self.users.get_user(id).await {
                    Ok(user) => Ok((id, user.username)),
                    Err(AppError::NotFound(_)) => {
                        tracing::warn!(partner_id = id, "Reservation references a missing partner");
                        Ok((id, String::new()))
                    }
                    Err(e) => Err(e),
                }
            })
            .collect();

        Ok(parallel::join_all(lookups).await?.into_iter().collect())
    }
}

#[async_trait]
impl<U: UnitOfWork> ReservationService for ReservationManager<U> {
    async fn create(&self, input: NewReservation) -> AppResult<i64> {
        let reservation = self
            .uow
            .reservations()
            .create(CreateReservation::from_request(input)?)
            .await?;

        tracing::info!(
            reservation_id = reservation.id,
            user_id = reservation.user_id,
            partner_id = reservation.partner_id,
            service = %reservation.service_categorical,
            "Reservation created"
        );
        Ok(reservation.id)
    }

    async fn accept(&self, id: i64, partner_id: i64) -> AppResult<ReservationStatus> {
        let reservation = self
            .transition(id, ReservationAction::Accept, Actor::Partner(partner_id))
            .await?;

        // The status change is already stored; delivery problems end here
        self.notify_accepted(&reservation).await;

        Ok(reservation.status)
    }

    async fn reject(&self, id: i64, partner_id: i64) -> AppResult<ReservationStatus> {
        self.transition(id, ReservationAction::Reject, Actor::Partner(partner_id))
            .await
            .map(|r| r.status)
    }

    async fn cancel(&self, id: i64, user_id: i64) -> AppResult<ReservationStatus> {
        self.transition(id, ReservationAction::Cancel, Actor::Owner(user_id))
            .await
            .map(|r| r.status)
    }

    async fn check_in(&self, id: i64, partner_id: i64) -> AppResult<ReservationStatus> {
        self.transition(id, ReservationAction::CheckIn, Actor::Partner(partner_id))
            .await
            .map(|r| r.status)
    }

    async fn complete(&self, id: i64, partner_id: i64) -> AppResult<ReservationStatus> {
        self.transition(id, ReservationAction::Complete, Actor::Partner(partner_id))
            .await
            .map(|r| r.status)
    }

    async fn my_reservations(
        &self,
        user_id: i64,
        service_type: Option<String>,
    ) -> AppResult<Vec<ReservationSummary>> {
        let filter = service_type.filter(|s| !s.trim().is_empty());
        let reservations: Vec<Reservation> = self
            .uow
            .reservations()
            .find_by_user_id(user_id)
            .await?
            .into_iter()
            .filter(|r| {
                filter
                    .as_deref()
                    .map_or(true, |f| r.service_categorical.matches(f))
            })
            .collect();

        let names = self.partner_names(&reservations).await?;

        Ok(reservations
            .iter()
            .map(|r| {
                let name = names.get(&r.partner_id).cloned().unwrap_or_default();
                ReservationSummary::new(r, name)
            })
            .collect())
    }

    async fn update_image(&self, id: i64, url: String) -> AppResult<()> {
        self.find(id).await?;
        self.uow
            .reservations()
            .update_image_urls(id, vec![url])
            .await
    }
}
