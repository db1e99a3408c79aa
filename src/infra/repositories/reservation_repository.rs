//! Reservation repository implementation.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use super::entities::reservation::{self, ActiveModel, Entity as ReservationEntity};
use crate::domain::{csv, CreateReservation, Reservation, ReservationStatus};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    async fn create(&self, input: CreateReservation) -> AppResult<Reservation>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Reservation>>;

    /// Reservations of one user in storage order
    async fn find_by_user_id(&self, user_id: i64) -> AppResult<Vec<Reservation>>;

    /// Replace the stored image list. Fails with `NotFound` when no row matched.
    async fn update_image_urls(&self, id: i64, urls: Vec<String>) -> AppResult<()>;

    /// Move `id` from `expected` to `next` in one conditional update.
    ///
    /// Returns false when the row no longer has the `expected` status.
    async fn transition_status(
        &self,
        id: i64,
        expected: ReservationStatus,
        next: ReservationStatus,
        canceled_at: Option<NaiveDateTime>,
    ) -> AppResult<bool>;
}

pub struct ReservationStore {
    db: DatabaseConnection,
}

impl ReservationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReservationRepository for ReservationStore {
    async fn create(&self, input: CreateReservation) -> AppResult<Reservation> {
        let active_model = ActiveModel {
            user_id: Set(input.user_id),
            partner_id: Set(input.partner_id),
            pet_id: Set(input.pet_id),
            service_categorical: Set(input.service_categorical.to_string()),
            status: Set(input.status.to_string()),
            created_at: Set(input.created_at),
            canceled_at: Set(None),
            image_url: Set(csv::encode(&input.image_urls)),
            content: Set(input.content),
            vet_specialties: Set(csv::encode(&input.vet_specialties)),
            petsitter_works: Set(csv::encode(&input.petsitter_works)),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Reservation::try_from(model)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Reservation>> {
        ReservationEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Reservation::try_from)
            .transpose()
    }

    async fn find_by_user_id(&self, user_id: i64) -> AppResult<Vec<Reservation>> {
        ReservationEntity::find()
            .filter(reservation::Column::UserId.eq(user_id))
            .order_by_asc(reservation::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Reservation::try_from)
            .collect()
    }

    async fn update_image_urls(&self, id: i64, urls: Vec<String>) -> AppResult<()> {
        let result = ReservationEntity::update_many()
            .col_expr(
                reservation::Column::ImageUrl,
                Expr::value(csv::encode(&urls)),
            )
            .filter(reservation::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("reservation"));
        }
        Ok(())
    }

    async fn transition_status(
        &self,
        id: i64,
        expected: ReservationStatus,
        next: ReservationStatus,
        canceled_at: Option<NaiveDateTime>,
    ) -> AppResult<bool> {
        let mut update = ReservationEntity::update_many()
            .col_expr(reservation::Column::Status, Expr::value(next.to_string()));
        if let Some(at) = canceled_at {
            update = update.col_expr(reservation::Column::CanceledAt, Expr::value(at));
        }

        let result = update
            .filter(reservation::Column::Id.eq(id))
            .filter(reservation::Column::Status.eq(expected.to_string()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }
}
