//! Reservation database entity for SeaORM.

use sea_orm::entity::prelude::*;

use super::parse_column;
use crate::domain::{csv, Reservation};
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub partner_id: i64,
    pub pet_id: i64,
    pub service_categorical: String,
    pub status: String,
    /// Local wall-clock time as supplied by the client
    pub created_at: DateTime,
    pub canceled_at: Option<DateTime>,
    /// CSV of image URLs
    #[sea_orm(column_type = "Text", nullable)]
    pub image_url: Option<String>,
    pub content: String,
    pub vet_specialties: Option<String>,
    pub petsitter_works: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Reservation {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Reservation {
            id: model.id,
            user_id: model.user_id,
            partner_id: model.partner_id,
            pet_id: model.pet_id,
            service_categorical: parse_column("service_categorical", &model.service_categorical)?,
            status: parse_column("status", &model.status)?,
            created_at: model.created_at,
            canceled_at: model.canceled_at,
            image_urls: csv::decode(model.image_url.as_deref()),
            content: model.content,
            vet_specialties: csv::decode_as(model.vet_specialties.as_deref()),
            petsitter_works: csv::decode_as(model.petsitter_works.as_deref()),
        })
    }
}
