//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use super::{parse_column, parse_optional};
use crate::domain::{csv, PartnerProfile, User};
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub username: String,
    pub nickname: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub gender: String,
    pub birthdate: Date,
    pub address: String,
    pub user_type: String,
    pub status: String,
    pub tin: Option<String>,
    pub ca_categorical: Option<String>,
    pub vet_specialty: Option<String>,
    pub petsitter_work: Option<String>,
    /// CSV of day names
    pub working_days: Option<String>,
    pub working_start_hours: Option<String>,
    pub working_end_hours: Option<String>,
    pub locked_until: Option<DateTimeUtc>,
    pub last_login_at: Option<DateTimeUtc>,
    pub profile_url: Option<String>,
    pub fcm_token: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::pet::Entity")]
    Pets,
}

impl Related<super::pet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl TryFrom<Model> for User {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        let partner = PartnerProfile {
            tin: model.tin,
            ca_categorical: parse_optional("ca_categorical", model.ca_categorical.as_deref())?,
            vet_specialty: parse_optional("vet_specialty", model.vet_specialty.as_deref())?,
            petsitter_work: parse_optional("petsitter_work", model.petsitter_work.as_deref())?,
            working_days: csv::decode(model.working_days.as_deref()),
            working_start_hours: model.working_start_hours,
            working_end_hours: model.working_end_hours,
        };

        Ok(User {
            id: model.id,
            username: model.username,
            nickname: model.nickname,
            email: model.email,
            password_hash: model.password_hash,
            gender: parse_column("gender", &model.gender)?,
            birthdate: model.birthdate,
            address: model.address,
            user_type: parse_column("user_type", &model.user_type)?,
            status: parse_column("status", &model.status)?,
            partner,
            locked_until: model.locked_until,
            last_login_at: model.last_login_at,
            profile_url: model.profile_url,
            fcm_token: model.fcm_token,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        })
    }
}
