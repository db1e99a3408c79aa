//! Pet database entity for SeaORM.

use sea_orm::entity::prelude::*;

use super::parse_column;
use crate::domain::Pet;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub species: String,
    pub species_detail: Option<String>,
    pub gender: String,
    pub birthdate: Date,
    #[sea_orm(column_type = "Decimal(Some((4, 1)))")]
    pub weight: Decimal,
    pub abit_type_code: String,
    pub image_url: Option<String>,
    pub name: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Pet {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Pet {
            id: model.id,
            owner_id: model.user_id,
            species: parse_column("species", &model.species)?,
            species_detail: model.species_detail,
            gender: parse_column("gender", &model.gender)?,
            birthdate: model.birthdate,
            weight: model.weight,
            abit_type_code: parse_column("abit_type_code", &model.abit_type_code)?,
            image_url: model.image_url,
            name: model.name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
