//! Pet repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::pet::{self, ActiveModel, Entity as PetEntity};
use crate::domain::{CreatePet, Pet};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PetRepository: Send + Sync {
    /// Insert a pet. An unknown owner surfaces as `NotFound("user")`.
    async fn create(&self, input: CreatePet) -> AppResult<Pet>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Pet>>;

    /// Pets of one owner, in id order
    async fn find_by_owner_id(&self, owner_id: i64) -> AppResult<Vec<Pet>>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

pub struct PetStore {
    db: DatabaseConnection,
}

impl PetStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PetRepository for PetStore {
    async fn create(&self, input: CreatePet) -> AppResult<Pet> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            user_id: Set(input.owner_id),
            species: Set(input.species.to_string()),
            species_detail: Set(input.species_detail),
            gender: Set(input.gender.to_string()),
            birthdate: Set(input.birthdate),
            weight: Set(input.weight),
            abit_type_code: Set(input.abit_type_code.to_string()),
            image_url: Set(input.image_url),
            name: Set(input.name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_insert(e, "user"))?;
        Pet::try_from(model)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Pet>> {
        PetEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Pet::try_from)
            .transpose()
    }

    async fn find_by_owner_id(&self, owner_id: i64) -> AppResult<Vec<Pet>> {
        PetEntity::find()
            .filter(pet::Column::UserId.eq(owner_id))
            .order_by_asc(pet::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Pet::try_from)
            .collect()
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = PetEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
