//! Pet service - pet profiles owned by users.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{CreatePet, NewPet, Pet};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PetService: Send + Sync {
    /// Normalize and store a pet, returning its id.
    async fn create(&self, input: NewPet) -> AppResult<i64>;

    async fn get_pets_by_owner(&self, owner_id: i64) -> AppResult<Vec<Pet>>;

    async fn get_pet(&self, id: i64) -> AppResult<Pet>;

    /// Delete a pet and return the removed row.
    ///
    /// Fails with `NotFound` before deleting when the pet is absent; any
    /// storage failure is wrapped in `DeleteFailed`.
    async fn delete(&self, id: i64) -> AppResult<Pet>;
}

pub struct PetManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> PetManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> PetService for PetManager<U> {
    async fn create(&self, input: NewPet) -> AppResult<i64> {
        let pet = self.uow.pets().create(CreatePet::normalize(input)?).await?;

        tracing::info!(pet_id = pet.id, owner_id = pet.owner_id, "Pet created");
        Ok(pet.id)
    }

    async fn get_pets_by_owner(&self, owner_id: i64) -> AppResult<Vec<Pet>> {
        self.uow.pets().find_by_owner_id(owner_id).await
    }

    async fn get_pet(&self, id: i64) -> AppResult<Pet> {
        self.uow.pets().find_by_id(id).await?.ok_or_not_found("pet")
    }

    async fn delete(&self, id: i64) -> AppResult<Pet> {
        let pet = self.get_pet(id).await?;

        match self.uow.pets().delete(id).await {
            Ok(true) => {
                tracing::info!(pet_id = id, "Pet deleted");
                Ok(pet)
            }
            // Removed concurrently between the lookup and the delete
            Ok(false) => Err(AppError::NotFound("pet")),
            Err(e) => Err(AppError::delete_failed("pet", e)),
        }
    }
}
