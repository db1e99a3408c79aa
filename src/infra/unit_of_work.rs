//! Unit of Work: one access point for every repository.
//!
//! Each repository write is a single SQL statement (insert, keyed update,
//! conditional update or delete), so every service operation commits or
//! fails as one unit without an explicit transaction. Read operations run
//! under the database's default committed-read isolation.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{
    PetRepository, PetStore, ReservationRepository, ReservationStore, UserRepository, UserStore,
};

/// Repository aggregate injected into services.
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn pets(&self) -> Arc<dyn PetRepository>;

    fn reservations(&self) -> Arc<dyn ReservationRepository>;
}

/// Database-backed UnitOfWork
pub struct Persistence {
    user_repo: Arc<UserStore>,
    pet_repo: Arc<PetStore>,
    reservation_repo: Arc<ReservationStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            pet_repo: Arc::new(PetStore::new(db.clone())),
            reservation_repo: Arc::new(ReservationStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn pets(&self) -> Arc<dyn PetRepository> {
        self.pet_repo.clone()
    }

    fn reservations(&self) -> Arc<dyn ReservationRepository> {
        self.reservation_repo.clone()
    }
}
