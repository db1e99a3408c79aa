//! Service Container - Centralized service access with parallel execution support.
//!
//! Handlers reach every use case through `ServiceContainer`, which keeps
//! them independent of the concrete managers and lets tests swap in mocks.

use std::future::Future;
use std::sync::Arc;

use super::{PetService, ReservationService, UserService};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{gateway_from_config, NotificationGateway, Persistence};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn users(&self) -> Arc<dyn UserService>;

    fn pets(&self) -> Arc<dyn PetService>;

    fn reservations(&self) -> Arc<dyn ReservationService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    user_service: Arc<dyn UserService>,
    pet_service: Arc<dyn PetService>,
    reservation_service: Arc<dyn ReservationService>,
}

impl Services {
    pub fn new(
        user_service: Arc<dyn UserService>,
        pet_service: Arc<dyn PetService>,
        reservation_service: Arc<dyn ReservationService>,
    ) -> Self {
        Self {
            user_service,
            pet_service,
            reservation_service,
        }
    }

    /// Wire every service over one database connection.
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: &Config) -> Self {
        Self::with_notifier(db, gateway_from_config(config))
    }

    /// Same as `from_connection` with an explicit push gateway.
    pub fn with_notifier(
        db: sea_orm::DatabaseConnection,
        notifier: Arc<dyn NotificationGateway>,
    ) -> Self {
        use super::{PetManager, ReservationManager, UserManager};

        let uow = Arc::new(Persistence::new(db));
        let user_service: Arc<dyn UserService> = Arc::new(UserManager::new(uow.clone()));
        let pet_service = Arc::new(PetManager::new(uow.clone()));
        let reservation_service = Arc::new(ReservationManager::new(
            uow,
            user_service.clone(),
            notifier,
        ));

        Self {
            user_service,
            pet_service,
            reservation_service,
        }
    }
}

impl ServiceContainer for Services {
    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn pets(&self) -> Arc<dyn PetService> {
        self.pet_service.clone()
    }

    fn reservations(&self) -> Arc<dyn ReservationService> {
        self.reservation_service.clone()
    }
}

/// Parallel execution utilities for running independent operations concurrently.
pub mod parallel {
    use super::*;

    /// Execute a collection of homogeneous async operations in parallel.
    ///
    /// Results are returned in the same order as the input futures; the
    /// first error wins.
    pub async fn join_all<F, T>(futures: Vec<F>) -> AppResult<Vec<T>>
    where
        F: Future<Output = AppResult<T>>,
    {
        let results = futures::future::join_all(futures).await;
        results.into_iter().collect()
    }
}
