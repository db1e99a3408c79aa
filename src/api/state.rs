//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, FileStorage, MediaStore};
use crate::services::{PetService, ReservationService, ServiceContainer, Services, UserService};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    /// Uploaded image storage
    pub media: Arc<dyn MediaStore>,
    /// Database connection (health checks)
    pub database: Arc<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire production services, storage and push delivery from config.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let services = Arc::new(Services::from_connection(
            database.get_connection(),
            &config,
        ));
        let media = Arc::new(FileStorage::new(&config.media_base_path));

        Self::new(services, media, database, config)
    }

    /// Create state from explicitly injected collaborators.
    pub fn new(
        services: Arc<dyn ServiceContainer>,
        media: Arc<dyn MediaStore>,
        database: Arc<Database>,
        config: Config,
    ) -> Self {
        Self {
            services,
            media,
            database,
            config: Arc::new(config),
        }
    }

    pub fn users(&self) -> Arc<dyn UserService> {
        self.services.users()
    }

    pub fn pets(&self) -> Arc<dyn PetService> {
        self.services.pets()
    }

    pub fn reservations(&self) -> Arc<dyn ReservationService> {
        self.services.reservations()
    }
}
