//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, migrations and repositories
//! - Image storage on disk
//! - Push notification delivery

pub mod db;
pub mod media;
pub mod notification;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use media::{FileStorage, ImageCategory, MediaStore};
pub use notification::{
    gateway_from_config, DisabledGateway, FcmGateway, NotificationError, NotificationGateway,
    PushMessage,
};
pub use repositories::{
    PetRepository, PetStore, ReservationRepository, ReservationStore, UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use media::MockMediaStore;
#[cfg(any(test, feature = "test-utils"))]
pub use notification::MockNotificationGateway;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockPetRepository, MockReservationRepository, MockUserRepository};
