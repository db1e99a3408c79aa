//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion and reach storage through the Unit of Work.

pub mod container;
mod pet_service;
mod reservation_service;
mod user_service;

// Service Container
pub use container::{parallel, ServiceContainer, Services};

// Service traits and implementations
pub use pet_service::{PetManager, PetService};
pub use reservation_service::{ReservationManager, ReservationService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use pet_service::MockPetService;
#[cfg(any(test, feature = "test-utils"))]
pub use reservation_service::MockReservationService;
#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
