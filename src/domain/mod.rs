//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.
//!
//! DDD: Domain layer has NO external dependencies (except error types).
//! Contains: Entities, Value Objects, Domain Services.

pub mod csv;
pub mod password;
pub mod pet;
pub mod reservation;
pub mod user;

pub use password::Password;
pub use pet::{check_weight, AbitTypeCode, CreatePet, NewPet, Pet, Species};
pub use reservation::{
    slot_label, Actor, CreateReservation, NewReservation, Reservation, ReservationAction,
    ReservationStatus, ReservationSummary, ServiceCategorical,
};
pub use user::{
    CaCategorical, CreateUser, Gender, NewUser, PartnerProfile, PetsitterWork, User, UserStatus,
    UserSummary, UserType, VetSpecialty,
};
