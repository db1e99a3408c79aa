//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;

use petcare_api::domain::{
    AbitTypeCode, Gender, PartnerProfile, Pet, Reservation, ReservationStatus,
    ServiceCategorical, Species, User, UserStatus, UserType, VetSpecialty,
};
use petcare_api::infra::{
    MockPetRepository, MockReservationRepository, MockUserRepository, PetRepository,
    ReservationRepository, UnitOfWork, UserRepository,
};

/// UnitOfWork over mockall repositories
pub struct TestUnitOfWork {
    pub users: Arc<MockUserRepository>,
    pub pets: Arc<MockPetRepository>,
    pub reservations: Arc<MockReservationRepository>,
}

impl TestUnitOfWork {
    pub fn new() -> Self {
        Self::with(
            MockUserRepository::new(),
            MockPetRepository::new(),
            MockReservationRepository::new(),
        )
    }

    pub fn with(
        users: MockUserRepository,
        pets: MockPetRepository,
        reservations: MockReservationRepository,
    ) -> Self {
        Self {
            users: Arc::new(users),
            pets: Arc::new(pets),
            reservations: Arc::new(reservations),
        }
    }

    pub fn for_users(repo: MockUserRepository) -> Arc<Self> {
        Arc::new(Self::with(
            repo,
            MockPetRepository::new(),
            MockReservationRepository::new(),
        ))
    }

    pub fn for_pets(repo: MockPetRepository) -> Arc<Self> {
        Arc::new(Self::with(
            MockUserRepository::new(),
            repo,
            MockReservationRepository::new(),
        ))
    }

    pub fn for_reservations(repo: MockReservationRepository) -> Arc<Self> {
        Arc::new(Self::with(
            MockUserRepository::new(),
            MockPetRepository::new(),
            repo,
        ))
    }
}

impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn pets(&self) -> Arc<dyn PetRepository> {
        self.pets.clone()
    }

    fn reservations(&self) -> Arc<dyn ReservationRepository> {
        self.reservations.clone()
    }
}

pub fn user(id: i64, user_type: UserType) -> User {
    User {
        id,
        username: format!("user{}", id),
        nickname: format!("nick{}", id),
        email: format!("user{}@example.com", id),
        password_hash: "hashed".to_string(),
        gender: Gender::Female,
        birthdate: NaiveDate::from_ymd_opt(1990, 1, 31).unwrap(),
        address: "Seoul".to_string(),
        user_type,
        status: UserStatus::Active,
        partner: PartnerProfile::default(),
        locked_until: None,
        last_login_at: None,
        profile_url: None,
        fcm_token: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        deleted_at: None,
    }
}

pub fn pet(id: i64, owner_id: i64) -> Pet {
    Pet {
        id,
        owner_id,
        species: Species::Dog,
        species_detail: Some("maltese".to_string()),
        gender: Gender::Male,
        birthdate: NaiveDate::from_ymd_opt(2021, 4, 1).unwrap(),
        weight: Decimal::new(42, 1),
        abit_type_code: AbitTypeCode::Enfp,
        image_url: None,
        name: "Bori".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn local(y: i32, m: u32, d: u32, hour: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(hour, min, 0)
        .unwrap()
}

/// Hospital reservation of user 1 with partner 7, booked for 09:30.
pub fn reservation(id: i64, status: ReservationStatus) -> Reservation {
    Reservation {
        id,
        user_id: 1,
        partner_id: 7,
        pet_id: 3,
        service_categorical: ServiceCategorical::Hospital,
        status,
        created_at: local(2025, 3, 14, 9, 30),
        canceled_at: None,
        image_urls: vec![],
        content: "limping".to_string(),
        vet_specialties: vec![VetSpecialty::Dentistry, VetSpecialty::Surgery],
        petsitter_works: vec![],
    }
}
