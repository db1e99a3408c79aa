//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::OpenApi;

use crate::api::handlers::{
    pet_handler, reservation_handler, user_handler, IdResponse, ImageUrlResponse,
};
use crate::domain::{
    AbitTypeCode, CaCategorical, Gender, Pet, PetsitterWork, ReservationStatus,
    ReservationSummary, ServiceCategorical, Species, UserSummary, UserType, VetSpecialty,
};

/// OpenAPI documentation for the pet care API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pet Care API",
        version = "0.1.0",
        description = "Users, partners, pets and service reservations",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        // User endpoints
        user_handler::signup,
        user_handler::login,
        user_handler::check_email,
        user_handler::list_partners,
        user_handler::upload_image,
        user_handler::update_fcm_token,
        // Pet endpoints
        pet_handler::create_pet,
        pet_handler::list_pets,
        pet_handler::get_pet,
        pet_handler::delete_pet,
        pet_handler::upload_image,
        // Reservation endpoints
        reservation_handler::create_reservation,
        reservation_handler::my_reservations,
        reservation_handler::upload_image,
        reservation_handler::accept,
        reservation_handler::reject,
        reservation_handler::check_in,
        reservation_handler::complete,
        reservation_handler::cancel,
    ),
    components(
        schemas(
            // Domain types
            UserType,
            Gender,
            CaCategorical,
            VetSpecialty,
            PetsitterWork,
            Species,
            AbitTypeCode,
            ServiceCategorical,
            ReservationStatus,
            UserSummary,
            Pet,
            ReservationSummary,
            // Shared response bodies
            IdResponse,
            ImageUrlResponse,
            // User handler types
            user_handler::SignupRequest,
            user_handler::LoginRequest,
            user_handler::EmailExistsResponse,
            user_handler::PartnerDirectory,
            user_handler::PartnerEntry,
            user_handler::WorkingSchedule,
            user_handler::FcmTokenRequest,
            user_handler::UpdatedResponse,
            // Pet handler types
            pet_handler::CreatePetRequest,
            // Reservation handler types
            reservation_handler::CreateReservationRequest,
            reservation_handler::ReservationIdResponse,
            reservation_handler::ReservationStatusResponse,
        )
    ),
    tags(
        (name = "Users", description = "Signup, login and partner directory"),
        (name = "Pets", description = "Pet profiles"),
        (name = "Reservations", description = "Service reservations and their lifecycle")
    )
)]
pub struct ApiDoc;
