//! Reservation handlers: booking, lifecycle actions and "my reservations".

use std::future::Future;

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, patch, post},
    Router,
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::ImageUrlResponse;
use crate::api::extractors::{ImageUpload, ValidatedJson, ValidatedQuery};
use crate::api::AppState;
use crate::config::MAX_RESERVATION_CONTENT_LENGTH;
use crate::domain::{
    NewReservation, PetsitterWork, ReservationStatus, ReservationSummary, UserType, VetSpecialty,
};
use crate::errors::AppResult;
use crate::infra::ImageCategory;
use crate::types::ApiResponse;

/// Reservation request. `user_type` names the kind of service booked.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_service_lists"))]
pub struct CreateReservationRequest {
    #[validate(range(min = 1, message = "partner_id is required"))]
    #[schema(example = 7)]
    pub partner_id: i64,
    #[validate(range(min = 1, message = "user_id is required"))]
    #[schema(example = 1)]
    pub user_id: i64,
    pub user_type: UserType,
    #[serde(default)]
    pub vet_specialties: Vec<VetSpecialty>,
    #[serde(default)]
    pub petsitter_works: Vec<PetsitterWork>,
    #[validate(range(min = 1, message = "pets_id is required"))]
    #[schema(example = 3)]
    pub pets_id: i64,
    /// Requested visit time in the client's local offset
    #[schema(value_type = String, example = "2025-03-14T09:30:00+09:00")]
    pub created_at: DateTime<FixedOffset>,
    #[serde(default)]
    pub resv_urls: Vec<String>,
    #[validate(
        length(max = MAX_RESERVATION_CONTENT_LENGTH, message = "resv_content must be at most 2000 characters"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Limping on the left hind leg")]
    pub resv_content: String,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("resv_content is required".into());
        return Err(error);
    }
    Ok(())
}

fn validate_service_lists(req: &CreateReservationRequest) -> Result<(), ValidationError> {
    let missing = match req.user_type {
        UserType::Hospital if req.vet_specialties.is_empty() => Some("vet_specialties"),
        UserType::Sitter if req.petsitter_works.is_empty() => Some("petsitter_works"),
        _ => None,
    };

    match missing {
        Some(field) => {
            let mut error = ValidationError::new("service_list_required");
            error.message = Some(format!("{} is required for {}", field, req.user_type).into());
            Err(error)
        }
        None => Ok(()),
    }
}

impl From<CreateReservationRequest> for NewReservation {
    fn from(req: CreateReservationRequest) -> Self {
        Self {
            user_id: req.user_id,
            partner_id: req.partner_id,
            pet_id: req.pets_id,
            user_type: req.user_type,
            vet_specialties: req.vet_specialties,
            petsitter_works: req.petsitter_works,
            // Stored as the wall-clock time the client sent
            created_at: req.created_at.naive_local(),
            image_urls: req.resv_urls,
            content: req.resv_content,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationIdResponse {
    #[schema(example = 10)]
    pub reservation_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationStatusResponse {
    #[schema(example = 10)]
    pub reservation_id: i64,
    pub status: ReservationStatus,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PartnerActionQuery {
    /// Partner performing the action
    #[validate(range(min = 1, message = "partner_id is required"))]
    pub partner_id: i64,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OwnerActionQuery {
    /// Owner cancelling the reservation
    #[validate(range(min = 1, message = "user_id is required"))]
    pub user_id: i64,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct MyReservationsQuery {
    #[validate(range(min = 1, message = "userId is required"))]
    pub user_id: i64,
    /// HOSPITAL, GROOMING, CAFE or SITTER, case-insensitive
    pub service_type: Option<String>,
}

/// Create reservation routes
pub fn reservation_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_reservation))
        .route("/mine", get(my_reservations))
        .route("/:id/image", post(upload_image))
        .route("/:id/accept", patch(accept))
        .route("/:id/reject", patch(reject))
        .route("/:id/check-in", patch(check_in))
        .route("/:id/complete", patch(complete))
        .route("/:id/cancel", patch(cancel))
}

/// Book a service with a partner
#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 200, description = "Reservation created in WAITING", body = ReservationIdResponse),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateReservationRequest>,
) -> AppResult<Json<ApiResponse<ReservationIdResponse>>> {
    let reservation_id = state.reservations().create(payload.into()).await?;
    Ok(Json(ApiResponse::ok(ReservationIdResponse { reservation_id })))
}

/// List a user's reservations
#[utoipa::path(
    get,
    path = "/api/v1/reservations/mine",
    tag = "Reservations",
    params(MyReservationsQuery),
    responses(
        (status = 200, description = "Reservations of the user", body = Vec<ReservationSummary>),
        (status = 400, description = "Missing userId")
    )
)]
pub async fn my_reservations(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<MyReservationsQuery>,
) -> AppResult<Json<ApiResponse<Vec<ReservationSummary>>>> {
    let summaries = state
        .reservations()
        .my_reservations(query.user_id, query.service_type)
        .await?;
    Ok(Json(ApiResponse::ok(summaries)))
}

/// Attach an image to a reservation
#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/image",
    tag = "Reservations",
    params(("id" = i64, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Image stored", body = ImageUrlResponse),
        (status = 400, description = "Missing file or unsupported type"),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    upload: ImageUpload,
) -> AppResult<Json<ApiResponse<ImageUrlResponse>>> {
    let relative = state
        .media
        .save(ImageCategory::Reservations, id, upload.file_name, upload.bytes)
        .await?;
    let image_url = state.config.public_url(&relative);

    if let Err(e) = state.reservations().update_image(id, image_url.clone()).await {
        state.media.delete_by_url(&relative).await;
        return Err(e);
    }

    Ok(Json(ApiResponse::ok(ImageUrlResponse { image_url })))
}

async fn respond<F>(id: i64, action: F) -> AppResult<Json<ApiResponse<ReservationStatusResponse>>>
where
    F: Future<Output = AppResult<ReservationStatus>>,
{
    let status = action.await?;
    Ok(Json(ApiResponse::ok(ReservationStatusResponse {
        reservation_id: id,
        status,
    })))
}

/// Partner accepts a waiting reservation
#[utoipa::path(
    patch,
    path = "/api/v1/reservations/{id}/accept",
    tag = "Reservations",
    params(("id" = i64, Path, description = "Reservation ID"), PartnerActionQuery),
    responses(
        (status = 200, description = "Reservation confirmed", body = ReservationStatusResponse),
        (status = 403, description = "Not the reservation's partner"),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Reservation is not waiting")
    )
)]
pub async fn accept(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedQuery(query): ValidatedQuery<PartnerActionQuery>,
) -> AppResult<Json<ApiResponse<ReservationStatusResponse>>> {
    respond(id, state.reservations().accept(id, query.partner_id)).await
}

/// Partner declines a reservation
#[utoipa::path(
    patch,
    path = "/api/v1/reservations/{id}/reject",
    tag = "Reservations",
    params(("id" = i64, Path, description = "Reservation ID"), PartnerActionQuery),
    responses(
        (status = 200, description = "Reservation cancelled by partner", body = ReservationStatusResponse),
        (status = 403, description = "Not the reservation's partner"),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Illegal status transition")
    )
)]
pub async fn reject(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedQuery(query): ValidatedQuery<PartnerActionQuery>,
) -> AppResult<Json<ApiResponse<ReservationStatusResponse>>> {
    respond(id, state.reservations().reject(id, query.partner_id)).await
}

/// Partner checks the pet in
#[utoipa::path(
    patch,
    path = "/api/v1/reservations/{id}/check-in",
    tag = "Reservations",
    params(("id" = i64, Path, description = "Reservation ID"), PartnerActionQuery),
    responses(
        (status = 200, description = "Reservation checked in", body = ReservationStatusResponse),
        (status = 403, description = "Not the reservation's partner"),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Illegal status transition")
    )
)]
pub async fn check_in(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedQuery(query): ValidatedQuery<PartnerActionQuery>,
) -> AppResult<Json<ApiResponse<ReservationStatusResponse>>> {
    respond(id, state.reservations().check_in(id, query.partner_id)).await
}

/// Partner completes a checked-in reservation
#[utoipa::path(
    patch,
    path = "/api/v1/reservations/{id}/complete",
    tag = "Reservations",
    params(("id" = i64, Path, description = "Reservation ID"), PartnerActionQuery),
    responses(
        (status = 200, description = "Reservation completed", body = ReservationStatusResponse),
        (status = 403, description = "Not the reservation's partner"),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Illegal status transition")
    )
)]
pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedQuery(query): ValidatedQuery<PartnerActionQuery>,
) -> AppResult<Json<ApiResponse<ReservationStatusResponse>>> {
    respond(id, state.reservations().complete(id, query.partner_id)).await
}

/// Owner cancels a reservation
#[utoipa::path(
    patch,
    path = "/api/v1/reservations/{id}/cancel",
    tag = "Reservations",
    params(("id" = i64, Path, description = "Reservation ID"), OwnerActionQuery),
    responses(
        (status = 200, description = "Reservation cancelled by user", body = ReservationStatusResponse),
        (status = 403, description = "Not the reservation's owner"),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Illegal status transition")
    )
)]
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedQuery(query): ValidatedQuery<OwnerActionQuery>,
) -> AppResult<Json<ApiResponse<ReservationStatusResponse>>> {
    respond(id, state.reservations().cancel(id, query.user_id)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: serde_json::Value) -> CreateReservationRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_hospital_request_needs_specialties() {
        let req = request(serde_json::json!({
            "partner_id": 7,
            "user_id": 1,
            "user_type": "HOSPITAL",
            "pets_id": 3,
            "created_at": "2025-03-14T09:30:00+09:00",
            "resv_content": "limping"
        }));
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_content_is_required() {
        let body = serde_json::json!({
            "partner_id": 7,
            "user_id": 1,
            "user_type": "GROOMING",
            "pets_id": 3,
            "created_at": "2025-03-14T15:00:00+09:00"
        });
        assert!(serde_json::from_value::<CreateReservationRequest>(body).is_err());
    }

    #[test]
    fn test_blank_content_fails_validation() {
        for content in ["", "   \n\t"] {
            let req = request(serde_json::json!({
                "partner_id": 7,
                "user_id": 1,
                "user_type": "GROOMING",
                "pets_id": 3,
                "created_at": "2025-03-14T15:00:00+09:00",
                "resv_content": content
            }));
            assert!(req.validate().is_err(), "{:?} should be rejected", content);
        }
    }

    #[test]
    fn test_created_at_keeps_local_wall_clock() {
        let req = request(serde_json::json!({
            "partner_id": 7,
            "user_id": 1,
            "user_type": "HOSPITAL",
            "vet_specialties": ["DENTISTRY"],
            "pets_id": 3,
            "created_at": "2025-03-14T09:30:00+09:00",
            "resv_urls": ["/media/reservations/1/a.png"],
            "resv_content": "limping"
        }));
        assert!(req.validate().is_ok());

        let new: NewReservation = req.into();
        assert_eq!(new.created_at.to_string(), "2025-03-14 09:30:00");
        assert_eq!(new.pet_id, 3);
        assert_eq!(new.image_urls.len(), 1);
    }

    #[test]
    fn test_content_length_limit() {
        let req = request(serde_json::json!({
            "partner_id": 7,
            "user_id": 1,
            "user_type": "GROOMING",
            "pets_id": 3,
            "created_at": "2025-03-14T15:00:00+09:00",
            "resv_content": "x".repeat(2001)
        }));
        assert!(req.validate().is_err());
    }
}
