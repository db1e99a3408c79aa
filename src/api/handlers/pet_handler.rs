//! Pet handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::{IdResponse, ImageUrlResponse};
use crate::api::extractors::{ImageUpload, ValidatedJson, ValidatedQuery};
use crate::api::AppState;
use crate::config::{API_PREFIX, MAX_IMAGE_URL_LENGTH, MAX_PET_NAME_LENGTH};
use crate::domain::{check_weight, NewPet, Pet};
use crate::errors::{AppError, AppResult};
use crate::infra::ImageCategory;
use crate::types::{ApiResponse, Created};

/// Pet profile creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePetRequest {
    #[validate(range(min = 1, message = "userId is required"))]
    #[schema(example = 1)]
    pub user_id: i64,
    #[schema(example = "DOG")]
    pub species: String,
    #[schema(example = "maltese")]
    pub species_detail: Option<String>,
    #[schema(example = "MALE")]
    pub gender: String,
    #[schema(value_type = String, example = "2021-04-01")]
    pub birthdate: NaiveDate,
    #[validate(custom(function = "validate_weight"))]
    #[schema(value_type = f64, example = 4.2)]
    pub weight: Decimal,
    #[schema(example = "ENFP")]
    pub abit_type_code: String,
    #[validate(length(max = MAX_IMAGE_URL_LENGTH, message = "imageUrl is too long"))]
    pub image_url: Option<String>,
    #[validate(length(min = 1, max = MAX_PET_NAME_LENGTH, message = "name must be 1 to 20 characters"))]
    #[schema(example = "Bori")]
    pub name: String,
}

fn validate_weight(weight: &Decimal) -> Result<(), ValidationError> {
    check_weight(*weight).map_err(|e| {
        let mut error = ValidationError::new("weight");
        if let AppError::Validation(message) = e {
            error.message = Some(message.into());
        }
        error
    })
}

impl From<CreatePetRequest> for NewPet {
    fn from(req: CreatePetRequest) -> Self {
        Self {
            owner_id: req.user_id,
            species: req.species,
            species_detail: req.species_detail,
            gender: req.gender,
            birthdate: req.birthdate,
            weight: req.weight,
            abit_type_code: req.abit_type_code,
            image_url: req.image_url,
            name: req.name,
        }
    }
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct OwnerQuery {
    /// Owning user ID
    #[validate(range(min = 1, message = "ownerId is required"))]
    pub owner_id: i64,
}

/// Create pet routes
pub fn pet_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_pet).get(list_pets))
        .route("/image", post(upload_image))
        .route("/:id", get(get_pet).delete(delete_pet))
}

/// Create a pet profile
#[utoipa::path(
    post,
    path = "/api/v1/pets",
    tag = "Pets",
    request_body = CreatePetRequest,
    responses(
        (status = 201, description = "Pet created", body = IdResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Owner not found")
    )
)]
pub async fn create_pet(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreatePetRequest>,
) -> AppResult<Created<IdResponse>> {
    let id = state.pets().create(payload.into()).await?;

    Ok(Created::new(
        format!("{}/pets/{}", API_PREFIX, id),
        IdResponse { id },
    ))
}

/// List the pets of one owner
#[utoipa::path(
    get,
    path = "/api/v1/pets",
    tag = "Pets",
    params(OwnerQuery),
    responses(
        (status = 200, description = "Pets of the owner", body = Vec<Pet>),
        (status = 400, description = "Missing ownerId")
    )
)]
pub async fn list_pets(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<OwnerQuery>,
) -> AppResult<Json<ApiResponse<Vec<Pet>>>> {
    let pets = state.pets().get_pets_by_owner(query.owner_id).await?;
    Ok(Json(ApiResponse::ok(pets)))
}

/// Get a pet by ID
#[utoipa::path(
    get,
    path = "/api/v1/pets/{id}",
    tag = "Pets",
    params(("id" = i64, Path, description = "Pet ID")),
    responses(
        (status = 200, description = "Pet found", body = Pet),
        (status = 404, description = "Pet not found")
    )
)]
pub async fn get_pet(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Pet>>> {
    let pet = state.pets().get_pet(id).await?;
    Ok(Json(ApiResponse::ok(pet)))
}

/// Delete a pet and, best-effort, its stored image
#[utoipa::path(
    delete,
    path = "/api/v1/pets/{id}",
    tag = "Pets",
    params(("id" = i64, Path, description = "Pet ID")),
    responses(
        (status = 200, description = "Pet deleted", body = IdResponse),
        (status = 404, description = "Pet not found"),
        (status = 500, description = "Delete failed")
    )
)]
pub async fn delete_pet(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<IdResponse>>> {
    let pet = state.pets().delete(id).await?;

    if let Some(url) = pet.image_url.as_deref() {
        if !state.media.delete_by_url(state.config.media_path(url)).await {
            tracing::debug!(pet_id = id, image_url = url, "Pet image was not removed");
        }
    }

    Ok(Json(ApiResponse::ok(IdResponse { id })))
}

/// Upload a pet image. The returned relative URL goes into `imageUrl`
/// of a later create request.
#[utoipa::path(
    post,
    path = "/api/v1/pets/image",
    tag = "Pets",
    params(OwnerQuery),
    responses(
        (status = 200, description = "Image stored", body = ImageUrlResponse),
        (status = 400, description = "Missing file or unsupported type")
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<OwnerQuery>,
    upload: ImageUpload,
) -> AppResult<Json<ApiResponse<ImageUrlResponse>>> {
    let image_url = state
        .media
        .save(ImageCategory::Pets, query.owner_id, upload.file_name, upload.bytes)
        .await?;

    Ok(Json(ApiResponse::ok(ImageUrlResponse { image_url })))
}
