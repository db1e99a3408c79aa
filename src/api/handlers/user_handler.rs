//! User handlers: signup, login, partner directory and profile updates.

use std::borrow::Cow;
use std::str::FromStr;

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, patch, post},
    Router,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::{IdResponse, ImageUrlResponse};
use crate::api::extractors::{ImageUpload, ValidatedJson, ValidatedQuery};
use crate::api::AppState;
use crate::config::{
    API_PREFIX, MAX_NICKNAME_LENGTH, MAX_PASSWORD_LENGTH, MAX_USERNAME_LENGTH,
    MIN_NICKNAME_LENGTH, MIN_PASSWORD_LENGTH,
};
use crate::domain::{
    CaCategorical, Gender, NewUser, PartnerProfile, PetsitterWork, User, UserSummary, UserType,
    VetSpecialty,
};
use crate::errors::{AppError, AppResult};
use crate::infra::ImageCategory;
use crate::types::{ApiResponse, Created};

static NICKNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[가-힣a-zA-Z0-9_-]+$").expect("nickname pattern is valid"));

static HOURS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01]\d|2[0-3]):[0-5]\d(:[0-5]\d)?$").expect("working hours pattern is valid")
});

/// Signup request. Enum codes are matched case-insensitively.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_partner_fields"))]
pub struct SignupRequest {
    #[validate(length(min = 1, max = MAX_USERNAME_LENGTH, message = "username must be 1 to 20 characters"))]
    #[schema(example = "kim")]
    pub username: String,
    #[validate(
        length(min = MIN_NICKNAME_LENGTH, max = MAX_NICKNAME_LENGTH, message = "nickname must be 2 to 50 characters"),
        regex(path = *NICKNAME_RE, message = "nickname may contain only Hangul, letters, digits, '-' and '_'")
    )]
    #[schema(example = "doglover")]
    pub nickname: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(length(min = MIN_PASSWORD_LENGTH, max = MAX_PASSWORD_LENGTH, message = "password must be 8 to 64 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8, max_length = 64)]
    pub password: String,
    #[schema(example = "FEMALE")]
    pub gender: String,
    #[schema(value_type = String, example = "1990-01-31")]
    pub birthdate: NaiveDate,
    #[validate(length(min = 1, max = 255, message = "address must be 1 to 255 characters"))]
    #[schema(example = "Seoul")]
    pub address: String,
    #[schema(example = "HOSPITAL")]
    pub user_type: String,
    /// Tax identification number (partners)
    #[schema(example = "123-45-67890")]
    pub tin: Option<String>,
    #[schema(example = "BOTH")]
    pub ca_categorical: Option<String>,
    #[schema(example = "DENTISTRY")]
    pub vet_specialty: Option<String>,
    #[schema(example = "WALK")]
    pub petsitter_work: Option<String>,
    #[serde(default)]
    pub working_days: Vec<String>,
    #[validate(regex(path = *HOURS_RE, message = "working_start_hours must be HH:mm or HH:mm:ss"))]
    #[schema(example = "09:00")]
    pub working_start_hours: Option<String>,
    #[validate(regex(path = *HOURS_RE, message = "working_end_hours must be HH:mm or HH:mm:ss"))]
    #[schema(example = "18:00")]
    pub working_end_hours: Option<String>,
}

fn schema_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Hospitals and sitters must describe their business.
fn validate_partner_fields(req: &SignupRequest) -> Result<(), ValidationError> {
    let Ok(user_type) = UserType::from_str(req.user_type.trim()) else {
        return Ok(());
    };
    if !user_type.has_partner_profile() {
        return Ok(());
    }

    let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
    if blank(&req.tin) {
        return Err(schema_error("tin_required", "tin is required for partners"));
    }
    if blank(&req.ca_categorical) {
        return Err(schema_error(
            "ca_categorical_required",
            "ca_categorical is required for partners",
        ));
    }
    match user_type {
        UserType::Hospital if blank(&req.vet_specialty) => Err(schema_error(
            "vet_specialty_required",
            "vet_specialty is required for HOSPITAL",
        )),
        UserType::Sitter if blank(&req.petsitter_work) => Err(schema_error(
            "petsitter_work_required",
            "petsitter_work is required for SITTER",
        )),
        _ => Ok(()),
    }
}

fn parse_code<T: FromStr>(field: &str, value: &str) -> AppResult<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| AppError::validation(format!("Invalid {}: '{}'", field, value)))
}

fn parse_optional_code<T: FromStr>(field: &str, value: Option<&str>) -> AppResult<Option<T>> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| parse_code(field, v))
        .transpose()
}

impl SignupRequest {
    fn into_new_user(self) -> AppResult<NewUser> {
        let partner = PartnerProfile {
            tin: self.tin.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
            ca_categorical: parse_optional_code::<CaCategorical>(
                "ca_categorical",
                self.ca_categorical.as_deref(),
            )?,
            vet_specialty: parse_optional_code::<VetSpecialty>(
                "vet_specialty",
                self.vet_specialty.as_deref(),
            )?,
            petsitter_work: parse_optional_code::<PetsitterWork>(
                "petsitter_work",
                self.petsitter_work.as_deref(),
            )?,
            working_days: self.working_days,
            working_start_hours: self.working_start_hours,
            working_end_hours: self.working_end_hours,
        };

        Ok(NewUser {
            username: self.username,
            nickname: self.nickname,
            email: self.email,
            password: self.password,
            gender: parse_code::<Gender>("gender", &self.gender)?,
            birthdate: self.birthdate,
            address: self.address,
            user_type: parse_code::<UserType>("user_type", &self.user_type)?,
            partner,
        })
    }
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CheckEmailQuery {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmailExistsResponse {
    pub exists: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PartnerQuery {
    pub user_type: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WorkingSchedule {
    pub working_days: Vec<String>,
    pub working_start_hours: Option<String>,
    pub working_end_hours: Option<String>,
}

/// One partner in the directory. Hospitals carry `vet_specialty` and
/// `ca_categorical`; sitters carry `petsitter`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PartnerEntry {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vet_specialty: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_categorical: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub petsitter: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub working_schedule: WorkingSchedule,
}

impl PartnerEntry {
    fn from_user(user: User) -> Self {
        let partner = user.partner;
        let (vet_specialty, ca_categorical, petsitter) = match user.user_type {
            UserType::Hospital => (
                Some(partner.vet_specialty.iter().map(ToString::to_string).collect()),
                partner.ca_categorical.map(|c| c.to_string()),
                None,
            ),
            _ => (
                None,
                None,
                Some(partner.petsitter_work.iter().map(ToString::to_string).collect()),
            ),
        };

        Self {
            id: user.id,
            username: user.username,
            vet_specialty,
            ca_categorical,
            petsitter,
            image_url: user.profile_url,
            working_schedule: WorkingSchedule {
                working_days: partner.working_days,
                working_start_hours: partner.working_start_hours,
                working_end_hours: partner.working_end_hours,
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PartnerDirectory {
    #[schema(example = "HOSPITAL")]
    pub user_type: String,
    pub total: usize,
    pub result: Vec<PartnerEntry>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct FcmTokenRequest {
    #[validate(length(min = 1, message = "token is required"))]
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdatedResponse {
    pub updated: bool,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(signup))
        .route("/login", post(login))
        .route("/check-email", get(check_email))
        .route("/partners", get(list_partners))
        .route("/:id/image", post(upload_image))
        .route("/:id/fcm-token", patch(update_fcm_token))
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = IdResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> AppResult<Created<IdResponse>> {
    let id = state.users().signup(payload.into_new_user()?).await?;

    Ok(Created::new(
        format!("{}/users/{}", API_PREFIX, id),
        IdResponse { id },
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = UserSummary),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Email or password does not match")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<UserSummary>>> {
    let users = state.users();
    let user = users.login(payload.email, payload.password).await?;

    if let Err(e) = users.record_login(user.id).await {
        tracing::warn!(user_id = user.id, error = %e, "Failed to record last login");
    }

    Ok(Json(ApiResponse::ok(UserSummary::from(user))))
}

/// Check whether an email is already registered
#[utoipa::path(
    get,
    path = "/api/v1/users/check-email",
    tag = "Users",
    params(("email" = String, Query, description = "Email to check")),
    responses(
        (status = 200, description = "Lookup result", body = EmailExistsResponse),
        (status = 400, description = "Validation error")
    )
)]
pub async fn check_email(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<CheckEmailQuery>,
) -> AppResult<Json<ApiResponse<EmailExistsResponse>>> {
    let exists = state.users().check_email_exists(query.email).await?;
    Ok(Json(ApiResponse::ok(EmailExistsResponse { exists })))
}

/// Partner directory for hospitals or sitters
#[utoipa::path(
    get,
    path = "/api/v1/users/partners",
    tag = "Users",
    params(("user_type" = String, Query, description = "HOSPITAL or SITTER")),
    responses(
        (status = 200, description = "Partner directory", body = PartnerDirectory),
        (status = 400, description = "Unknown or unsupported user type")
    )
)]
pub async fn list_partners(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<PartnerQuery>,
) -> AppResult<Json<ApiResponse<PartnerDirectory>>> {
    let user_type = parse_code::<UserType>("user_type", &query.user_type)?;
    let partners = state.users().list_partners(user_type).await?;

    let result: Vec<PartnerEntry> = partners.into_iter().map(PartnerEntry::from_user).collect();
    Ok(Json(ApiResponse::ok(PartnerDirectory {
        user_type: user_type.to_string(),
        total: result.len(),
        result,
    })))
}

/// Upload a profile image
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/image",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Image stored", body = ImageUrlResponse),
        (status = 400, description = "Missing file or unsupported type"),
        (status = 404, description = "User not found")
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    upload: ImageUpload,
) -> AppResult<Json<ApiResponse<ImageUrlResponse>>> {
    let relative = state
        .media
        .save(ImageCategory::Users, id, upload.file_name, upload.bytes)
        .await?;
    let image_url = state.config.public_url(&relative);

    if let Err(e) = state.users().update_profile_url(id, image_url.clone()).await {
        state.media.delete_by_url(&relative).await;
        return Err(e);
    }

    Ok(Json(ApiResponse::ok(ImageUrlResponse { image_url })))
}

/// Register the device token used for push notifications
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}/fcm-token",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = FcmTokenRequest,
    responses(
        (status = 200, description = "Token stored", body = UpdatedResponse),
        (status = 400, description = "Blank token"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_fcm_token(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<FcmTokenRequest>,
) -> AppResult<Json<ApiResponse<UpdatedResponse>>> {
    state.users().update_fcm_token(id, payload.token).await?;
    Ok(Json(ApiResponse::ok(UpdatedResponse { updated: true })))
}
