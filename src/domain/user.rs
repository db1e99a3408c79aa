//! User domain entity and related types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Account classification. Everything except `General` is a partner.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Display,
    EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum UserType {
    General,
    Seller,
    Hospital,
    Grooming,
    Sitter,
    Cafe,
}

impl UserType {
    /// Partners offer bookable services.
    pub fn is_partner(&self) -> bool {
        !matches!(self, UserType::General)
    }

    /// Only hospitals and sitters carry a partner profile (tax id,
    /// specialty/work, schedule) and appear in the partner directory.
    pub fn has_partner_profile(&self) -> bool {
        matches!(self, UserType::Hospital | UserType::Sitter)
    }
}

/// Account status; only `Active` accounts may log in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum UserStatus {
    Active,
    Locked,
    Deleted,
}

/// Gender, stored upper-case and parsed case-insensitively.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Gender {
    Male,
    Female,
}

/// Animals a partner serves.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum CaCategorical {
    Dog,
    Cat,
    Both,
}

/// Veterinary specialty offered by a hospital.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum VetSpecialty {
    InternalMedicine,
    Surgery,
    Orthopedics,
    Ophthalmology,
    Dentistry,
    Dermatology,
    EmergencyMedicine,
    General,
}

/// Work a pet sitter takes on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum PetsitterWork {
    Walk,
    Transport,
    Hygiene,
    All,
}

/// Partner-only fields.
///
/// Invariant: non-empty only for `Hospital` and `Sitter` accounts, and a
/// hospital never carries a petsitter work (nor a sitter a vet specialty).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerProfile {
    pub tin: Option<String>,
    pub ca_categorical: Option<CaCategorical>,
    pub vet_specialty: Option<VetSpecialty>,
    pub petsitter_work: Option<PetsitterWork>,
    pub working_days: Vec<String>,
    pub working_start_hours: Option<String>,
    pub working_end_hours: Option<String>,
}

impl PartnerProfile {
    /// Keep only the fields the given account type may persist.
    pub fn for_user_type(user_type: UserType, supplied: PartnerProfile) -> Self {
        match user_type {
            UserType::Hospital => Self {
                petsitter_work: None,
                ..supplied
            },
            UserType::Sitter => Self {
                vet_specialty: None,
                ..supplied
            },
            UserType::General
            | UserType::Seller
            | UserType::Grooming
            | UserType::Cafe => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub nickname: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub gender: Gender,
    pub birthdate: NaiveDate,
    pub address: String,
    pub user_type: UserType,
    pub status: UserStatus,
    pub partner: PartnerProfile,
    pub locked_until: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub profile_url: Option<String>,
    #[serde(skip_serializing)]
    pub fcm_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Check if the account may log in
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// Device token usable for push delivery, if any
    pub fn push_token(&self) -> Option<&str> {
        self.fcm_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Signup input handed to the user service (plain-text password).
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub nickname: String,
    pub email: String,
    pub password: String,
    pub gender: Gender,
    pub birthdate: NaiveDate,
    pub address: String,
    pub user_type: UserType,
    pub partner: PartnerProfile,
}

/// Fully prepared user row handed to the repository.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub nickname: String,
    pub email: String,
    pub password_hash: String,
    pub gender: Gender,
    pub birthdate: NaiveDate,
    pub address: String,
    pub user_type: UserType,
    pub status: UserStatus,
    pub partner: PartnerProfile,
}

/// Login response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "kim")]
    pub username: String,
    #[schema(example = "doglover")]
    pub nickname: String,
    #[schema(example = "user@example.com")]
    pub email: String,
    #[schema(example = "FEMALE")]
    pub gender: String,
    #[schema(example = "GENERAL")]
    pub user_type: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            nickname: user.nickname,
            email: user.email,
            gender: user.gender.to_string(),
            user_type: user.user_type.to_string(),
        }
    }
}
