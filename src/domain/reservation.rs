//! Reservation domain entity and its lifecycle.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use super::{PetsitterWork, UserType, VetSpecialty};
use crate::config::{RESERVATION_DATE_FORMAT, SLOT_LABEL_AFTERNOON, SLOT_LABEL_MORNING};
use crate::errors::{AppError, AppResult};

/// Kind of service booked. Shares its names with the partner `UserType`s.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ServiceCategorical {
    Hospital,
    Grooming,
    Cafe,
    Sitter,
}

impl TryFrom<UserType> for ServiceCategorical {
    type Error = AppError;

    fn try_from(user_type: UserType) -> AppResult<Self> {
        match user_type {
            UserType::Hospital => Ok(Self::Hospital),
            UserType::Grooming => Ok(Self::Grooming),
            UserType::Cafe => Ok(Self::Cafe),
            UserType::Sitter => Ok(Self::Sitter),
            UserType::General | UserType::Seller => Err(AppError::validation(format!(
                "user_type {} cannot be reserved",
                user_type
            ))),
        }
    }
}

impl ServiceCategorical {
    /// Case-insensitive match against a filter such as `"hospital"`.
    pub fn matches(&self, filter: &str) -> bool {
        self.as_ref().eq_ignore_ascii_case(filter.trim())
    }
}

/// Reservation status.
///
/// ```text
/// WAITING ──► CONFIRMED ──► CHECKED_IN ──► COMPLETED
///    │            │
///    └────────────┴──► CANCELLED_BY_USER | CANCELLED_BY_BIZ
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ReservationStatus {
    Waiting,
    Confirmed,
    CheckedIn,
    Completed,
    CancelledByUser,
    CancelledByBiz,
}

impl ReservationStatus {
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;

        matches!(
            (self, next),
            (Waiting, Confirmed)
                | (Waiting, CancelledByUser)
                | (Waiting, CancelledByBiz)
                | (Confirmed, CheckedIn)
                | (Confirmed, CancelledByUser)
                | (Confirmed, CancelledByBiz)
                | (CheckedIn, Completed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::CancelledByUser | Self::CancelledByBiz
        )
    }

    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::CancelledByUser | Self::CancelledByBiz)
    }
}

/// Who performs a lifecycle action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// The user who made the reservation
    Owner(i64),
    /// The partner the reservation was made with
    Partner(i64),
}

/// Lifecycle actions and the status each one moves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ReservationAction {
    Accept,
    Reject,
    Cancel,
    CheckIn,
    Complete,
}

impl ReservationAction {
    pub fn target(&self) -> ReservationStatus {
        match self {
            Self::Accept => ReservationStatus::Confirmed,
            Self::Reject => ReservationStatus::CancelledByBiz,
            Self::Cancel => ReservationStatus::CancelledByUser,
            Self::CheckIn => ReservationStatus::CheckedIn,
            Self::Complete => ReservationStatus::Completed,
        }
    }

    /// Only the owner cancels; every other action belongs to the partner.
    pub fn allowed_for(&self, actor: Actor, reservation: &Reservation) -> bool {
        match (self, actor) {
            (Self::Cancel, Actor::Owner(id)) => id == reservation.user_id,
            (Self::Cancel, Actor::Partner(_)) => false,
            (_, Actor::Partner(id)) => id == reservation.partner_id,
            (_, Actor::Owner(_)) => false,
        }
    }
}

/// Reservation domain entity.
///
/// Only one of `vet_specialties` / `petsitter_works` is meaningful, chosen
/// by `service_categorical`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub user_id: i64,
    pub partner_id: i64,
    pub pet_id: i64,
    pub service_categorical: ServiceCategorical,
    pub status: ReservationStatus,
    /// Client-supplied local wall-clock time, stored verbatim
    pub created_at: NaiveDateTime,
    pub canceled_at: Option<NaiveDateTime>,
    pub image_urls: Vec<String>,
    pub content: String,
    pub vet_specialties: Vec<VetSpecialty>,
    pub petsitter_works: Vec<PetsitterWork>,
}

impl Reservation {
    /// Check a lifecycle action against actor and current status.
    pub fn check_action(&self, action: ReservationAction, actor: Actor) -> AppResult<ReservationStatus> {
        if !action.allowed_for(actor, self) {
            return Err(AppError::Forbidden);
        }

        let next = action.target();
        if !self.status.can_transition_to(next) {
            return Err(AppError::InvalidTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }

        Ok(next)
    }

    /// Specialty (hospital) or work (everything else) names, in stored order.
    pub fn specialty_names(&self) -> Vec<String> {
        match self.service_categorical {
            ServiceCategorical::Hospital => {
                self.vet_specialties.iter().map(ToString::to_string).collect()
            }
            _ => self.petsitter_works.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Reservation creation input.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateReservation {
    pub user_id: i64,
    pub partner_id: i64,
    pub pet_id: i64,
    pub service_categorical: ServiceCategorical,
    pub status: ReservationStatus,
    pub created_at: NaiveDateTime,
    pub image_urls: Vec<String>,
    pub content: String,
    pub vet_specialties: Vec<VetSpecialty>,
    pub petsitter_works: Vec<PetsitterWork>,
}

/// Raw reservation request handed to the service.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub user_id: i64,
    pub partner_id: i64,
    pub pet_id: i64,
    /// Declared type of the booked service; shares names with `UserType`
    pub user_type: UserType,
    pub vet_specialties: Vec<VetSpecialty>,
    pub petsitter_works: Vec<PetsitterWork>,
    pub created_at: NaiveDateTime,
    pub image_urls: Vec<String>,
    pub content: String,
}

impl CreateReservation {
    /// Derive the service category and keep only the list it selects.
    ///
    /// Hospital bookings need at least one vet specialty and sitter bookings
    /// at least one petsitter work. New reservations start `WAITING`.
    pub fn from_request(input: NewReservation) -> AppResult<Self> {
        let service_categorical = ServiceCategorical::try_from(input.user_type)?;

        let (vet_specialties, petsitter_works) = match service_categorical {
            ServiceCategorical::Hospital => {
                if input.vet_specialties.is_empty() {
                    return Err(AppError::validation(
                        "vet_specialties is required for HOSPITAL reservations",
                    ));
                }
                (input.vet_specialties, Vec::new())
            }
            ServiceCategorical::Sitter => {
                if input.petsitter_works.is_empty() {
                    return Err(AppError::validation(
                        "petsitter_works is required for SITTER reservations",
                    ));
                }
                (Vec::new(), input.petsitter_works)
            }
            ServiceCategorical::Grooming | ServiceCategorical::Cafe => {
                (Vec::new(), input.petsitter_works)
            }
        };

        Ok(Self {
            user_id: input.user_id,
            partner_id: input.partner_id,
            pet_id: input.pet_id,
            service_categorical,
            status: ReservationStatus::Waiting,
            created_at: input.created_at,
            image_urls: input.image_urls,
            content: input.content,
            vet_specialties,
            petsitter_works,
        })
    }
}

/// Morning/afternoon label derived from the stored local hour.
pub fn slot_label(created_at: &NaiveDateTime) -> &'static str {
    if created_at.hour() < 12 {
        SLOT_LABEL_MORNING
    } else {
        SLOT_LABEL_AFTERNOON
    }
}

/// One row of the "my reservations" listing.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationSummary {
    #[schema(example = 10)]
    pub reservation_id: i64,
    #[schema(example = "HOSPITAL")]
    pub service_type: String,
    #[schema(example = "오전 진료")]
    pub slot_label: String,
    #[schema(example = "2025.03.14")]
    pub date: String,
    #[schema(example = 9)]
    pub hour: u32,
    #[schema(example = "Happy Vet")]
    pub partner_name: String,
    pub specialties: Vec<String>,
    #[schema(example = "WAITING")]
    pub status: String,
}

impl ReservationSummary {
    pub fn new(reservation: &Reservation, partner_name: String) -> Self {
        Self {
            reservation_id: reservation.id,
            service_type: reservation.service_categorical.to_string(),
            slot_label: slot_label(&reservation.created_at).to_string(),
            date: reservation
                .created_at
                .format(RESERVATION_DATE_FORMAT)
                .to_string(),
            hour: reservation.created_at.hour(),
            partner_name,
            specialties: reservation.specialty_names(),
            status: reservation.status.to_string(),
        }
    }
}
