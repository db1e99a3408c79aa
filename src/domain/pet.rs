//! Pet domain entity.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use super::Gender;
use crate::config::{PET_WEIGHT_FRACTION_DIGITS, PET_WEIGHT_INTEGER_DIGITS};
use crate::errors::{AppError, AppResult};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Species {
    Dog,
    Cat,
}

/// Personality code, one of the sixteen MBTI-style four-letter types.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString,
    AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum AbitTypeCode {
    Istj,
    Isfj,
    Infj,
    Intj,
    Istp,
    Isfp,
    Infp,
    Intp,
    Estp,
    Esfp,
    Enfp,
    Entp,
    Estj,
    Esfj,
    Enfj,
    Entj,
}

/// Pet domain entity. Owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 1)]
    pub owner_id: i64,
    pub species: Species,
    #[schema(example = "maltese")]
    pub species_detail: Option<String>,
    pub gender: Gender,
    #[schema(value_type = String, example = "2021-04-01")]
    pub birthdate: NaiveDate,
    #[schema(value_type = f64, example = 4.2)]
    pub weight: Decimal,
    pub abit_type_code: AbitTypeCode,
    pub image_url: Option<String>,
    #[schema(example = "Bori")]
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw pet creation input, before normalization.
#[derive(Debug, Clone)]
pub struct NewPet {
    pub owner_id: i64,
    pub species: String,
    pub species_detail: Option<String>,
    pub gender: String,
    pub birthdate: NaiveDate,
    pub weight: Decimal,
    pub abit_type_code: String,
    pub image_url: Option<String>,
    pub name: String,
}

/// Normalized pet row handed to the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePet {
    pub owner_id: i64,
    pub species: Species,
    pub species_detail: Option<String>,
    pub gender: Gender,
    pub birthdate: NaiveDate,
    pub weight: Decimal,
    pub abit_type_code: AbitTypeCode,
    pub image_url: Option<String>,
    pub name: String,
}

impl CreatePet {
    /// Normalize raw input: enum codes are matched case-insensitively, the
    /// name and breed are trimmed, and a blank image URL becomes `None`.
    pub fn normalize(input: NewPet) -> AppResult<Self> {
        let species = input
            .species
            .trim()
            .parse::<Species>()
            .map_err(|_| AppError::validation("species must be DOG or CAT"))?;
        let gender = input
            .gender
            .trim()
            .parse::<Gender>()
            .map_err(|_| AppError::validation("gender must be MALE or FEMALE"))?;
        let abit_type_code = input
            .abit_type_code
            .trim()
            .parse::<AbitTypeCode>()
            .map_err(|_| AppError::validation("abit_type_code must be a valid MBTI code"))?;

        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("name is required"));
        }

        check_weight(input.weight)?;

        Ok(Self {
            owner_id: input.owner_id,
            species,
            species_detail: trimmed(input.species_detail),
            gender,
            birthdate: input.birthdate,
            weight: input.weight,
            abit_type_code,
            image_url: trimmed(input.image_url),
            name,
        })
    }
}

/// Weight must be positive with at most three integer digits and one
/// fractional digit.
pub fn check_weight(weight: Decimal) -> AppResult<()> {
    if weight <= Decimal::ZERO {
        return Err(AppError::validation("weight must be greater than 0"));
    }

    let integer_limit = Decimal::from(10_i64.pow(PET_WEIGHT_INTEGER_DIGITS));
    if weight.trunc() >= integer_limit || weight.scale() > PET_WEIGHT_FRACTION_DIGITS {
        return Err(AppError::validation(format!(
            "weight allows at most {} integer digits and {} fraction digit",
            PET_WEIGHT_INTEGER_DIGITS, PET_WEIGHT_FRACTION_DIGITS
        )));
    }

    Ok(())
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn new_pet() -> NewPet {
        NewPet {
            owner_id: 1,
            species: "dog".to_string(),
            species_detail: Some("  maltese ".to_string()),
            gender: "female".to_string(),
            birthdate: NaiveDate::from_ymd_opt(2021, 4, 1).unwrap(),
            weight: Decimal::from_str("4.2").unwrap(),
            abit_type_code: "enfp".to_string(),
            image_url: None,
            name: "  Bori ".to_string(),
        }
    }

    #[test]
    fn test_normalize_upper_cases_codes_and_trims() {
        let pet = CreatePet::normalize(new_pet()).unwrap();
        assert_eq!(pet.species, Species::Dog);
        assert_eq!(pet.gender, Gender::Female);
        assert_eq!(pet.abit_type_code, AbitTypeCode::Enfp);
        assert_eq!(pet.name, "Bori");
        assert_eq!(pet.species_detail.as_deref(), Some("maltese"));
    }

    #[test]
    fn test_missing_image_stays_none() {
        let pet = CreatePet::normalize(new_pet()).unwrap();
        assert_eq!(pet.image_url, None);

        let mut input = new_pet();
        input.image_url = Some("   ".to_string());
        assert_eq!(CreatePet::normalize(input).unwrap().image_url, None);
    }

    #[test]
    fn test_unknown_species_rejected() {
        let mut input = new_pet();
        input.species = "HAMSTER".to_string();
        assert!(matches!(CreatePet::normalize(input), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_weight_bounds() {
        assert!(check_weight(Decimal::from_str("123.4").unwrap()).is_ok());
        assert!(check_weight(Decimal::from_str("0.1").unwrap()).is_ok());
        assert!(check_weight(Decimal::from_str("999.9").unwrap()).is_ok());
        assert!(check_weight(Decimal::from_str("1234.5").unwrap()).is_err());
        assert!(check_weight(Decimal::from_str("0.0").unwrap()).is_err());
        assert!(check_weight(Decimal::from_str("-1").unwrap()).is_err());
        assert!(check_weight(Decimal::from_str("12.34").unwrap()).is_err());
    }

    #[test]
    fn test_fraction_digits_count_as_written() {
        assert!(check_weight(Decimal::from_str("12.50").unwrap()).is_err());
        assert!(check_weight(Decimal::from_str("12.5").unwrap()).is_ok());
        assert!(check_weight(Decimal::from_str("12").unwrap()).is_ok());
    }

    #[test]
    fn test_abit_code_display() {
        assert_eq!(AbitTypeCode::Istj.to_string(), "ISTJ");
        assert_eq!(AbitTypeCode::from_str("intp").unwrap(), AbitTypeCode::Intp);
    }
}
