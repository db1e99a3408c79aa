//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.
//! Enum columns are stored as their SCREAMING_SNAKE_CASE names and list
//! columns are CSV-encoded via `domain::csv`.

pub mod pet;
pub mod reservation;
pub mod user;

use std::str::FromStr;

use crate::errors::{AppError, AppResult};

/// Parse a stored enum column, reporting corrupt rows as internal errors.
pub(crate) fn parse_column<T: FromStr>(column: &'static str, raw: &str) -> AppResult<T> {
    raw.parse::<T>()
        .map_err(|_| AppError::internal(format!("Unrecognized {} value '{}'", column, raw)))
}

/// Parse an optional enum column.
pub(crate) fn parse_optional<T: FromStr>(
    column: &'static str,
    raw: Option<&str>,
) -> AppResult<Option<T>> {
    raw.map(|v| parse_column(column, v)).transpose()
}
