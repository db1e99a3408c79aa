//! Comma-separated encoding for multi-valued columns.
//!
//! The storage layer keeps lists (vet specialties, petsitter works, working
//! days, image URLs) in a single text column. Entities hold typed lists;
//! only the repositories call into this module.

use std::fmt::Display;
use std::str::FromStr;

/// Encode a list as `a,b,c`.
///
/// Each element is rendered, trimmed and dropped when empty. An empty list,
/// or one whose elements are all blank, encodes as `None` (never `""`).
pub fn encode<T: Display>(values: &[T]) -> Option<String> {
    let parts: Vec<String> = values
        .iter()
        .map(|v| v.to_string().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(","))
    }
}

/// Decode a stored column into trimmed, non-empty strings in stored order.
pub fn decode(csv: Option<&str>) -> Vec<String> {
    match csv {
        Some(raw) if !raw.trim().is_empty() => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Decode a stored column into a typed list.
///
/// Elements that no longer parse (e.g. a retired enum value) are skipped
/// with a warning rather than failing the whole row.
pub fn decode_as<T: FromStr>(csv: Option<&str>) -> Vec<T> {
    decode(csv)
        .into_iter()
        .filter_map(|s| match s.parse::<T>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(value = %s, "Skipping unrecognized CSV element");
                None
            }
        })
        .collect()
}
