//! Custom request extractors.

mod image_upload;
mod validated_json;

pub use image_upload::{ImageUpload, FILE_FIELD};
pub use validated_json::{ValidatedJson, ValidatedQuery};
