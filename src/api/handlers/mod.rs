//! HTTP request handlers.

use serde::Serialize;
use utoipa::ToSchema;

pub mod pet_handler;
pub mod reservation_handler;
pub mod user_handler;

pub use pet_handler::pet_routes;
pub use reservation_handler::reservation_routes;
pub use user_handler::user_routes;

/// Identifier of a newly created resource
#[derive(Debug, Serialize, ToSchema)]
pub struct IdResponse {
    #[schema(example = 1)]
    pub id: i64,
}

/// URL of a stored image
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageUrlResponse {
    #[schema(example = "/media/pets/1/0b7c6f0e-3f1a-4c55-9a53-5f2f0c1d8e11.png")]
    pub image_url: String,
}
