use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::repository::{UserId, WardrobeRepository};
use super::service::{GenerateOptions, WardrobeService, WardrobeServiceError};
use crate::workflows::outfits::domain::GarmentId;
use crate::workflows::outfits::judge::CompletionClient;
use crate::workflows::outfits::pipeline::GenerationError;

/// Router exposing wardrobe listing, outfit generation, and wear tracking.
pub fn wardrobe_router<R, C>(service: Arc<WardrobeService<R, C>>) -> Router
where
    R: WardrobeRepository + 'static,
    C: CompletionClient + 'static,
{
    Router::new()
        .route(
            "/api/v1/users/:user_id/garments",
            get(garments_handler::<R, C>),
        )
        .route(
            "/api/v1/users/:user_id/outfits",
            post(generate_handler::<R, C>),
        )
        .route(
            "/api/v1/users/:user_id/outfits/worn",
            post(worn_handler::<R, C>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct WornRequest {
    pub(crate) garment_ids: Vec<GarmentId>,
    #[serde(default)]
    pub(crate) worn_at: Option<DateTime<Utc>>,
}

pub(crate) async fn garments_handler<R, C>(
    State(service): State<Arc<WardrobeService<R, C>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: WardrobeRepository + 'static,
    C: CompletionClient + 'static,
{
    let user = UserId(user_id);
    match service.garments(&user) {
        Ok(garments) => {
            let payload = json!({
                "user_id": user,
                "count": garments.len(),
                "garments": garments,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn generate_handler<R, C>(
    State(service): State<Arc<WardrobeService<R, C>>>,
    Path(user_id): Path<String>,
    axum::Json(options): axum::Json<GenerateOptions>,
) -> Response
where
    R: WardrobeRepository + 'static,
    C: CompletionClient + 'static,
{
    let user = UserId(user_id);
    match service.generate(&user, options).await {
        Ok(outfits) => {
            let payload = json!({
                "user_id": user,
                "outfits": outfits,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn worn_handler<R, C>(
    State(service): State<Arc<WardrobeService<R, C>>>,
    Path(user_id): Path<String>,
    axum::Json(request): axum::Json<WornRequest>,
) -> Response
where
    R: WardrobeRepository + 'static,
    C: CompletionClient + 'static,
{
    let user = UserId(user_id);
    let worn_at = request.worn_at.unwrap_or_else(Utc::now);
    match service.mark_outfit_worn(&user, &request.garment_ids, worn_at) {
        Ok(garments) => {
            let payload = json!({
                "user_id": user,
                "updated": garments.len(),
                "garments": garments,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

fn error_response(error: WardrobeServiceError) -> Response {
    let (status, kind) = match &error {
        WardrobeServiceError::Generation(GenerationError::InsufficientInput { .. }) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "insufficient_input")
        }
        WardrobeServiceError::Generation(GenerationError::NoViableCombinations { .. }) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "no_viable_combinations")
        }
        WardrobeServiceError::EmptyOutfit => (StatusCode::UNPROCESSABLE_ENTITY, "empty_outfit"),
        WardrobeServiceError::UnknownGarment(_) => (StatusCode::NOT_FOUND, "unknown_garment"),
        WardrobeServiceError::Repository(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "repository_unavailable")
        }
    };

    let payload = json!({
        "error": error.to_string(),
        "kind": kind,
    });
    (status, axum::Json(payload)).into_response()
}
