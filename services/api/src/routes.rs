use crate::infra::{ApiWardrobeService, AppState};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use outfit_ai::error::AppError;
use outfit_ai::workflows::wardrobe::{wardrobe_router, UserId, WardrobeImporter};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct WardrobeImportRequest {
    pub(crate) csv: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct WardrobeImportResponse {
    pub(crate) user_id: UserId,
    pub(crate) imported: usize,
}

pub(crate) fn with_wardrobe_routes(service: Arc<ApiWardrobeService>) -> axum::Router {
    wardrobe_router(service.clone())
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/users/:user_id/wardrobe",
            axum::routing::post(wardrobe_import_endpoint),
        )
        .layer(Extension(service))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Replaces a user's wardrobe with the garments in an uploaded CSV export.
pub(crate) async fn wardrobe_import_endpoint(
    Extension(service): Extension<Arc<ApiWardrobeService>>,
    Path(user_id): Path<String>,
    Json(payload): Json<WardrobeImportRequest>,
) -> Result<Json<WardrobeImportResponse>, AppError> {
    let user = UserId(user_id);
    let garments = WardrobeImporter::from_reader(Cursor::new(payload.csv.into_bytes()))?;
    let imported = service.import(&user, garments)?;

    Ok(Json(WardrobeImportResponse {
        user_id: user,
        imported,
    }))
}
