use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::outfits::judge::JudgeError;
use crate::workflows::outfits::pipeline::GenerationError;
use crate::workflows::wardrobe::{WardrobeImportError, WardrobeServiceError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Import(WardrobeImportError),
    Generation(GenerationError),
    Judge(JudgeError),
    Wardrobe(WardrobeServiceError),
    Serialization(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {err}"),
            AppError::Telemetry(err) => write!(f, "telemetry error: {err}"),
            AppError::Io(err) => write!(f, "io error: {err}"),
            AppError::Server(err) => write!(f, "server error: {err}"),
            AppError::Import(err) => write!(f, "wardrobe import error: {err}"),
            AppError::Generation(err) => write!(f, "{err}"),
            AppError::Judge(err) => write!(f, "judge client error: {err}"),
            AppError::Wardrobe(err) => write!(f, "{err}"),
            AppError::Serialization(err) => write!(f, "could not encode response: {err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Generation(err) => Some(err),
            AppError::Judge(err) => Some(err),
            AppError::Wardrobe(err) => Some(err),
            AppError::Serialization(err) => Some(err),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Generation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Import(_) => StatusCode::BAD_REQUEST,
            AppError::Wardrobe(WardrobeServiceError::Generation(_))
            | AppError::Wardrobe(WardrobeServiceError::EmptyOutfit) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Wardrobe(WardrobeServiceError::UnknownGarment(_)) => StatusCode::NOT_FOUND,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Judge(_)
            | AppError::Wardrobe(WardrobeServiceError::Repository(_))
            | AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<WardrobeImportError> for AppError {
    fn from(value: WardrobeImportError) -> Self {
        Self::Import(value)
    }
}

impl From<GenerationError> for AppError {
    fn from(value: GenerationError) -> Self {
        Self::Generation(value)
    }
}

impl From<JudgeError> for AppError {
    fn from(value: JudgeError) -> Self {
        Self::Judge(value)
    }
}

impl From<WardrobeServiceError> for AppError {
    fn from(value: WardrobeServiceError) -> Self {
        Self::Wardrobe(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::outfits::GarmentId;
    use crate::workflows::wardrobe::RepositoryError;

    #[test]
    fn generation_failures_are_unprocessable() {
        let err = AppError::from(GenerationError::InsufficientInput {
            reason: "wardrobe has no shoes".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            err.to_string(),
            "cannot generate outfits: wardrobe has no shoes"
        );
    }

    #[test]
    fn import_failures_are_bad_requests() {
        let err = AppError::from(WardrobeImportError::DuplicateId {
            line: 4,
            id: "t1".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn wardrobe_failures_keep_their_own_status() {
        let missing = AppError::from(WardrobeServiceError::UnknownGarment(GarmentId::new("x")));
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        let down = AppError::from(WardrobeServiceError::Repository(
            RepositoryError::Unavailable("offline".to_string()),
        ));
        assert_eq!(down.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn io_failures_are_internal() {
        let err = AppError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
