use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use atlas::AtlasError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Atlas(#[from] AtlasError),
}

impl From<atlas::sqlx::Error> for ApiError {
    fn from(value: atlas::sqlx::Error) -> Self {
        Self::Atlas(value.into())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Atlas(AtlasError::TableNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Atlas(AtlasError::NoGeometryColumn(_)) => StatusCode::BAD_REQUEST,
            ApiError::Atlas(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            tracing::error!("request failed: {self}");
        }
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
