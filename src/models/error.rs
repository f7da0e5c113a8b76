use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model not found")]
    EntityNotFound,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type ModelResult<T, E = ModelError> = Result<T, E>;

impl ModelError {
    pub fn response(&self) -> Response {
        let (status, code, message) = match self {
            Self::EntityNotFound => (StatusCode::NOT_FOUND, "BOOKING_NOT_FOUND", "Booking not found"),
            Self::Sqlx(err) => {
                tracing::error!(error = %err, "booking store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "Internal Server Error",
                )
            }
        };

        let body = Json(json!({
            "ok": false,
            "error": code,
            "message": message
        }));

        (status, body).into_response()
    }
}

impl IntoResponse for ModelError {
    fn into_response(self) -> Response {
        self.response()
    }
}
