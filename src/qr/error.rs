use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

/// Why a presented token was refused. These are the only failure modes of
/// verification and they never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerifyError {
    #[error("Malformed token")]
    Malformed,
    #[error("Token signature does not match")]
    BadSignature,
    #[error("Token has expired")]
    Expired,
}

impl VerifyError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Malformed => "MALFORMED",
            Self::BadSignature => "BAD_SIGNATURE",
            Self::Expired => "EXPIRED",
        }
    }

    pub fn response(&self) -> Response {
        let (status, message) = match self {
            Self::Malformed => (
                StatusCode::BAD_REQUEST,
                "Token could not be read, check the entered code",
            ),
            Self::BadSignature => (StatusCode::UNAUTHORIZED, "Invalid token, please scan again"),
            Self::Expired => (
                StatusCode::GONE,
                "Token expired, ask the guardian to refresh the code",
            ),
        };

        let body = Json(json!({
            "ok": false,
            "error": self.code(),
            "message": message
        }));

        (status, body).into_response()
    }
}

impl IntoResponse for VerifyError {
    fn into_response(self) -> Response {
        self.response()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MintError {
    #[error("Booking id must not be empty")]
    EmptyBookingId,
    #[error("Token lifetime must be a positive number of seconds, got {0}")]
    InvalidTtl(u64),
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

impl MintError {
    pub fn response(&self) -> Response {
        let (status, code, message) = match self {
            Self::EmptyBookingId | Self::InvalidTtl(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", self.to_string())
            }
            Self::Serialize(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "ok": false,
            "error": code,
            "message": message
        }));

        (status, body).into_response()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("QR signing secret must be at least {min} bytes, got {len}")]
pub struct WeakSecret {
    pub min: usize,
    pub len: usize,
}
