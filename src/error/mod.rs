use std::fmt::{self, Display};

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    checkin::CheckInError,
    models::ModelError,
    qr::{MintError, VerifyError, WeakSecret},
};

#[derive(Debug)]
pub struct Report(pub color_eyre::Report);

impl<E> From<E> for Report
where
    E: Into<color_eyre::Report>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl IntoResponse for Report {
    fn into_response(self) -> Response {
        if let Some(err) = self.0.downcast_ref::<Error>() {
            return err.response();
        }
        if let Some(err) = self.0.downcast_ref::<CheckInError>() {
            return err.response();
        }
        if let Some(err) = self.0.downcast_ref::<VerifyError>() {
            return err.response();
        }
        if let Some(err) = self.0.downcast_ref::<MintError>() {
            return err.response();
        }
        if let Some(err) = self.0.downcast_ref::<ModelError>() {
            return err.response();
        }

        tracing::error!(error = ?self.0, "unhandled error");
        internal_error()
    }
}

pub type Result<T, E = Report> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    WeakSecret(#[from] WeakSecret),
    #[error(transparent)]
    InvalidRequest(#[from] JsonRejection),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Mint(#[from] MintError),
    #[error(transparent)]
    Verify(#[from] VerifyError),
    #[error(transparent)]
    CheckIn(#[from] CheckInError),
}

impl Error {
    pub fn response(&self) -> Response {
        match self {
            Self::Model(err) => err.response(),
            Self::Mint(err) => err.response(),
            Self::Verify(err) => err.response(),
            Self::CheckIn(err) => err.response(),
            Self::InvalidRequest(rejection) => {
                let body = Json(json!({
                    "ok": false,
                    "error": "INVALID_REQUEST",
                    "message": rejection.body_text()
                }));

                (StatusCode::BAD_REQUEST, body).into_response()
            }
            other => {
                tracing::error!(error = %other, "internal error");
                internal_error()
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        self.response()
    }
}

fn internal_error() -> Response {
    let body = Json(json!({
        "ok": false,
        "error": "INTERNAL",
        "message": "Internal Server Error"
    }));

    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}
