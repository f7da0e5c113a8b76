//! Turning a verified QR token into an attendance record.
//!
//! The token is checked first and the booking second. A valid token only
//! says which booking it was issued for; whether that booking can still be
//! checked in is decided by the booking's own status.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::DateTime;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::{
    clock::Clock,
    models::{Booking, BookingStatus, BookingStore, ModelError},
    qr::{IssuedToken, MintError, TokenService, VerifyError},
};

#[derive(Debug, thiserror::Error)]
pub enum CheckInError {
    #[error(transparent)]
    Token(#[from] VerifyError),
    #[error("Booking not found")]
    BookingNotFound,
    #[error("Booking has been canceled")]
    Canceled,
    #[error("Booking is already {0}")]
    AlreadyCheckedIn(BookingStatus),
    #[error("Booking is not confirmed yet")]
    NotConfirmed,
    #[error("Booking changed while checking in, please scan again")]
    Conflict,
    #[error(transparent)]
    Mint(#[from] MintError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl CheckInError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Token(err) => err.code(),
            Self::BookingNotFound => "BOOKING_NOT_FOUND",
            Self::Canceled => "BOOKING_CANCELED",
            Self::AlreadyCheckedIn(_) => "ALREADY_CHECKED_IN",
            Self::NotConfirmed => "NOT_CONFIRMED",
            Self::Conflict => "CONFLICT",
            Self::Mint(MintError::Serialize(_)) | Self::Model(_) => "INTERNAL",
            Self::Mint(_) => "INVALID_REQUEST",
        }
    }

    pub fn response(&self) -> Response {
        let status = match self {
            Self::Token(err) => return err.response(),
            Self::Model(err) => return err.response(),
            Self::Mint(err) => return err.response(),
            Self::BookingNotFound => StatusCode::NOT_FOUND,
            Self::Canceled | Self::AlreadyCheckedIn(_) | Self::NotConfirmed | Self::Conflict => {
                StatusCode::CONFLICT
            }
        };

        let body = Json(json!({
            "ok": false,
            "error": self.code(),
            "message": self.to_string()
        }));

        (status, body).into_response()
    }
}

impl IntoResponse for CheckInError {
    fn into_response(self) -> Response {
        self.response()
    }
}

/// Only confirmed bookings can be checked in.
pub fn ensure_checkable(booking: &Booking) -> Result<(), CheckInError> {
    match booking.status() {
        BookingStatus::Confirmed => Ok(()),
        BookingStatus::Pending => Err(CheckInError::NotConfirmed),
        BookingStatus::Canceled => Err(CheckInError::Canceled),
        status @ (BookingStatus::CheckedIn | BookingStatus::Completed) => {
            Err(CheckInError::AlreadyCheckedIn(status))
        }
    }
}

async fn load<C, S>(
    tokens: &TokenService<C>,
    store: &S,
    token: &str,
) -> Result<Booking, CheckInError>
where
    C: Clock,
    S: BookingStore,
{
    let payload = tokens.verify(token).inspect_err(|err| {
        debug!(reason = err.code(), "rejected QR token");
    })?;

    store
        .get(&payload.booking_id)
        .await?
        .ok_or(CheckInError::BookingNotFound)
}

/// Verify a token and return its booking without changing anything.
///
/// Missing and canceled bookings are refused; any other state is returned
/// as-is so the provider can see it.
pub async fn inspect<C, S>(
    tokens: &TokenService<C>,
    store: &S,
    token: &str,
) -> Result<Booking, CheckInError>
where
    C: Clock,
    S: BookingStore,
{
    let booking = load(tokens, store, token).await?;

    if booking.status() == BookingStatus::Canceled {
        return Err(CheckInError::Canceled);
    }

    Ok(booking)
}

/// Issue a fresh code for a confirmed booking and remember it on the booking.
///
/// `ttl_seconds` falls back to the service's default lifetime.
pub async fn refresh<C, S>(
    tokens: &TokenService<C>,
    store: &S,
    booking_id: &str,
    ttl_seconds: Option<u64>,
) -> Result<IssuedToken, CheckInError>
where
    C: Clock,
    S: BookingStore,
{
    if booking_id.trim().is_empty() {
        return Err(MintError::EmptyBookingId.into());
    }

    let booking = store
        .get(booking_id)
        .await?
        .ok_or(CheckInError::BookingNotFound)?;
    ensure_checkable(&booking)?;

    let booking_id = booking.id().to_string();
    let ttl = ttl_seconds.unwrap_or(tokens.default_ttl());
    let issued = tokens.issue(&booking_id, ttl)?;

    let expires_at = DateTime::from_timestamp(issued.payload.expires_at, 0)
        .ok_or(MintError::InvalidTtl(ttl))?
        .fixed_offset();

    store
        .record_token(&booking_id, &issued.token, expires_at)
        .await?;

    info!(booking_id = %booking_id, ttl, "issued QR token");
    Ok(issued)
}

/// Verify a token and mark its booking as checked in.
pub async fn check_in<C, S>(
    tokens: &TokenService<C>,
    store: &S,
    token: &str,
) -> Result<Booking, CheckInError>
where
    C: Clock,
    S: BookingStore,
{
    let booking = load(tokens, store, token).await?;
    ensure_checkable(&booking)?;

    let booking_id = booking.id().to_string();

    if let Some(updated) = store.transition_to_checked_in(&booking_id).await? {
        info!(booking_id = %booking_id, "booking checked in");
        return Ok(updated);
    }

    // Lost a race with another scan or a cancellation.
    let current = store
        .get(&booking_id)
        .await?
        .ok_or(CheckInError::BookingNotFound)?;
    ensure_checkable(&current)?;

    warn!(booking_id = %booking_id, "check-in guard missed on a confirmed booking");
    Err(CheckInError::Conflict)
}
