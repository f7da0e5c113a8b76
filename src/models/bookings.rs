use std::{fmt, future::Future};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, prelude::FromRow};
use uuid::Uuid;

use crate::models::ModelResult;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Canceled,
    CheckedIn,
    Completed,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Canceled => "canceled",
            Self::CheckedIn => "checked_in",
            Self::Completed => "completed",
        })
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, FromRow)]
pub struct Booking {
    id: Uuid,
    user_id: Uuid,
    experience_id: Uuid,
    child_name: String,
    child_age: i32,
    guardian_name: String,
    start_at: DateTime<FixedOffset>,
    status: BookingStatus,
    #[serde(skip_serializing)]
    qr_token: Option<String>,
    qr_expires_at: Option<DateTime<FixedOffset>>,
    created_at: DateTime<FixedOffset>,
    updated_at: DateTime<FixedOffset>,
}

impl Booking {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> BookingStatus {
        self.status
    }

    pub fn qr_token(&self) -> Option<&str> {
        self.qr_token.as_deref()
    }
}

#[cfg(test)]
impl Booking {
    pub(crate) fn fixture(id: Uuid, status: BookingStatus) -> Self {
        let at = DateTime::parse_from_rfc3339("2026-05-02T10:00:00+09:00").unwrap();
        Self {
            id,
            user_id: Uuid::new_v4(),
            experience_id: Uuid::new_v4(),
            child_name: "Hana".into(),
            child_age: 6,
            guardian_name: "Yuki".into(),
            start_at: at,
            status,
            qr_token: None,
            qr_expires_at: None,
            created_at: at,
            updated_at: at,
        }
    }

    pub(crate) fn with_status(mut self, status: BookingStatus) -> Self {
        self.status = status;
        self
    }

    pub(crate) fn with_token(mut self, token: &str, expires_at: DateTime<FixedOffset>) -> Self {
        self.qr_token = Some(token.to_string());
        self.qr_expires_at = Some(expires_at);
        self
    }
}

/// Where bookings live. Check-in only needs these three operations.
pub trait BookingStore: Send + Sync {
    /// Ids that do not name a booking, including unparsable ones, yield `None`.
    fn get(&self, booking_id: &str) -> impl Future<Output = ModelResult<Option<Booking>>> + Send;

    /// Move a confirmed booking to checked-in. `None` when the booking was
    /// not in the confirmed state at update time.
    fn transition_to_checked_in(
        &self,
        booking_id: &str,
    ) -> impl Future<Output = ModelResult<Option<Booking>>> + Send;

    /// Remember the token most recently issued for a booking.
    fn record_token(
        &self,
        booking_id: &str,
        token: &str,
        expires_at: DateTime<FixedOffset>,
    ) -> impl Future<Output = ModelResult<()>> + Send;
}

#[derive(Debug, Clone)]
pub struct PgBookingStore {
    db: PgPool,
}

impl PgBookingStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &PgPool {
        &self.db
    }
}

impl BookingStore for PgBookingStore {
    async fn get(&self, booking_id: &str) -> ModelResult<Option<Booking>> {
        let Ok(id) = Uuid::parse_str(booking_id) else {
            return Ok(None);
        };

        sqlx::query_as(
            r"
            SELECT * FROM bookings WHERE id = $1
        ",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(Into::into)
    }

    async fn transition_to_checked_in(&self, booking_id: &str) -> ModelResult<Option<Booking>> {
        let Ok(id) = Uuid::parse_str(booking_id) else {
            return Ok(None);
        };

        sqlx::query_as(
            r"
            UPDATE bookings
            SET status = 'checked_in', updated_at = now()
            WHERE id = $1 AND status = 'confirmed'
            RETURNING *
        ",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(Into::into)
    }

    async fn record_token(
        &self,
        booking_id: &str,
        token: &str,
        expires_at: DateTime<FixedOffset>,
    ) -> ModelResult<()> {
        let Ok(id) = Uuid::parse_str(booking_id) else {
            return Err(crate::models::ModelError::EntityNotFound);
        };

        let result = sqlx::query(
            r"
            UPDATE bookings
            SET qr_token = $2, qr_expires_at = $3, updated_at = now()
            WHERE id = $1
        ",
        )
        .bind(id)
        .bind(token)
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(crate::models::ModelError::EntityNotFound);
        }

        Ok(())
    }
}
