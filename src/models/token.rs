use serde::{Deserialize, Serialize};

/// Guardian screens start nagging for a fresh code below this many seconds.
pub const EXPIRING_SOON_SECS: i64 = 60;

/// The signed half of a QR token.
///
/// Field order is the serialisation order, which keeps the encoded
/// payload stable for a given set of values.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct TokenPayload {
    pub booking_id: String,
    /// Expiry instant in seconds since the Unix epoch.
    #[serde(rename = "exp")]
    pub expires_at: i64,
    pub nonce: String,
}

impl TokenPayload {
    /// Seconds left before expiry, zero once expired.
    pub fn expires_in(&self, now: i64) -> u64 {
        u64::try_from(self.expires_at.saturating_sub(now)).unwrap_or(0)
    }

    pub fn is_expiring_soon(&self, now: i64) -> bool {
        self.expires_at.saturating_sub(now) < EXPIRING_SOON_SECS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(expires_at: i64) -> TokenPayload {
        TokenPayload {
            booking_id: "booking-1".into(),
            expires_at,
            nonce: "n".into(),
        }
    }

    #[test]
    fn expires_in_saturates() {
        assert_eq!(payload(1_600).expires_in(1_000), 600);
        assert_eq!(payload(1_600).expires_in(1_600), 0);
        assert_eq!(payload(1_600).expires_in(9_999), 0);
    }

    #[test]
    fn expiring_soon_threshold() {
        assert!(!payload(1_060).is_expiring_soon(1_000));
        assert!(payload(1_059).is_expiring_soon(1_000));
    }

    #[test]
    fn wire_field_is_exp() {
        let json = serde_json::to_string(&payload(1_600)).unwrap();
        assert_eq!(json, r#"{"booking_id":"booking-1","exp":1600,"nonce":"n"}"#);
    }
}
