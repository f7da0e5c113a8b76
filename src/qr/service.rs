use std::fmt;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::{
    clock::{Clock, SystemClock},
    models::token::TokenPayload,
    qr::{MintError, VerifyError, WeakSecret},
};

type HmacSha256 = Hmac<Sha256>;

/// 32 bytes matches the HMAC-SHA256 output size.
pub const MIN_SECRET_LEN: usize = 32;

pub const DEFAULT_TTL_SECONDS: u64 = 600;

/// A freshly minted token together with what it encodes.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub payload: TokenPayload,
}

/// Mints and verifies booking check-in tokens.
///
/// Tokens look like `<payload>.<signature>` where `payload` is the
/// URL-safe, unpadded base64 of the JSON payload and `signature` is the
/// URL-safe, unpadded base64 of `HMAC-SHA256(secret, payload)`. Both
/// operations are pure over the input, the secret and the clock, so the
/// service can be shared freely between tasks.
#[derive(Clone)]
pub struct TokenService<C = SystemClock> {
    mac: HmacSha256,
    clock: C,
    default_ttl: u64,
}

impl<C> fmt::Debug for TokenService<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"***")
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

impl<C: Clock> TokenService<C> {
    pub fn new(secret: impl AsRef<[u8]>, clock: C) -> Result<Self, WeakSecret> {
        let secret = secret.as_ref();
        let weak = WeakSecret {
            min: MIN_SECRET_LEN,
            len: secret.len(),
        };

        if secret.len() < MIN_SECRET_LEN {
            return Err(weak);
        }

        let mac = HmacSha256::new_from_slice(secret).map_err(|_| weak)?;

        Ok(Self {
            mac,
            clock,
            default_ttl: DEFAULT_TTL_SECONDS,
        })
    }

    pub fn with_default_ttl(mut self, ttl: u64) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Mint a token for `booking_id` that stays valid for `ttl_seconds`.
    pub fn mint(&self, booking_id: &str, ttl_seconds: u64) -> Result<String, MintError> {
        self.issue(booking_id, ttl_seconds).map(|issued| issued.token)
    }

    /// Like [`TokenService::mint`] but also hands back the payload, so the
    /// caller knows the exact expiry it signed.
    pub fn issue(&self, booking_id: &str, ttl_seconds: u64) -> Result<IssuedToken, MintError> {
        if booking_id.is_empty() {
            return Err(MintError::EmptyBookingId);
        }

        let expires_at = i64::try_from(ttl_seconds)
            .ok()
            .filter(|ttl| *ttl > 0)
            .and_then(|ttl| self.clock.now().checked_add(ttl))
            .ok_or(MintError::InvalidTtl(ttl_seconds))?;

        let payload = TokenPayload {
            booking_id: booking_id.to_string(),
            expires_at,
            nonce: Uuid::new_v4().simple().to_string(),
        };

        let payload_segment = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload)?);
        let signature_segment = self.sign(&payload_segment);

        Ok(IssuedToken {
            token: format!("{payload_segment}.{signature_segment}"),
            payload,
        })
    }

    /// Check a presented token: shape, then signature, then payload, then
    /// expiry. Nothing about the payload is looked at before the signature
    /// has been accepted.
    pub fn verify(&self, token: &str) -> Result<TokenPayload, VerifyError> {
        let (payload_segment, signature_segment) = split(token)?;

        let expected = self.sign(payload_segment);
        if !bool::from(expected.as_bytes().ct_eq(signature_segment.as_bytes())) {
            return Err(VerifyError::BadSignature);
        }

        let payload: TokenPayload = URL_SAFE_NO_PAD
            .decode(payload_segment)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .ok_or(VerifyError::Malformed)?;

        if payload.expires_at <= self.clock.now() {
            return Err(VerifyError::Expired);
        }

        Ok(payload)
    }

    fn sign(&self, payload_segment: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(payload_segment.as_bytes());
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }
}

fn split(token: &str) -> Result<(&str, &str), VerifyError> {
    let mut segments = token.split('.');

    match (segments.next(), segments.next(), segments.next()) {
        (Some(payload), Some(signature), None) if !payload.is_empty() && !signature.is_empty() => {
            Ok((payload, signature))
        }
        _ => Err(VerifyError::Malformed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const SECRET: &[u8] = b"unit-test-secret-0123456789abcdef";

    fn service(now: i64) -> (TokenService<ManualClock>, ManualClock) {
        let clock = ManualClock::new(now);
        (TokenService::new(SECRET, clock.clone()).unwrap(), clock)
    }

    #[test]
    fn short_secret_is_rejected() {
        let err = TokenService::new(b"short", ManualClock::new(0)).unwrap_err();
        assert_eq!(err.len, 5);
        assert_eq!(err.min, MIN_SECRET_LEN);
    }

    #[test]
    fn issue_sets_expiry_from_clock() {
        let (tokens, _) = service(1_000);
        let issued = tokens.issue("booking-1", 600).unwrap();

        assert_eq!(issued.payload.expires_at, 1_600);
        assert_eq!(issued.payload.booking_id, "booking-1");
        assert_eq!(tokens.verify(&issued.token).unwrap(), issued.payload);
    }

    #[test]
    fn mint_rejects_bad_input() {
        let (tokens, _) = service(1_000);

        assert!(matches!(tokens.mint("", 600), Err(MintError::EmptyBookingId)));
        assert!(matches!(tokens.mint("b", 0), Err(MintError::InvalidTtl(0))));
        assert!(matches!(
            tokens.mint("b", u64::MAX),
            Err(MintError::InvalidTtl(u64::MAX))
        ));
    }

    #[test]
    fn repeated_mints_differ() {
        let (tokens, _) = service(1_000);
        let first = tokens.mint("booking-1", 600).unwrap();
        let second = tokens.mint("booking-1", 600).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let (tokens, clock) = service(1_000);
        let token = tokens.mint("booking-1", 600).unwrap();

        clock.set(1_599);
        assert!(tokens.verify(&token).is_ok());

        clock.set(1_600);
        assert_eq!(tokens.verify(&token), Err(VerifyError::Expired));
    }

    #[test]
    fn signed_garbage_payload_is_malformed() {
        let (tokens, _) = service(1_000);

        let not_base64 = "!!!";
        let token = format!("{not_base64}.{}", tokens.sign(not_base64));
        assert_eq!(tokens.verify(&token), Err(VerifyError::Malformed));

        let not_json = URL_SAFE_NO_PAD.encode(b"{\"booking_id\":1}");
        let token = format!("{not_json}.{}", tokens.sign(&not_json));
        assert_eq!(tokens.verify(&token), Err(VerifyError::Malformed));
    }

    #[test]
    fn signature_checked_before_payload() {
        let (tokens, _) = service(1_000);
        assert_eq!(
            tokens.verify("!!!.c2lnbmF0dXJl"),
            Err(VerifyError::BadSignature)
        );
    }

    #[test]
    fn debug_hides_secret() {
        let (tokens, _) = service(1_000);
        let debug = format!("{tokens:?}");

        assert!(debug.contains("***"));
        assert!(!debug.contains("unit-test-secret"));
    }
}
