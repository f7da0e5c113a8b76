use std::fmt;

use serde::Deserialize;

use crate::qr::DEFAULT_TTL_SECONDS;

/// Signing settings for booking QR codes.
///
/// The secret has no default. It comes from the
/// environment (`APP_QR__SECRET`) or a local, uncommitted config file.
#[derive(Deserialize, Clone)]
pub struct QrConfig {
    secret: String,
    #[serde(default = "default_ttl")]
    ttl: u64,
}

fn default_ttl() -> u64 {
    DEFAULT_TTL_SECONDS
}

impl QrConfig {
    pub fn secret(&self) -> &[u8] {
        self.secret.as_bytes()
    }

    pub fn ttl(&self) -> u64 {
        self.ttl
    }
}

impl fmt::Debug for QrConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QrConfig")
            .field("secret", &"***")
            .field("ttl", &self.ttl)
            .finish()
    }
}
