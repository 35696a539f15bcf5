//! Signer configuration.
//!
//! Loaded by the embedding application from wherever it keeps its settings;
//! this crate only defines the shape.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default token lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Secret and lifetime for a [`Signer`](crate::Signer).
///
/// # Security
///
/// - **Debug Redaction**: The `Debug` impl redacts `secret` so the config can
///   be logged at startup.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerConfig {
    /// HMAC key, at least [`MIN_SECRET_LEN`](crate::MIN_SECRET_LEN) bytes.
    pub secret: Vec<u8>,
    /// Maximum token age.
    #[serde(default = "default_ttl")]
    pub ttl: Duration,
}

fn default_ttl() -> Duration {
    DEFAULT_TTL
}

impl SignerConfig {
    /// Config with the given secret and [`DEFAULT_TTL`].
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self { secret: secret.into(), ttl: DEFAULT_TTL }
    }

    /// Replaces the TTL.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl std::fmt::Debug for SignerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerConfig")
            .field("secret", &format_args!("<redacted {} bytes>", self.secret.len()))
            .field("ttl", &self.ttl)
            .finish()
    }
}
