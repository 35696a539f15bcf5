//! HMAC Signer
//!
//! Compact signed and timestamped blobs for bearer tokens and signed cookies.
//! A [`Signer`] turns an arbitrary payload into a single URL-safe token that
//! embeds the issuance time, a random salt and an HMAC-SHA256 signature, and
//! later verifies and unpacks it.
//!
//! # Wire Format
//!
//! ```text
//! base64url(version || issued_at || salt || signature) || base64url(payload)
//!           1 byte     8 bytes LE   8 bytes  32 bytes
//! ```
//!
//! The header is always 49 bytes, i.e. exactly 66 base64 characters, so the
//! payload boundary is found by length alone. No padding, no separator.
//!
//! # Security Properties
//!
//! - Integrity: the signature covers every header field before it plus the raw
//!   payload bytes
//! - Freshness: tokens older than the configured TTL are rejected before any
//!   MAC work is done
//! - Not confidential: the payload is signed, not encrypted
//!
//! # Failure Model
//!
//! Misconfiguration (secret shorter than [`MIN_SECRET_LEN`], zero TTL, no OS
//! entropy) panics. Malformed or hostile tokens never panic; they produce a
//! [`ParseError`].
//!
//! ```rust
//! use std::time::Duration;
//!
//! use hmacsigner::Signer;
//!
//! let signer = Signer::new([7u8; 32], Duration::from_secs(3600));
//! let token = signer.generate(b"user@example.com");
//! assert_eq!(signer.parse(&token).unwrap(), b"user@example.com");
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod env;
pub mod error;
pub mod header;
pub mod mac;
mod signer;

use std::time::Duration;

pub use config::SignerConfig;
pub use env::{Environment, SystemEnv};
pub use error::{ParseError, Segment};
pub use header::{
    ENCODED_HEADER_LEN, HEADER_LEN, Header, SALT_LEN, SIGNATURE_LEN, TIMESTAMP_LEN, VERSION,
};
pub use signer::{MIN_SECRET_LEN, Signer};

/// Signs `payload` with `secret` using the system clock and RNG.
///
/// # Panics
///
/// Panics if `secret` is shorter than [`MIN_SECRET_LEN`] or `ttl` is zero.
pub fn generate(secret: &[u8], ttl: Duration, payload: &[u8]) -> String {
    Signer::new(secret, ttl).generate(payload)
}

/// Verifies `token` against `secret` and `ttl`, returning the payload.
///
/// # Panics
///
/// Panics if `ttl` is zero.
pub fn parse(secret: &[u8], ttl: Duration, token: impl AsRef<[u8]>) -> Result<Vec<u8>, ParseError> {
    Signer::new(secret, ttl).parse(token)
}
