//! Fixed-size token header.
//!
//! The header is a packed 49-byte record read and written in place with
//! `zerocopy`. Everything before the signature field is the signed prefix.
//!
//! ```text
//! offset  size  field
//!      0     1  version (0x01)
//!      1     8  issued_at, unix nanoseconds, i64 little-endian
//!      9     8  salt
//!     17    32  HMAC-SHA256(secret, bytes[0..17] || payload)
//! ```

use std::time::Duration;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned, byteorder::little_endian::I64,
};

use crate::{
    env::Environment,
    error::{ParseError, Segment},
    mac,
};

/// Current wire format version.
pub const VERSION: u8 = 0x01;

/// Size of the version field.
pub const VERSION_LEN: usize = 1;

/// Size of the issuance timestamp.
pub const TIMESTAMP_LEN: usize = 8;

/// Size of the random salt.
pub const SALT_LEN: usize = 8;

/// Size of the HMAC-SHA256 signature.
pub const SIGNATURE_LEN: usize = mac::DIGEST_LEN;

/// Bytes covered by the signature, excluding the payload.
pub const SIGNED_PREFIX_LEN: usize = VERSION_LEN + TIMESTAMP_LEN + SALT_LEN;

/// Raw header size.
pub const HEADER_LEN: usize = SIGNED_PREFIX_LEN + SIGNATURE_LEN;

/// Header size once base64-encoded without padding.
pub const ENCODED_HEADER_LEN: usize = (HEADER_LEN * 4).div_ceil(3);

/// Base64 characters in the first 3-byte group, which holds the version.
const VERSION_QUANTUM_LEN: usize = 4;

const _: () = assert!(size_of::<Header>() == HEADER_LEN);

/// Token header.
#[derive(Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct Header {
    version: u8,
    issued_at: I64,
    salt: [u8; SALT_LEN],
    signature: [u8; SIGNATURE_LEN],
}

impl Header {
    /// Creates an empty header carrying the current version.
    ///
    /// Timestamp, salt and signature start zeroed.
    pub fn new() -> Self {
        Self {
            version: VERSION,
            issued_at: I64::new(0),
            salt: [0; SALT_LEN],
            signature: [0; SIGNATURE_LEN],
        }
    }

    /// Sets the issuance time in unix nanoseconds.
    pub fn write_timestamp(&mut self, issued_at_nanos: i64) {
        self.issued_at = I64::new(issued_at_nanos);
    }

    /// Fills the salt from the environment's randomness source.
    pub fn write_salt<E: Environment>(&mut self, env: &E) {
        env.random_bytes(&mut self.salt);
    }

    /// Signs the header prefix followed by `payload`.
    pub fn sign(&mut self, secret: &[u8], payload: &[u8]) {
        self.signature = mac::sign(secret, self.signed_prefix(), payload);
    }

    /// Recomputes the signature and compares it in constant time.
    pub fn verify(&self, secret: &[u8], payload: &[u8]) -> bool {
        mac::verify(secret, self.signed_prefix(), payload, &self.signature)
    }

    /// Header bytes covered by the signature.
    pub fn signed_prefix(&self) -> &[u8] {
        &self.as_bytes()[..SIGNED_PREFIX_LEN]
    }

    /// Format version.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Issuance time in unix nanoseconds.
    pub fn issued_at_nanos(&self) -> i64 {
        self.issued_at.get()
    }

    /// First instant, in unix nanoseconds, at which the header is stale.
    pub fn expires_at_nanos(&self, ttl: Duration) -> i128 {
        let ttl = i128::try_from(ttl.as_nanos()).unwrap_or(i128::MAX);
        i128::from(self.issued_at_nanos()).saturating_add(ttl)
    }

    /// Random salt.
    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    /// Transmitted signature.
    pub fn signature(&self) -> &[u8; SIGNATURE_LEN] {
        &self.signature
    }

    /// Appends the base64 encoding of the header to `out`.
    pub fn encode_into(&self, out: &mut String) {
        URL_SAFE_NO_PAD.encode_string(self.as_bytes(), out);
    }

    /// Decodes an [`ENCODED_HEADER_LEN`]-character prefix.
    ///
    /// Only the leading base64 quantum is decoded before the version byte is
    /// checked, so a header from another format version reports
    /// `InvalidVersion` whatever the rest of it looks like.
    pub fn decode(encoded: &[u8]) -> Result<Self, ParseError> {
        const INVALID: ParseError = ParseError::InvalidEncoding { segment: Segment::Header };

        let lead = encoded.get(..VERSION_QUANTUM_LEN).ok_or(INVALID)?;
        let lead = URL_SAFE_NO_PAD.decode(lead).map_err(|_| INVALID)?;
        let version = lead.first().copied().ok_or(INVALID)?;
        if version != VERSION {
            return Err(ParseError::InvalidVersion { expected: VERSION, actual: version });
        }

        let bytes = URL_SAFE_NO_PAD.decode(encoded).map_err(|_| INVALID)?;
        Self::read_from_bytes(&bytes).map_err(|_| INVALID)
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Header")
            .field("version", &self.version)
            .field("issued_at_nanos", &self.issued_at_nanos())
            .field("salt", &self.salt)
            .field("signature", &format_args!("<{} bytes>", self.signature.len()))
            .finish()
    }
}
