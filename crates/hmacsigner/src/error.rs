//! Token parse errors.

use thiserror::Error;

/// Which base64 run of a token failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    /// The fixed-width header prefix.
    Header,
    /// The variable-width payload suffix.
    Payload,
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Header => f.write_str("header"),
            Self::Payload => f.write_str("payload"),
        }
    }
}

/// Reasons a token is rejected by [`Signer::parse`](crate::Signer::parse).
///
/// Callers should treat every variant as "reject this token". The variants
/// exist for diagnostics; they carry no secret material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Token is shorter than the encoded header.
    #[error("hmacsigner: too short: {len} bytes")]
    TooShort {
        /// Length of the rejected token.
        len: usize,
    },

    /// A base64 segment is malformed.
    #[error("hmacsigner: invalid encoding in {segment}")]
    InvalidEncoding {
        /// Segment that failed to decode.
        segment: Segment,
    },

    /// Header carries an unknown format version.
    #[error("hmacsigner: invalid version: expected {expected}, got {actual}")]
    InvalidVersion {
        /// Version this build understands.
        expected: u8,
        /// Version found in the token.
        actual: u8,
    },

    /// Token was issued more than one TTL ago.
    #[error("hmacsigner: timestamp expired (issued at {issued_at_nanos}ns)")]
    TimestampExpired {
        /// Issuance time in unix nanoseconds as embedded in the token.
        issued_at_nanos: i64,
    },

    /// Recomputed signature does not match the transmitted one.
    #[error("hmacsigner: signature mismatch")]
    SignatureMismatch,
}

impl ParseError {
    /// Stable label for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::TooShort { .. } => "too_short",
            Self::InvalidEncoding { .. } => "invalid_encoding",
            Self::InvalidVersion { .. } => "invalid_version",
            Self::TimestampExpired { .. } => "timestamp_expired",
            Self::SignatureMismatch => "signature_mismatch",
        }
    }
}
