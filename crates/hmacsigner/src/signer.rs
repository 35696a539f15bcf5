//! Token generation and verification.

use std::time::Duration;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::{
    config::SignerConfig,
    env::{Environment, SystemEnv, unix_nanos},
    error::{ParseError, Segment},
    header::{ENCODED_HEADER_LEN, Header},
};

/// Smallest accepted HMAC secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Generates and parses signed, timestamped tokens.
///
/// A `Signer` is immutable after construction and holds no per-call state, so
/// one instance can be shared freely across threads.
///
/// # Security
///
/// - **Debug Redaction**: The `Debug` impl never prints the secret.
#[derive(Clone)]
pub struct Signer<E: Environment = SystemEnv> {
    secret: Vec<u8>,
    ttl: Duration,
    env: E,
}

impl Signer<SystemEnv> {
    /// Create a signer backed by the system clock and OS entropy.
    ///
    /// # Panics
    ///
    /// Panics if `ttl` is zero.
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self::with_env(secret, ttl, SystemEnv::new())
    }
}

impl<E: Environment> Signer<E> {
    /// Create a signer with an explicit environment.
    ///
    /// # Panics
    ///
    /// Panics if `ttl` is zero.
    pub fn with_env(secret: impl Into<Vec<u8>>, ttl: Duration, env: E) -> Self {
        assert!(!ttl.is_zero(), "signer ttl must be positive");
        Self { secret: secret.into(), ttl, env }
    }

    /// Create a signer from a loaded configuration.
    ///
    /// # Panics
    ///
    /// Panics if the configured TTL is zero.
    pub fn from_config(config: SignerConfig, env: E) -> Self {
        Self::with_env(config.secret, config.ttl, env)
    }

    /// Maximum token age.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Environment used for time and randomness.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Signs `payload`, returning a URL-safe token.
    ///
    /// An empty payload is valid and produces a header-only token.
    ///
    /// # Panics
    ///
    /// Panics if the secret is shorter than [`MIN_SECRET_LEN`]: a short key is
    /// a deployment error, not bad input. Also panics if the environment
    /// cannot provide secure randomness.
    pub fn generate(&self, payload: &[u8]) -> String {
        assert!(
            self.secret.len() >= MIN_SECRET_LEN,
            "signer secret must be at least {MIN_SECRET_LEN} bytes, got {}",
            self.secret.len()
        );

        let issued_at = unix_nanos(self.env.now());
        let issued_at = i64::try_from(issued_at.clamp(i64::MIN.into(), i64::MAX.into()))
            .unwrap_or_default();

        let mut header = Header::new();
        header.write_timestamp(issued_at);
        header.write_salt(&self.env);
        header.sign(&self.secret, payload);

        let payload_len = base64::encoded_len(payload.len(), false).unwrap_or_default();
        let mut token = String::with_capacity(ENCODED_HEADER_LEN + payload_len);
        header.encode_into(&mut token);
        URL_SAFE_NO_PAD.encode_string(payload, &mut token);

        tracing::trace!(payload_len = payload.len(), "generated token");
        token
    }

    /// Verifies `token` and returns the original payload.
    ///
    /// Checks run in a fixed order and stop at the first failure: length,
    /// header encoding and version, expiry, payload encoding, signature.
    /// Expiry is checked before the MAC.
    pub fn parse(&self, token: impl AsRef<[u8]>) -> Result<Vec<u8>, ParseError> {
        self.verify(token.as_ref())
            .inspect(|payload| tracing::trace!(payload_len = payload.len(), "accepted token"))
            .inspect_err(|e| tracing::debug!(reason = e.reason(), "rejected token: {}", e))
    }

    fn verify(&self, token: &[u8]) -> Result<Vec<u8>, ParseError> {
        if token.len() < ENCODED_HEADER_LEN {
            return Err(ParseError::TooShort { len: token.len() });
        }

        let (encoded_header, encoded_payload) = token.split_at(ENCODED_HEADER_LEN);
        let header = Header::decode(encoded_header)?;

        if header.expires_at_nanos(self.ttl) <= unix_nanos(self.env.now()) {
            return Err(ParseError::TimestampExpired { issued_at_nanos: header.issued_at_nanos() });
        }

        let payload = URL_SAFE_NO_PAD
            .decode(encoded_payload)
            .map_err(|_| ParseError::InvalidEncoding { segment: Segment::Payload })?;

        if !header.verify(&self.secret, &payload) {
            return Err(ParseError::SignatureMismatch);
        }

        Ok(payload)
    }
}

impl<E: Environment> std::fmt::Debug for Signer<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("secret", &format_args!("<redacted {} bytes>", self.secret.len()))
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use proptest::prelude::*;

    use super::*;
    use crate::header::HEADER_LEN;

    const SECRET: [u8; 32] = [b'a'; 32];
    const TTL: Duration = Duration::from_secs(3600);
    const GOLDEN: &str = "AQAAAAAAAAAAAAECAwQFBgccnyOnmh2t0YOuMjv4vUxPALpkI1q-V1a0vKqZRmc-6AYUBiLmM";

    // Fixed clock, salt 00..07
    #[derive(Clone)]
    struct TestEnv {
        now: SystemTime,
    }

    impl Environment for TestEnv {
        fn now(&self) -> SystemTime {
            self.now
        }

        fn random_bytes(&self, buffer: &mut [u8]) {
            for (i, b) in buffer.iter_mut().enumerate() {
                *b = u8::try_from(i).unwrap_or(u8::MAX);
            }
        }
    }

    fn signer_at(now: SystemTime) -> Signer<TestEnv> {
        Signer::with_env(SECRET, TTL, TestEnv { now })
    }

    fn header_only(version: u8, issued_at_nanos: i64) -> String {
        let mut raw = [0u8; HEADER_LEN];
        raw[0] = version;
        raw[1..9].copy_from_slice(&issued_at_nanos.to_le_bytes());
        URL_SAFE_NO_PAD.encode(raw)
    }

    #[test]
    fn golden_token() {
        let signer = signer_at(UNIX_EPOCH);

        let token = signer.generate(b"a@b.c");
        assert_eq!(token, GOLDEN);
        assert_eq!(signer.parse(&token), Ok(b"a@b.c".to_vec()));
    }

    #[test]
    fn empty_payload_is_header_only() {
        let signer = signer_at(UNIX_EPOCH);

        let token = signer.generate(b"");
        assert_eq!(token, "AQAAAAAAAAAAAAECAwQFBgej5pZ_LU57zifBgHDrdXko9vNTIF2wU4o-GKPovR2evw");
        assert_eq!(token.len(), ENCODED_HEADER_LEN);
        assert_eq!(signer.parse(&token), Ok(Vec::new()));
    }

    #[test]
    fn too_short() {
        let signer = signer_at(UNIX_EPOCH);

        assert_eq!(signer.parse(""), Err(ParseError::TooShort { len: 0 }));
        assert_eq!(
            signer.parse(&GOLDEN[..ENCODED_HEADER_LEN - 1]),
            Err(ParseError::TooShort { len: ENCODED_HEADER_LEN - 1 })
        );
    }

    #[test]
    fn pipeline_order() {
        // Mirrors each stage failing while every earlier stage passes.
        let signer = signer_at(UNIX_EPOCH + Duration::from_secs(1));
        let fresh = header_only(1, 1);
        let junk = "$".repeat(ENCODED_HEADER_LEN + 10);

        let cases = [
            ("empty", String::new(), ParseError::TooShort { len: 0 }),
            (
                "invalid header encoding",
                junk.clone(),
                ParseError::InvalidEncoding { segment: Segment::Header },
            ),
            (
                "invalid version",
                header_only(7, 1) + &junk,
                ParseError::InvalidVersion { expected: 1, actual: 7 },
            ),
            (
                "future version with corrupt header body",
                format!("{}B", &header_only(7, 1)[..ENCODED_HEADER_LEN - 1]) + &junk,
                ParseError::InvalidVersion { expected: 1, actual: 7 },
            ),
            (
                "expired before payload decode",
                header_only(1, -i64::try_from(TTL.as_nanos()).unwrap()) + &junk,
                ParseError::TimestampExpired {
                    issued_at_nanos: -i64::try_from(TTL.as_nanos()).unwrap(),
                },
            ),
            (
                "invalid payload encoding",
                fresh.clone() + "$",
                ParseError::InvalidEncoding { segment: Segment::Payload },
            ),
            (
                "dangling payload character",
                fresh.clone() + "A",
                ParseError::InvalidEncoding { segment: Segment::Payload },
            ),
            ("zero signature", fresh + "AAAA", ParseError::SignatureMismatch),
        ];

        for (name, token, expected) in cases {
            assert_eq!(signer.parse(&token), Err(expected), "{name}");
        }
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let token = signer_at(UNIX_EPOCH).generate(b"a@b.c");

        let last_valid = UNIX_EPOCH + TTL - Duration::from_nanos(1);
        assert_eq!(signer_at(last_valid).parse(&token), Ok(b"a@b.c".to_vec()));

        let boundary = UNIX_EPOCH + TTL;
        assert_eq!(
            signer_at(boundary).parse(&token),
            Err(ParseError::TimestampExpired { issued_at_nanos: 0 })
        );
    }

    #[test]
    fn future_tokens_are_fresh() {
        let token = signer_at(UNIX_EPOCH + TTL * 2).generate(b"x");
        assert_eq!(signer_at(UNIX_EPOCH).parse(&token), Ok(b"x".to_vec()));
    }

    #[test]
    fn other_secret_mismatches() {
        let token = signer_at(UNIX_EPOCH).generate(b"a@b.c");
        let other = Signer::with_env([b'b'; 32], TTL, TestEnv { now: UNIX_EPOCH });

        assert_eq!(other.parse(&token), Err(ParseError::SignatureMismatch));
    }

    #[test]
    fn padded_payload_is_rejected() {
        let token = signer_at(UNIX_EPOCH).generate(b"a@b.c");
        assert_eq!(
            signer_at(UNIX_EPOCH).parse(token + "="),
            Err(ParseError::InvalidEncoding { segment: Segment::Payload })
        );
    }

    #[test]
    fn pre_epoch_clock() {
        let before = UNIX_EPOCH - Duration::from_secs(10);
        let signer = signer_at(before);

        let token = signer.generate(b"old");
        assert_eq!(signer.parse(&token), Ok(b"old".to_vec()));
    }

    #[test]
    #[should_panic(expected = "at least 32 bytes")]
    fn short_secret_is_fatal() {
        let signer = Signer::with_env([b'a'; 31], TTL, TestEnv { now: UNIX_EPOCH });
        let _ = signer.generate(b"a@b.c");
    }

    #[test]
    #[should_panic(expected = "ttl must be positive")]
    fn zero_ttl_is_fatal() {
        let _ = Signer::with_env(SECRET, Duration::ZERO, TestEnv { now: UNIX_EPOCH });
    }

    #[test]
    fn short_secret_can_still_parse() {
        let signer = Signer::with_env(*b"1234567890", TTL, TestEnv { now: UNIX_EPOCH });
        assert_eq!(signer.parse(GOLDEN), Err(ParseError::SignatureMismatch));
    }

    #[test]
    fn from_config() {
        let config = SignerConfig::new(SECRET).with_ttl(Duration::from_secs(1));
        let signer = Signer::from_config(config, TestEnv { now: UNIX_EPOCH });

        assert_eq!(signer.ttl(), Duration::from_secs(1));
        assert_eq!(signer.generate(b"a@b.c"), GOLDEN);
    }

    #[test]
    fn debug_redacts_secret() {
        let debug = format!("{:?}", signer_at(UNIX_EPOCH));
        assert!(debug.contains("<redacted 32 bytes>"));
        assert!(!debug.contains("97"));
    }

    #[test]
    fn system_signer_round_trip() {
        let signer = Signer::new(SECRET, TTL);
        let first = signer.generate(b"a@b.c");
        let second = signer.generate(b"a@b.c");

        assert_ne!(first, second, "salt should differ between tokens");
        assert_eq!(signer.parse(&first), Ok(b"a@b.c".to_vec()));
        assert_eq!(crate::parse(&SECRET, TTL, &second), Ok(b"a@b.c".to_vec()));
    }

    proptest! {
        #[test]
        fn payload_boundary_found_by_length(payload in prop::collection::vec(any::<u8>(), 0..64)) {
            let signer = signer_at(UNIX_EPOCH);
            let token = signer.generate(&payload);

            prop_assert_eq!(
                token.len(),
                ENCODED_HEADER_LEN + base64::encoded_len(payload.len(), false).unwrap()
            );
            prop_assert_eq!(signer.parse(&token), Ok(payload));
        }
    }
}
