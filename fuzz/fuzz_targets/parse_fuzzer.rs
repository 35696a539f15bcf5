//! Fuzz target for [`Signer::parse`]
//!
//! Tokens are attacker-controlled, so parsing must never panic.
//!
//! # Strategy
//!
//! - Raw bytes: arbitrary token bodies of any length
//! - Clock skew: parse at an arbitrary wall-clock time, including pre-epoch
//! - Valid prefix: splice fuzzed bytes after a genuine header to reach the
//!   payload and signature stages
//!
//! # Invariants
//!
//! - NEVER panic on any input
//! - Inputs shorter than the encoded header MUST yield `TooShort`
//! - A header-only token that verifies MUST yield an empty payload

#![no_main]

use std::time::{Duration, UNIX_EPOCH};

use arbitrary::Arbitrary;
use hmacsigner::{ENCODED_HEADER_LEN, ParseError, Signer};
use hmacsigner_harness::{FixedEnv, GOLDEN_SECRET, GOLDEN_TOKEN};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    /// Parse time in seconds relative to the epoch.
    now_secs: i32,
    /// Token TTL in seconds, zero mapped to one.
    ttl_secs: u16,
    /// Prepend the golden header to `bytes`.
    with_valid_header: bool,
    bytes: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    let offset = Duration::from_secs(u64::from(input.now_secs.unsigned_abs()));
    let now = if input.now_secs >= 0 { UNIX_EPOCH + offset } else { UNIX_EPOCH - offset };
    let ttl = Duration::from_secs(u64::from(input.ttl_secs.max(1)));
    let signer = Signer::with_env(GOLDEN_SECRET, ttl, FixedEnv::golden().at(now));

    let mut token = Vec::new();
    if input.with_valid_header {
        token.extend_from_slice(&GOLDEN_TOKEN.as_bytes()[..ENCODED_HEADER_LEN]);
    }
    token.extend_from_slice(&input.bytes);

    match signer.parse(&token) {
        Ok(payload) => {
            if token.len() == ENCODED_HEADER_LEN {
                assert!(payload.is_empty(), "header-only token produced a payload");
            }
        },
        Err(ParseError::TooShort { len }) => {
            assert!(len < ENCODED_HEADER_LEN);
            assert_eq!(len, token.len());
        },
        Err(_) => {
            assert!(token.len() >= ENCODED_HEADER_LEN);
        },
    }
});
