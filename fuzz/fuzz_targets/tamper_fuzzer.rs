//! Fuzz target for signature integrity
//!
//! Prevent forged payloads from verifying.
//!
//! # Strategy
//!
//! - Generate a real token for a fuzzed payload
//! - Apply fuzzed edits: overwrite, insert, remove, truncate
//!
//! # Invariants
//!
//! - An untouched token MUST round-trip
//! - An edited token MUST either fail to parse or decode to the original
//!   payload (edits that cancel out are allowed)
//! - NEVER panic

#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use hmacsigner::Signer;
use hmacsigner_harness::{FixedEnv, GOLDEN_SECRET};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
enum Edit {
    Overwrite { index: u16, byte: u8 },
    Insert { index: u16, byte: u8 },
    Remove { index: u16 },
    Truncate { len: u16 },
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    payload: Vec<u8>,
    edits: Vec<Edit>,
}

fuzz_target!(|input: FuzzInput| {
    let signer = Signer::with_env(GOLDEN_SECRET, Duration::from_secs(3600), FixedEnv::golden());
    let original = signer.generate(&input.payload);
    assert_eq!(signer.parse(&original).as_deref(), Ok(&input.payload[..]));

    let mut token = original.into_bytes();
    for edit in input.edits {
        let len = token.len();
        match edit {
            Edit::Overwrite { index, byte } if len > 0 => {
                token[usize::from(index) % len] = byte;
            },
            Edit::Insert { index, byte } => {
                token.insert(usize::from(index) % (len + 1), byte);
            },
            Edit::Remove { index } if len > 0 => {
                token.remove(usize::from(index) % len);
            },
            Edit::Truncate { len: to } => {
                token.truncate(usize::from(to));
            },
            _ => {},
        }
    }

    if let Ok(payload) = signer.parse(&token) {
        assert_eq!(payload, input.payload, "edited token verified with a different payload");
    }
});
