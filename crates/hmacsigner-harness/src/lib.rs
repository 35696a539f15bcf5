//! Deterministic environments for hmacsigner testing.
//!
//! [`FixedEnv`] pins the clock and the salt so a [`Signer`] becomes a pure
//! function and golden tokens can be compared byte for byte. [`SimEnv`] uses a
//! seeded RNG and a clock that only moves when told to, for reproducible
//! property tests that exercise expiry.
//!
//! This crate is only ever a dev-dependency; production builds cannot reach
//! these environments.
//!
//! [`Signer`]: hmacsigner::Signer

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod fixed_env;
mod sim_env;

pub use fixed_env::FixedEnv;
pub use sim_env::SimEnv;

/// Secret used by golden fixtures.
pub const GOLDEN_SECRET: [u8; 32] = [b'a'; 32];

/// Salt used by golden fixtures.
pub const GOLDEN_SALT: [u8; hmacsigner::SALT_LEN] = [0, 1, 2, 3, 4, 5, 6, 7];

/// Payload used by golden fixtures.
pub const GOLDEN_PAYLOAD: &[u8] = b"a@b.c";

/// Token for [`GOLDEN_PAYLOAD`] signed at the unix epoch with the golden
/// secret and salt.
pub const GOLDEN_TOKEN: &str =
    "AQAAAAAAAAAAAAECAwQFBgccnyOnmh2t0YOuMjv4vUxPALpkI1q-V1a0vKqZRmc-6AYUBiLmM";

/// Signature embedded in [`GOLDEN_TOKEN`].
pub const GOLDEN_SIGNATURE: [u8; hmacsigner::SIGNATURE_LEN] = [
    0x1C, 0x9F, 0x23, 0xA7, 0x9A, 0x1D, 0xAD, 0xD1, 0x83, 0xAE, 0x32, 0x3B, 0xF8, 0xBD, 0x4C, 0x4F,
    0x00, 0xBA, 0x64, 0x23, 0x5A, 0xBE, 0x57, 0x56, 0xB4, 0xBC, 0xAA, 0x99, 0x46, 0x67, 0x3E, 0xE8,
];
