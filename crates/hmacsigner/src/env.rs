//! Environment abstraction for deterministic testing.
//!
//! The `Environment` trait decouples token logic from system resources (wall
//! clock and randomness). Production code uses [`SystemEnv`]; tests swap in a
//! fixed or simulated environment so that `generate` becomes a pure function
//! and golden tokens can be asserted byte for byte.
//!
//! # Invariants
//!
//! - Isolation: implementations must not share global state
//! - Unpredictability in production: `random_bytes()` draws from the OS
//!   entropy pool

use std::time::{SystemTime, UNIX_EPOCH};

/// Abstract environment providing wall-clock time and randomness.
///
/// Unlike a monotonic clock, `now()` returns wall-clock time because token
/// timestamps must be meaningful across processes and hosts.
///
/// # Safety
///
/// Implementations MUST guarantee:
///
/// 1. RNG quality: `random_bytes()` uses cryptographically secure entropy in
///    production
/// 2. Thread safety: a single environment may be used from many threads at
///    once through a shared `Signer`
pub trait Environment: Clone + Send + Sync + 'static {
    /// Returns the current wall-clock time.
    fn now(&self) -> SystemTime;

    /// Fills the provided buffer with random bytes.
    ///
    /// # Security
    ///
    /// Production implementations MUST use `getrandom` (OS entropy pool) and
    /// MUST NOT fall back to a weaker source when it fails.
    fn random_bytes(&self, buffer: &mut [u8]);
}

/// Production environment using the system clock and OS entropy.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }

    #[allow(clippy::panic)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        if let Err(e) = getrandom::fill(buffer) {
            tracing::error!("getrandom failed: {}", e);
            panic!("secure randomness unavailable: {e}");
        }
    }
}

/// Converts a wall-clock time to signed nanoseconds since the unix epoch.
///
/// Times before the epoch are negative. Values never overflow: a `u128` of
/// nanoseconds beyond `i128` range saturates.
pub fn unix_nanos(time: SystemTime) -> i128 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(since) => i128::try_from(since.as_nanos()).unwrap_or(i128::MAX),
        Err(before) => i128::try_from(before.duration().as_nanos()).map_or(i128::MIN, |n| -n),
    }
}
