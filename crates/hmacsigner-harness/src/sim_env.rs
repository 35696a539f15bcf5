//! Simulated environment with a manual clock and seeded RNG.
//!
//! Clones share the clock and the RNG stream, so a test can hold one handle to
//! advance time while a `Signer` holds another.
//!
//! # Invariants
//!
//! - Determinism: given the same seed and the same sequence of calls, every
//!   draw and every token is identical across runs
//! - Time only moves via [`SimEnv::advance`] or [`SimEnv::set_now`]

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use hmacsigner::Environment;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic environment for simulation tests.
#[derive(Debug, Clone)]
pub struct SimEnv {
    clock: Arc<Mutex<SystemTime>>,
    rng: Arc<Mutex<ChaCha8Rng>>,
}

impl SimEnv {
    /// Starts at the unix epoch with an RNG seeded from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            clock: Arc::new(Mutex::new(UNIX_EPOCH)),
            rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
        }
    }

    /// Moves the shared clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.clock.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    /// Sets the shared clock.
    pub fn set_now(&self, to: SystemTime) {
        *self.clock.lock().unwrap_or_else(PoisonError::into_inner) = to;
    }
}

impl Environment for SimEnv {
    fn now(&self) -> SystemTime {
        *self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner).fill_bytes(buffer);
    }
}
