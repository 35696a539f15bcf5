//! Environment with a frozen clock and a fixed salt.

use std::time::{SystemTime, UNIX_EPOCH};

use hmacsigner::Environment;

/// Environment that always reports the same time and "random" bytes.
///
/// `random_bytes` repeats the salt pattern to fill buffers of any size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedEnv {
    now: SystemTime,
    salt: [u8; hmacsigner::SALT_LEN],
}

impl FixedEnv {
    /// Frozen at `now`, producing `salt` on every draw.
    pub fn new(now: SystemTime, salt: [u8; hmacsigner::SALT_LEN]) -> Self {
        Self { now, salt }
    }

    /// The golden fixture: unix epoch and salt `00..07`.
    pub fn golden() -> Self {
        Self::new(UNIX_EPOCH, crate::GOLDEN_SALT)
    }

    /// Same salt, different clock.
    #[must_use]
    pub fn at(&self, now: SystemTime) -> Self {
        Self { now, salt: self.salt }
    }
}

impl Environment for FixedEnv {
    fn now(&self) -> SystemTime {
        self.now
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        for (dst, src) in buffer.iter_mut().zip(self.salt.iter().cycle()) {
            *dst = *src;
        }
    }
}
