//! HMAC-SHA256 over the header prefix and raw payload.
//!
//! All functions here are pure. The signed message is the concatenation
//! `prefix || payload`, fed to the MAC in that order without copying.

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Output size of HMAC-SHA256.
pub const DIGEST_LEN: usize = 32;

type HmacSha256 = Hmac<Sha256>;

fn keyed(secret: &[u8], prefix: &[u8], payload: &[u8]) -> HmacSha256 {
    // HMAC hashes long keys and pads short ones, so no length is rejected.
    let mut mac = HmacSha256::new_from_slice(secret)
        .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
    mac.update(prefix);
    mac.update(payload);
    mac
}

/// Computes the signature of `prefix || payload` under `secret`.
pub fn sign(secret: &[u8], prefix: &[u8], payload: &[u8]) -> [u8; DIGEST_LEN] {
    let digest = keyed(secret, prefix, payload).finalize().into_bytes();
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&digest);
    out
}

/// Checks `signature` against `prefix || payload` in constant time.
pub fn verify(secret: &[u8], prefix: &[u8], payload: &[u8], signature: &[u8]) -> bool {
    keyed(secret, prefix, payload).verify_slice(signature).is_ok()
}
