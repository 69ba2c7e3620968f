//! Each [`crate::Engine`] draws its own `(k0, k1)` SipHash key pair once, at
//! `init`, from a cryptographically strong source.

use rand::RngCore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Distinguishes independent engines that fall back to the weak source in
/// the same process (and, incidentally, within the same nanosecond).
static WEAK_SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Draws a fresh `(k0, k1)` pair for one engine instance.
///
/// Tries the OS RNG first. If it is unavailable, falls back to a
/// splitmix64 stream seeded from the system clock and a process-wide
/// counter, and logs a warning — this is the one diagnostic emission the
/// core engine makes on its own initiative.
pub(crate) fn generate() -> (u64, u64) {
    let mut buf = [0u8; 16];
    match rand::rngs::OsRng.try_fill_bytes(&mut buf) {
        Ok(()) => {
            let k0 = u64::from_le_bytes(buf[..8].try_into().unwrap());
            let k1 = u64::from_le_bytes(buf[8..].try_into().unwrap());
            (k0, k1)
        }
        Err(err) => {
            log::warn!(
                "falling back to a weak hash-key source, OS RNG unavailable: {err}"
            );
            weak_pair()
        }
    }
}

fn weak_pair() -> (u64, u64) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let counter = WEAK_SEED_COUNTER.fetch_add(1, Ordering::Relaxed);
    let seed = nanos ^ counter.wrapping_mul(0x9E3779B97F4A7C15);
    let k0 = splitmix64(seed);
    let k1 = splitmix64(seed ^ 0xD1B54A32D192ED03);
    (k0, k1)
}

/// SplitMix64, used only for the never-expected weak-randomness fallback.
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
