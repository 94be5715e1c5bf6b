//! Per-document random seed derivation.

use crate::murmur::murmur3_32;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Disambiguates documents created within the same clock tick. The source draws a second value
/// from `rand()` after seeding with `srand()`; we have no process-wide PRNG state to seed, so a
/// monotonic counter plays the same disambiguating role.
static SEQUENCE: AtomicU32 = AtomicU32::new(0);

/// Derives a 32-bit per-document hash seed from the wall clock, matching the source's
/// `clock()`/`time()`-derived seed (see `jmap_init` in `original_source/src/json.c`).
///
/// This is not a cryptographic seed. Its only job is to make hash-flooding attacks against the
/// string table impractical to construct without observing the running process; the document's
/// actual correctness never depends on the seed's value.
pub fn random_seed() -> u32 {
    let wall = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);

    let mut buf = [0u8; 12];
    buf[0..8].copy_from_slice(&wall.as_nanos().to_le_bytes()[0..8]);
    buf[8..12].copy_from_slice(&sequence.to_le_bytes());

    let clock_hash = murmur3_32(&buf, wall.subsec_nanos());
    murmur3_32(&clock_hash.to_le_bytes(), clock_hash)
}
