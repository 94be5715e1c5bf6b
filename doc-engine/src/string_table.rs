//! The interned string table: an open-addressed, prime-bucketed hash index over a growable pool
//! of strings, with small-buffer inlining for short strings.

use crate::growth::grow_capacity;
use crate::memory::ArenaMemory;
use crate::murmur::murmur3_32;
use crate::seed::random_seed;
use smallvec::SmallVec;
use std::mem::size_of;

/// Only the first 32 bytes of a string are hashed, matching `jstr_hash`'s documented limit.
const HASHED_PREFIX_LEN: usize = 32;

/// Strings up to this length are stored inline inside [`InternedString`] rather than on the heap.
const INLINE_STRING_LEN: usize = 6;

/// Above this load factor (non-empty buckets / bucket count) the table is rehashed.
const MAX_LOAD_FACTOR: f64 = 0.8;

/// Target load factor after a rehash.
const IDEAL_LOAD_FACTOR: f64 = 0.3;

/// The smallest bucket count the table will ever allocate (also the smallest prime the `6k±1`
/// sieve needs to special-case).
const MIN_BUCKETS: u32 = 13;

/// An index into a [`StringTable`]'s backing store. Identical in representation to the `u32`
/// index carried by a `Tag::Str` [`crate::RawValue`].
pub type StringHandle = u32;

/// An interned string: its MurmurHash3 hash (computed once, reused by lookups and rehashing) and
/// its bytes, stored inline for short strings and on the heap beyond [`INLINE_STRING_LEN`] bytes.
#[derive(Debug, Clone)]
pub struct InternedString {
    hash: u32,
    bytes: SmallVec<[u8; INLINE_STRING_LEN]>,
}

impl InternedString {
    /// The string's precomputed hash.
    pub fn hash(&self) -> u32 {
        self.hash
    }

    /// The string's bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The string's length, in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if the string is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Returns true if `n` is prime, via a `6k±1` trial-division sieve.
fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i: u64 = 5;
    let n = n as u64;
    while i * i <= n {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// Returns the smallest prime `>= n`.
fn next_prime(mut n: u32) -> u32 {
    if n <= 2 {
        return 2;
    }
    if n % 2 == 0 {
        n += 1;
    }
    while !is_prime(n) {
        n += 2;
    }
    n
}

/// Interned strings plus an open-addressed hash index of bucketed string indices.
///
/// Every `StringTable` is seeded once at construction (see [`random_seed`]); identical bytes
/// inserted into the same table always hash identically, but hashes are not comparable across two
/// different `StringTable`s (or two different `Document`s).
#[derive(Debug)]
pub struct StringTable {
    seed: u32,
    strings: Vec<InternedString>,
    buckets: Vec<SmallVec<[StringHandle; 1]>>,
    non_empty_buckets: usize,
}

impl Default for StringTable {
    fn default() -> Self {
        Self::new()
    }
}

impl StringTable {
    /// Creates an empty table with a freshly derived per-table seed and no buckets allocated.
    pub fn new() -> Self {
        StringTable {
            seed: random_seed(),
            strings: Vec::new(),
            buckets: Vec::new(),
            non_empty_buckets: 0,
        }
    }

    /// The per-table hash seed. Exposed for tests that need to reproduce a hash independently.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Number of interned strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// True if no strings have been interned.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Current bucket count. Always `0` (empty table) or prime.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Current load factor: non-empty buckets divided by bucket count, or `0.0` when the table
    /// has no buckets allocated.
    pub fn load_factor(&self) -> f64 {
        if self.buckets.is_empty() {
            0.0
        } else {
            self.non_empty_buckets as f64 / self.buckets.len() as f64
        }
    }

    /// Retrieves a previously interned string's bytes by handle.
    pub fn get(&self, handle: StringHandle) -> Option<&[u8]> {
        self.strings.get(handle as usize).map(|s| s.bytes())
    }

    /// Retrieves a previously interned string's precomputed hash by handle.
    pub fn get_hash(&self, handle: StringHandle) -> Option<u32> {
        self.strings.get(handle as usize).map(|s| s.hash())
    }

    fn hash_of(&self, bytes: &[u8]) -> u32 {
        let prefix = &bytes[..bytes.len().min(HASHED_PREFIX_LEN)];
        murmur3_32(prefix, self.seed)
    }

    fn find_hash(&self, hash: u32, bytes: &[u8]) -> Option<StringHandle> {
        if self.buckets.is_empty() {
            return None;
        }
        let bucket_index = (hash % self.buckets.len() as u32) as usize;
        for &candidate in &self.buckets[bucket_index] {
            let s = &self.strings[candidate as usize];
            if s.hash == hash && s.bytes() == bytes {
                return Some(candidate);
            }
        }
        None
    }

    /// Looks up `bytes` without inserting. Returns `None` if the table is empty or no entry
    /// matches on hash, length, and bytes.
    pub fn lookup(&self, bytes: &[u8]) -> Option<StringHandle> {
        let hash = self.hash_of(bytes);
        self.find_hash(hash, bytes)
    }

    /// Interns `bytes`, returning the existing handle on a match or inserting a new entry.
    pub fn intern(&mut self, bytes: &[u8]) -> StringHandle {
        let hash = self.hash_of(bytes);
        if let Some(existing) = self.find_hash(hash, bytes) {
            return existing;
        }

        self.maybe_rehash();

        let inline: SmallVec<[u8; INLINE_STRING_LEN]> = SmallVec::from_slice(bytes);
        let index = self.strings.len() as u32;
        if self.strings.len() == self.strings.capacity() {
            let new_cap = grow_capacity(self.strings.capacity(), self.strings.len() + 1);
            self.strings.reserve_exact(new_cap - self.strings.len());
        }
        self.strings.push(InternedString { hash, bytes: inline });

        self.add_to_bucket(hash, index);
        index
    }

    fn add_to_bucket(&mut self, hash: u32, index: StringHandle) {
        let bucket_index = (hash % self.buckets.len() as u32) as usize;
        let bucket = &mut self.buckets[bucket_index];
        if bucket.is_empty() {
            self.non_empty_buckets += 1;
        }
        if bucket.len() == bucket.capacity() {
            let new_cap = grow_capacity(bucket.capacity(), bucket.len() + 1);
            bucket.reserve_exact(new_cap - bucket.len());
        }
        bucket.push(index);
    }

    /// Rehashes so that `bucket_count == 0` (empty table) or `bucket_count` is prime and, per
    /// §9's resolved open question, skips the load-factor check entirely when `bucket_count == 0`
    /// rather than treating it as "infinite load".
    fn maybe_rehash(&mut self) {
        let bcap = self.buckets.len() as u32;
        if bcap == 0 {
            self.rehash_to(next_prime(MIN_BUCKETS));
            return;
        }

        let load = self.non_empty_buckets as f64 / bcap as f64;
        if load <= MAX_LOAD_FACTOR {
            return;
        }

        let target = next_prime((bcap as f64 / IDEAL_LOAD_FACTOR).ceil() as u32);
        let new_bcap = target.max(next_prime(MIN_BUCKETS)).max(bcap + 1);
        self.rehash_to(new_bcap);
    }

    fn rehash_to(&mut self, new_bucket_count: u32) {
        tracing::warn!(
            old_bucket_count = self.buckets.len(),
            new_bucket_count,
            strings = self.strings.len(),
            "string table rehash"
        );

        let mut new_buckets: Vec<SmallVec<[StringHandle; 1]>> =
            (0..new_bucket_count).map(|_| SmallVec::new()).collect();
        let mut non_empty = 0usize;
        for (index, s) in self.strings.iter().enumerate() {
            let bucket_index = (s.hash % new_bucket_count) as usize;
            if new_buckets[bucket_index].is_empty() {
                non_empty += 1;
            }
            new_buckets[bucket_index].push(index as StringHandle);
        }

        self.buckets = new_buckets;
        self.non_empty_buckets = non_empty;
    }

    /// Memory usage of the string pool and its bucket index, including spilled small-buffer heap
    /// allocations on both strings and buckets.
    pub fn memory(&self) -> ArenaMemory {
        let mut used = self.strings.len() * size_of::<InternedString>();
        let mut reserved = self.strings.capacity() * size_of::<InternedString>();
        for s in &self.strings {
            if s.bytes.spilled() {
                used += s.bytes.len();
                reserved += s.bytes.capacity();
            }
        }

        used += self.buckets.len() * size_of::<SmallVec<[StringHandle; 1]>>();
        reserved += self.buckets.capacity() * size_of::<SmallVec<[StringHandle; 1]>>();
        for b in &self.buckets {
            if b.spilled() {
                used += b.len() * size_of::<StringHandle>();
                reserved += b.capacity() * size_of::<StringHandle>();
            }
        }

        ArenaMemory { used, reserved }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_lookup_returns_same_handle() {
        let mut t = StringTable::new();
        let h = t.intern(b"hello");
        assert_eq!(t.lookup(b"hello"), Some(h));
    }

    #[test]
    fn duplicate_inserts_share_a_handle() {
        let mut t = StringTable::new();
        let a = t.intern(b"repeat me");
        let b = t.intern(b"repeat me");
        assert_eq!(a, b);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn distinct_strings_get_distinct_handles() {
        let mut t = StringTable::new();
        let a = t.intern(b"alpha");
        let b = t.intern(b"beta");
        assert_ne!(a, b);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn lookup_of_absent_key_in_empty_table_is_none() {
        let t = StringTable::new();
        assert_eq!(t.lookup(b"nope"), None);
    }

    #[test]
    fn bucket_count_is_always_zero_or_prime() {
        let mut t = StringTable::new();
        assert_eq!(t.bucket_count(), 0);
        for i in 0..2000 {
            t.intern(format!("key-{i}").as_bytes());
            let bc = t.bucket_count() as u32;
            assert!(bc == 0 || is_prime(bc), "bucket count {bc} is not prime");
        }
    }

    #[test]
    fn load_factor_never_exceeds_max_after_insert() {
        let mut t = StringTable::new();
        for i in 0..5000 {
            t.intern(format!("k{i}").as_bytes());
            assert!(t.load_factor() <= MAX_LOAD_FACTOR + f64::EPSILON);
        }
    }

    #[test]
    fn strings_len_matches_unique_insert_count() {
        let mut t = StringTable::new();
        let mut unique = std::collections::HashSet::new();
        for i in 0..500 {
            let key = format!("dup-{}", i % 50);
            t.intern(key.as_bytes());
            unique.insert(key);
        }
        assert_eq!(t.len(), unique.len());
    }

    #[test]
    fn long_strings_spill_to_heap_short_strings_stay_inline() {
        let mut t = StringTable::new();
        let short = t.intern(b"abcdef");
        let long = t.intern(b"abcdefg-this-is-definitely-longer-than-six-bytes");
        assert_eq!(t.strings[short as usize].bytes.spilled(), false);
        assert_eq!(t.strings[long as usize].bytes.spilled(), true);
    }

    #[test]
    fn hash_only_covers_first_32_bytes() {
        let mut t = StringTable::new();
        let prefix = "x".repeat(32);
        let a = format!("{prefix}AAAA");
        let b = format!("{prefix}BBBB");
        // Hashes collide by construction, but bytes differ, so both still intern distinctly.
        assert_eq!(t.hash_of(a.as_bytes()), t.hash_of(b.as_bytes()));
        let ia = t.intern(a.as_bytes());
        let ib = t.intern(b.as_bytes());
        assert_ne!(ia, ib);
    }

    #[test]
    fn is_prime_matches_known_values() {
        for p in [2, 3, 5, 7, 11, 13, 17, 19, 23, 29] {
            assert!(is_prime(p), "{p} should be prime");
        }
        for c in [0, 1, 4, 6, 8, 9, 10, 12, 15, 21, 25, 27] {
            assert!(!is_prime(c), "{c} should not be prime");
        }
    }

    #[test]
    fn next_prime_rounds_up() {
        assert_eq!(next_prime(13), 13);
        assert_eq!(next_prime(14), 17);
        assert_eq!(next_prime(1), 2);
    }
}
