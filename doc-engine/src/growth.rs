//! The golden-ratio growth policy shared by every arena and small-buffer-optimized collection.

/// Capacities never grow in a single step by more than this many elements.
const MAX_GROWTH_STEP: usize = 32 * 1024 * 1024;

/// The smallest capacity any growth step will allocate.
const MIN_ALLOC: usize = 13;

/// Golden ratio; empirically chosen by the source to keep reallocation frequency low without
/// over-allocating for small documents.
const GROWTH_FACTOR: f64 = 1.618_033_988_749_895;

/// Computes the next capacity to allocate given a current capacity and a minimum number of
/// elements that must fit.
///
/// `new capacity = max(max(MIN_ALLOC, requested), min(cap * phi + 2, cap + MAX_GROWTH_STEP))`
pub fn grow_capacity(cap: usize, requested: usize) -> usize {
    let exponential = ((cap as f64) * GROWTH_FACTOR) as usize + 2;
    let bounded = exponential.min(cap.saturating_add(MAX_GROWTH_STEP));
    requested.max(MIN_ALLOC).max(bounded)
}
