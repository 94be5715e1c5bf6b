//! The 3-way (-1/0/+1) comparison convention used throughout this crate and `jsondoc`.

use std::cmp::Ordering;

/// A 3-way comparison result. This mirrors `std::cmp::Ordering` exactly; it exists as a distinct
/// type so call sites that care about the source's `-1/0/+1` convention (tests checking against
/// the original implementation's documented return values, in particular) can assert on it
/// directly via [`Ordering3::as_i8`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Ordering3 {
    /// The left-hand value orders before the right-hand value.
    Less,
    /// The two values are structurally equal.
    Equal,
    /// The left-hand value orders after the right-hand value.
    Greater,
}

impl Ordering3 {
    /// The `-1`/`0`/`+1` integer the source returns from its comparison functions.
    pub fn as_i8(self) -> i8 {
        match self {
            Ordering3::Less => -1,
            Ordering3::Equal => 0,
            Ordering3::Greater => 1,
        }
    }
}

impl From<Ordering> for Ordering3 {
    fn from(o: Ordering) -> Ordering3 {
        match o {
            Ordering::Less => Ordering3::Less,
            Ordering::Equal => Ordering3::Equal,
            Ordering::Greater => Ordering3::Greater,
        }
    }
}

impl From<Ordering3> for Ordering {
    fn from(o: Ordering3) -> Ordering {
        match o {
            Ordering3::Less => Ordering::Less,
            Ordering3::Equal => Ordering::Equal,
            Ordering3::Greater => Ordering::Greater,
        }
    }
}

/// Compares two byte strings lexicographically, with a shorter string that is a prefix of a
/// longer one comparing as less. This is exactly `[u8]`'s own `Ord`, exposed here so callers
/// don't need to import `std::cmp::Ord` just to get an [`Ordering3`].
pub fn compare_bytes(a: &[u8], b: &[u8]) -> Ordering3 {
    Ordering3::from(a.cmp(b))
}

/// Compares two `i64` values numerically.
pub fn compare_i64(a: i64, b: i64) -> Ordering3 {
    Ordering3::from(a.cmp(&b))
}

/// Compares two `f64` values numerically. Per the source, this path is only reached for finite
/// numbers (`Num`/`Int`/`ShortInt` can never hold NaN or infinity), so total ordering via
/// `partial_cmp` is always available; a `NaN` input (which cannot arise from a parsed or
/// `Document`-built value) is treated as incomparable-greater rather than panicking.
pub fn compare_f64(a: f64, b: f64) -> Ordering3 {
    match a.partial_cmp(&b) {
        Some(o) => Ordering3::from(o),
        None => Ordering3::Greater,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_prefix_is_less() {
        assert_eq!(compare_bytes(b"ab", b"abc"), Ordering3::Less);
        assert_eq!(compare_bytes(b"abc", b"ab"), Ordering3::Greater);
        assert_eq!(compare_bytes(b"abc", b"abc"), Ordering3::Equal);
    }

    #[test]
    fn as_i8_matches_source_convention() {
        assert_eq!(Ordering3::Less.as_i8(), -1);
        assert_eq!(Ordering3::Equal.as_i8(), 0);
        assert_eq!(Ordering3::Greater.as_i8(), 1);
    }

    #[test]
    fn f64_numeric_compare() {
        assert_eq!(compare_f64(1.0, 2.0), Ordering3::Less);
        assert_eq!(compare_f64(2.0, 1.0), Ordering3::Greater);
        assert_eq!(compare_f64(1.5, 1.5), Ordering3::Equal);
    }
}
