//! RFC 8259 number parsing, tracking the original's `parse_num` from
//! `original_source/src/json.c`: digits accumulate into a 64-bit decimal with only the first 18
//! contributing to the value (the rest widen the exponent), and the sign/fraction/exponent are
//! combined via repeated-squaring powers of ten.

use crate::error::{ParseError, ParseErrorKind};
use crate::parser::cursor::Cursor;
use crate::parser::source::ByteSource;

/// Largest exponent magnitude accepted before the number is rejected, matching the source's
/// `MAX_EXP`. Per §9's resolved open question this bound is enforced in both directions (the
/// source silently underflows a too-negative exponent to zero instead of erroring).
const MAX_EXP: i64 = 511;

/// `10^(2^i)` for `i` in `0..9`, used to compute `10^exp` by repeated squaring (`exp` fits in 9
/// bits once bounded by [`MAX_EXP`]), matching the source's `jpow10`.
const POW10: [f64; 9] = [
    10., 100., 1.0e4, 1.0e8, 1.0e16, 1.0e32, 1.0e64, 1.0e128, 1.0e256,
];

fn pow10(mut exp: u32) -> f64 {
    let mut result = 1.0;
    let mut i = 0;
    while exp != 0 {
        if exp & 1 != 0 {
            result *= POW10[i];
        }
        exp >>= 1;
        i += 1;
    }
    result
}

/// The result of parsing one JSON number token.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ParsedNumber {
    /// No fractional part and no effective exponent.
    Int(i64),
    /// Has a fractional part, an exponent, or more than 18 significant whole digits.
    Float(f64),
}

fn digit_value(b: u8) -> Option<u64> {
    if b.is_ascii_digit() {
        Some((b - b'0') as u64)
    } else {
        None
    }
}

/// Consumes a run of ASCII digits. Only the first 18 accumulate into the returned value; any
/// further digits are still counted (so the caller can tell how many digits were seen) but do not
/// affect the magnitude, matching the source's `parse_digits`.
fn parse_digits<S: ByteSource>(cur: &mut Cursor<S>) -> Result<(u64, usize), ParseError> {
    let mut value: u64 = 0;
    let mut count = 0usize;
    while count < 18 {
        match cur.peek().and_then(digit_value) {
            Some(d) => {
                value = value * 10 + d;
                count += 1;
                cur.advance()?;
            }
            None => return Ok((value, count)),
        }
    }
    while cur.peek().and_then(digit_value).is_some() {
        count += 1;
        cur.advance()?;
    }
    Ok((value, count))
}

/// Parses one JSON number, starting at an optional `-` or a digit.
///
/// Per §9's resolved open question, only `-` is accepted as a leading sign (RFC 8259 forbids a
/// leading `+`); `+` and `-` are both accepted after `e`/`E`.
pub fn parse_number<S: ByteSource>(cur: &mut Cursor<S>) -> Result<ParsedNumber, ParseError> {
    let start = cur.mark();

    let negative = if cur.peek() == Some(b'-') {
        cur.advance()?;
        true
    } else {
        false
    };

    let first_digit = cur.peek();
    let (dec, ndigits) = parse_digits(cur)?;
    if ndigits == 0 {
        return Err(cur.err(ParseErrorKind::TruncatedNumber, "expected a digit", start));
    }
    if ndigits > 1 && first_digit == Some(b'0') {
        return Err(cur.err(ParseErrorKind::LeadingZero, "number has a leading zero", start));
    }

    // The digit-overflow contribution (from significant digits past the 18th) always widens the
    // exponent in the positive direction; only an explicit `e`/`E` exponent can carry a sign. Both
    // magnitudes accumulate unsigned and a single direction is applied to their sum at the end,
    // matching the source's `exp += (int)e` followed by one `expsign` application, rather than
    // summing independently-signed terms.
    let digit_overflow_exp: i64 = if ndigits > 18 { (ndigits - 18) as i64 } else { 0 };

    let (fract, fexp) = if cur.peek() == Some(b'.') {
        cur.advance()?;
        let (fract, n) = parse_digits(cur)?;
        if n == 0 {
            return Err(cur.err(ParseErrorKind::TruncatedNumber, "number truncated after '.'", start));
        }
        (fract, n as i64)
    } else {
        (0u64, 0i64)
    };

    let mut exp_negative = false;
    let mut explicit_exp: i64 = 0;
    if matches!(cur.peek(), Some(b'e') | Some(b'E')) {
        cur.advance()?;
        exp_negative = match cur.peek() {
            Some(b'-') => {
                cur.advance()?;
                true
            }
            Some(b'+') => {
                cur.advance()?;
                false
            }
            _ => false,
        };
        let (e, en) = parse_digits(cur)?;
        if en == 0 {
            return Err(cur.err(ParseErrorKind::TruncatedNumber, "number truncated after exponent", start));
        }
        explicit_exp = e as i64;
    }

    let magnitude = digit_overflow_exp + explicit_exp;
    let exp: i64 = if exp_negative { -magnitude } else { magnitude };

    if exp.abs() > MAX_EXP {
        return Err(cur.err(ParseErrorKind::ExponentOverflow, "exponent magnitude exceeds 511", start));
    }

    if exp == 0 && fexp == 0 {
        let n = dec as i64;
        return Ok(ParsedNumber::Int(if negative { -n } else { n }));
    }

    let num = if exp < 0 {
        let magnitude = (-exp) as u32;
        (dec as f64 + fract as f64 / pow10(fexp as u32)) / pow10(magnitude)
    } else if exp > 0 {
        let magnitude = exp as u32;
        let frac_term = if exp > fexp {
            fract as f64 * pow10((exp - fexp) as u32)
        } else {
            fract as f64 / pow10((fexp - exp) as u32)
        };
        dec as f64 * pow10(magnitude) + frac_term
    } else {
        dec as f64 + fract as f64 / pow10(fexp as u32)
    };

    let num = if negative { -num } else { num };
    if !num.is_finite() {
        return Err(cur.err(ParseErrorKind::NonFiniteNumber, "number is not finite", start));
    }
    Ok(ParsedNumber::Float(num))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<ParsedNumber, ParseError> {
        let mut cur = Cursor::new(s.as_bytes(), "<test>".into()).unwrap();
        parse_number(&mut cur)
    }

    #[test]
    fn zero_and_negative_zero() {
        assert_eq!(parse("0").unwrap(), ParsedNumber::Int(0));
        assert_eq!(parse("-0").unwrap(), ParsedNumber::Int(0));
    }

    #[test]
    fn plain_integers() {
        assert_eq!(parse("42").unwrap(), ParsedNumber::Int(42));
        assert_eq!(parse("-42").unwrap(), ParsedNumber::Int(-42));
    }

    #[test]
    fn scientific_notation_without_fraction_is_num() {
        assert_eq!(parse("1e2").unwrap(), ParsedNumber::Float(100.0));
    }

    #[test]
    fn fraction_is_num() {
        assert_eq!(parse("1.5").unwrap(), ParsedNumber::Float(1.5));
    }

    #[test]
    fn exponent_of_zero_stays_integer() {
        assert_eq!(parse("1e0").unwrap(), ParsedNumber::Int(1));
    }

    #[test]
    fn leading_zero_rejected() {
        let err = parse("01").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::LeadingZero);
    }

    #[test]
    fn single_zero_whole_part_is_fine() {
        assert_eq!(parse("0.5").unwrap(), ParsedNumber::Float(0.5));
    }

    #[test]
    fn truncated_fraction_rejected() {
        let err = parse("1.").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TruncatedNumber);
    }

    #[test]
    fn truncated_exponent_rejected() {
        let err = parse("1e").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TruncatedNumber);
    }

    #[test]
    fn huge_exponent_overflows_to_non_finite() {
        let err = parse("1e400").unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::NonFiniteNumber | ParseErrorKind::ExponentOverflow
        ));
    }

    #[test]
    fn exponent_magnitude_over_511_is_rejected_outright() {
        let err = parse("1e600").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExponentOverflow);
    }

    #[test]
    fn plus_sign_on_mantissa_is_rejected() {
        // '+' is not a recognized start of a number at all; the caller's value dispatch would
        // never call into parse_number for it, but parse_digits itself also won't consume it.
        let mut cur = Cursor::new(b"+1".as_slice(), "<test>".into()).unwrap();
        let (_, ndigits) = parse_digits(&mut cur).unwrap();
        assert_eq!(ndigits, 0);
    }

    #[test]
    fn more_than_eighteen_digits_promotes_to_float() {
        assert!(matches!(parse("1234567890123456789").unwrap(), ParsedNumber::Float(_)));
    }

    #[test]
    fn digit_overflow_and_explicit_exponent_combine_by_magnitude_not_by_sign() {
        // 19 significant digits contribute a digit-overflow exponent of +1; combined with an
        // explicit `e-1`, the magnitudes must add to 2 (then negated), not cancel to 0. Only the
        // first 18 digits ever accumulate into `dec`, so the expected value is that truncated
        // mantissa scaled by 10^-2, not the full 19-digit integer scaled by 10^-1.
        let n = match parse("1234567890123456789e-1").unwrap() {
            ParsedNumber::Float(n) => n,
            other => panic!("expected Float, got {other:?}"),
        };
        assert_eq!(n, 123456789012345678f64 / 100.0);
    }
}
