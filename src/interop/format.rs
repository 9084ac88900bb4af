//! Floating point rendering
//!
//! Matches a default-configured output stream: `%g` with a fixed number of
//! significant digits, trailing zeros dropped, two-digit signed exponents.

use core::fmt::{self, Write};

/// Write `value` in general notation with `precision` significant digits
pub fn write_general<W: Write>(out: &mut W, value: f64, precision: usize) -> fmt::Result {
    if value.is_nan() {
        return out.write_str(if value.is_sign_negative() { "-nan" } else { "nan" });
    }
    if value.is_infinite() {
        return out.write_str(if value < 0.0 { "-inf" } else { "inf" });
    }
    if value == 0.0 {
        return out.write_str(if value.is_sign_negative() { "-0" } else { "0" });
    }

    let precision = precision.max(1);

    // Round once in scientific form to learn the decimal exponent after rounding
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(out, "{}e{}{:02}", trim_fraction(mantissa), sign, exponent.unsigned_abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        let fixed = format!("{:.*}", decimals, value);
        out.write_str(trim_fraction(&fixed))
    }
}

/// `write_general` into a fresh string
pub fn format_general(value: f64, precision: usize) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_general(&mut out, value, precision);
    out
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}
