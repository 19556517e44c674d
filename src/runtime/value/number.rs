//! Heap-allocated numbers
//!
//! Only classification and printed representation live here; arithmetic is
//! the numeric tower's business.

use num_bigint::BigInt;

/// Non-immediate number
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    /// Integer outside the immediate range
    Integer(BigInt),
    /// Double-precision float
    Flonum(f64),
    /// Exact rational `numerator/denominator`, denominator > 1
    Ratnum(BigInt, BigInt),
    /// Complex number with flonum parts
    Compnum(f64, f64),
}

impl Number {
    /// Check whether this number has an integral value
    pub fn is_integer(&self) -> bool {
        match self {
            Number::Integer(_) => true,
            Number::Flonum(f) => f.is_finite() && f.fract() == 0.0,
            Number::Ratnum(..) | Number::Compnum(..) => false,
        }
    }

    /// Exact integer value, converting integral flonums
    pub fn to_exact_integer(&self) -> Option<BigInt> {
        match self {
            Number::Integer(n) => Some(n.clone()),
            Number::Flonum(f) if self.is_integer() => format!("{:.0}", f).parse().ok(),
            _ => None,
        }
    }

    /// Textual representation in the given radix.
    ///
    /// Flonums and complex numbers are always printed in radix 10.
    pub fn to_string_radix(
        &self,
        radix: u32,
        upper: bool,
    ) -> String {
        let s = match self {
            Number::Integer(n) => n.to_str_radix(radix),
            Number::Flonum(f) => flonum_to_string(*f),
            Number::Ratnum(n, d) => format!("{}/{}", n.to_str_radix(radix), d.to_str_radix(radix)),
            Number::Compnum(re, im) => {
                let imag = flonum_to_string(*im);
                if imag.starts_with('-') || imag.starts_with('+') {
                    format!("{}{}i", flonum_to_string(*re), imag)
                } else {
                    format!("{}+{}i", flonum_to_string(*re), imag)
                }
            }
        };
        if upper {
            s.to_uppercase()
        } else {
            s
        }
    }
}

/// Flonums always carry a decimal point or an exponent so they read back
/// as inexact.
pub(crate) fn flonum_to_string(f: f64) -> String {
    if f.is_nan() {
        return "+nan.0".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "+inf.0" } else { "-inf.0" }.to_string();
    }
    let s = format!("{:?}", f);
    match s.find('e') {
        Some(pos) if !s[..pos].contains('.') => format!("{}.0{}", &s[..pos], &s[pos..]),
        Some(_) => s,
        None if s.contains('.') => s,
        None => format!("{}.0", s),
    }
}
