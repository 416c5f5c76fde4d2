/*!
Converting doubles into their shortest round-tripping decimal form.

A double is decomposed into its sign, exponent, and significand. Finite values get the
fewest decimal digits that parse back to exactly the same bits, and those digits are then
written in fixed or scientific notation according to a [`FloatFormat`]. NaN and the
infinities have no decimal form and are written as `NaN`, `Infinity`, and `-Infinity`.

Every 64bit pattern produces some output, there are no errors.
*/

use std::fmt;

use crate::{sink::Sink, tables::DIGIT_PAIRS};

mod format;
mod ryu;
mod tables;

pub use self::format::{FloatFormat, ScientificThreshold};

const MANTISSA_BITS: u32 = 52;
const EXPONENT_BITS: u32 = 11;
const EXPONENT_BIAS: i32 = 1023;

const MANTISSA_MASK: u64 = (1 << MANTISSA_BITS) - 1;
const EXPONENT_MASK: u32 = (1 << EXPONENT_BITS) - 1;

/**
The fields of an IEEE-754 double.
*/
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Double {
    bits: u64,
}

impl Double {
    #[inline]
    pub const fn from_f64(value: f64) -> Self {
        Double {
            bits: value.to_bits(),
        }
    }

    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Double { bits }
    }

    #[inline]
    pub const fn to_bits(self) -> u64 {
        self.bits
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.bits >> (MANTISSA_BITS + EXPONENT_BITS) != 0
    }

    /**
    The raw 11 bit exponent field.
    */
    #[inline]
    pub const fn biased_exponent(self) -> u32 {
        (self.bits >> MANTISSA_BITS) as u32 & EXPONENT_MASK
    }

    /**
    The raw 52 bit mantissa field, without the implicit leading bit.
    */
    #[inline]
    pub const fn mantissa(self) -> u64 {
        self.bits & MANTISSA_MASK
    }

    /**
    The 53 bit significand.

    The implicit leading bit is restored for normal values. Subnormals don't have one.
    */
    #[inline]
    pub const fn significand(self) -> u64 {
        if self.biased_exponent() == 0 {
            self.mantissa()
        } else {
            self.mantissa() | (1 << MANTISSA_BITS)
        }
    }

    /**
    The unbiased binary exponent, where the value is `significand * 2^exponent`.
    */
    #[inline]
    pub const fn exponent(self) -> i32 {
        // subnormals share the exponent of the smallest normal
        let biased = if self.biased_exponent() == 0 {
            1
        } else {
            self.biased_exponent() as i32
        };

        biased - EXPONENT_BIAS - MANTISSA_BITS as i32
    }

    #[inline]
    pub const fn is_nan(self) -> bool {
        self.biased_exponent() == EXPONENT_MASK && self.mantissa() != 0
    }

    #[inline]
    pub const fn is_infinite(self) -> bool {
        self.biased_exponent() == EXPONENT_MASK && self.mantissa() == 0
    }

    #[inline]
    pub const fn is_finite(self) -> bool {
        self.biased_exponent() != EXPONENT_MASK
    }

    /**
    Whether the value is `0.0` or `-0.0`.
    */
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.bits << 1 == 0
    }

    #[inline]
    pub const fn is_subnormal(self) -> bool {
        self.biased_exponent() == 0 && self.mantissa() != 0
    }
}

impl fmt::Debug for Double {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Double")
            .field("negative", &self.is_negative())
            .field("biased_exponent", &self.biased_exponent())
            .field("mantissa", &self.mantissa())
            .finish()
    }
}

/**
The maximum number of significant digits needed to round-trip a double.
*/
const MAX_DIGITS: usize = 17;

/**
A finite double as a sign, a string of significant digits, and the exponent of the first digit.

The value is `0.d1d2d3... * 10^(exponent + 1)`, or `d1.d2d3... * 10^exponent`.
*/
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    negative: bool,
    digits: [u8; MAX_DIGITS],
    len: u8,
    exponent: i32,
}

impl Decimal {
    /**
    The ASCII significant digits.

    There are no leading zeros, unless the value is zero, which is just `0`.
    */
    #[inline]
    pub fn digits(&self) -> &[u8] {
        &self.digits[..self.len as usize]
    }

    /**
    The decimal exponent of the first digit.
    */
    #[inline]
    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    fn zero(negative: bool) -> Self {
        let mut digits = [0; MAX_DIGITS];
        digits[0] = b'0';

        Decimal {
            negative,
            digits,
            len: 1,
            exponent: 0,
        }
    }

    /**
    A decimal for `mantissa * 10^exponent`, where `exponent` is for the last digit.
    */
    fn from_parts(negative: bool, mut mantissa: u64, exponent: i32) -> Self {
        let len = decimal_length(mantissa);

        let mut digits = [0; MAX_DIGITS];

        // digits are written backwards, two at a time
        let mut i = len;
        while mantissa >= 100 {
            let pair = ((mantissa % 100) * 2) as usize;
            mantissa /= 100;

            digits[i - 2..i].copy_from_slice(&DIGIT_PAIRS[pair..pair + 2]);
            i -= 2;
        }

        if mantissa >= 10 {
            test_assert_eq!(2, i);

            let pair = (mantissa * 2) as usize;
            digits[..2].copy_from_slice(&DIGIT_PAIRS[pair..pair + 2]);
        } else {
            test_assert_eq!(1, i);

            digits[0] = b'0' + mantissa as u8;
        }

        Decimal {
            negative,
            digits,
            len: len as u8,
            exponent: exponent + len as i32 - 1,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_digits(negative: bool, digits: &[u8], exponent: i32) -> Self {
        let mut buf = [0; MAX_DIGITS];
        buf[..digits.len()].copy_from_slice(digits);

        Decimal {
            negative,
            digits: buf,
            len: digits.len() as u8,
            exponent,
        }
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Decimal")
            .field("negative", &self.negative)
            .field("digits", &String::from_utf8_lossy(self.digits()))
            .field("exponent", &self.exponent)
            .finish()
    }
}

/**
The number of decimal digits in `v`, which must be less than `10^17`.
*/
#[inline]
fn decimal_length(v: u64) -> usize {
    test_assert!(v < 100_000_000_000_000_000);

    let mut len = 1;
    let mut pow10 = 10;
    while len < MAX_DIGITS && v >= pow10 {
        len += 1;
        pow10 *= 10;
    }

    len
}

/**
The shortest decimal that parses back to exactly `value`.

NaN and the infinities don't have one.
*/
pub fn shortest_decimal(value: f64) -> Option<Decimal> {
    let double = Double::from_f64(value);

    if !double.is_finite() {
        return None;
    }

    Some(finite_decimal(double))
}

#[inline]
fn finite_decimal(double: Double) -> Decimal {
    if double.is_zero() {
        return Decimal::zero(double.is_negative());
    }

    let decimal = ryu::d2d(double);

    Decimal::from_parts(double.is_negative(), decimal.mantissa, decimal.exponent)
}

/**
Write a double into a sink using the given format.

The output is written with a single call to [`Sink::write_bytes`].
*/
pub fn write_double<S: Sink>(value: f64, format: &FloatFormat, sink: &mut S) -> Result<(), S::Error> {
    let double = Double::from_f64(value);

    if double.is_nan() {
        return sink.write_bytes(b"NaN");
    }

    if double.is_infinite() {
        return sink.write_bytes(if double.is_negative() {
            b"-Infinity"
        } else {
            b"Infinity"
        });
    }

    let decimal = finite_decimal(double);

    let mut buf = [0; format::MAX_LEN];
    let len = format::format_decimal(&decimal, format, &mut buf);

    sink.write_bytes(&buf[..len])
}

/**
Format a double using the given format.
*/
pub fn format_double_with(value: f64, format: &FloatFormat) -> String {
    let mut formatted = Vec::with_capacity(format::MAX_LEN);

    match write_double(value, format, &mut formatted) {
        Ok(()) => (),
        Err(never) => match never {},
    }

    owned_from_utf8_unchecked!(formatted)
}

/**
Format a double using the default [`FloatFormat`].

```
use squirrel_encode::format_double;

assert_eq!("0.1", format_double(0.1));
assert_eq!("100.0", format_double(100.0));
assert_eq!("1.0e+300", format_double(1e300));
assert_eq!("-Infinity", format_double(f64::NEG_INFINITY));
```
*/
#[inline]
pub fn format_double(value: f64) -> String {
    format_double_with(value, &FloatFormat::DEFAULT)
}
