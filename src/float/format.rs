use crate::tables::DIGIT_PAIRS;

use super::Decimal;

/**
The longest output of [`format_decimal`].

That's a sign, 21 integer digits, and a `.0` suffix.
*/
pub(super) const MAX_LEN: usize = 32;

/**
The smallest leading digit exponent written in fixed notation.
*/
const MIN_FIXED_EXPONENT: i32 = -4;

/**
The largest leading digit exponent threshold.

Anything above it is treated as this value so fixed notation stays bounded.
*/
const MAX_FIXED_EXPONENT: i32 = 21;

/**
When a number switches from fixed to scientific notation.

Numbers whose leading digit exponent is below `-4` always use scientific notation.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScientificThreshold {
    /**
    Use scientific notation when the leading digit exponent is at least the number of
    significant digits.

    `100.0` becomes `1.0e+02`, but `120.5` stays as it is.
    */
    DigitCount,
    /**
    Use scientific notation when the leading digit exponent is at least this value.

    Values above `21` are treated as `21`.
    */
    Exponent(i32),
}

/**
How doubles are presented by [`format_double_with`](super::format_double_with).

The default writes fixed notation for leading digit exponents in `-4..16` and keeps a `.0`
on integral values, so `100.0` is `100.0` and `1e300` is `1.0e+300`.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FloatFormat {
    pub scientific: ScientificThreshold,
    /**
    Whether integral values keep a `.0` fraction so they read back as floats.
    */
    pub float_suffix: bool,
}

impl FloatFormat {
    pub const DEFAULT: FloatFormat = FloatFormat {
        scientific: ScientificThreshold::Exponent(16),
        float_suffix: true,
    };

    /**
    The most compact presentation.

    `100.0` becomes `1e+02`.
    */
    pub const COMPACT: FloatFormat = FloatFormat {
        scientific: ScientificThreshold::DigitCount,
        float_suffix: false,
    };

    #[inline]
    fn threshold(&self, digit_count: i32) -> i32 {
        match self.scientific {
            ScientificThreshold::DigitCount => digit_count,
            ScientificThreshold::Exponent(exp) => exp.min(MAX_FIXED_EXPONENT),
        }
    }
}

impl Default for FloatFormat {
    fn default() -> Self {
        FloatFormat::DEFAULT
    }
}

/**
Write a decimal into `buf`, returning the number of bytes written.
*/
pub(super) fn format_decimal(decimal: &Decimal, format: &FloatFormat, buf: &mut [u8; MAX_LEN]) -> usize {
    let digits = decimal.digits();
    let n = digits.len() as i32;
    let exp = decimal.exponent();

    let mut w = Writer { buf, len: 0 };

    if decimal.is_negative() {
        w.push(b'-');
    }

    if exp < MIN_FIXED_EXPONENT || exp >= format.threshold(n) {
        // d.ddde±XX
        w.push(digits[0]);

        if n > 1 {
            w.push(b'.');
            w.extend(&digits[1..]);
        } else if format.float_suffix {
            w.extend(b".0");
        }

        w.push(b'e');
        w.push(if exp < 0 { b'-' } else { b'+' });

        let abs = exp.unsigned_abs() as usize;
        if abs >= 100 {
            w.push(b'0' + (abs / 100) as u8);
        }

        let pair = (abs % 100) * 2;
        w.extend(&DIGIT_PAIRS[pair..pair + 2]);
    } else if exp < 0 {
        // 0.000ddd
        w.extend(b"0.");

        for _ in 0..(-exp - 1) {
            w.push(b'0');
        }

        w.extend(digits);
    } else if exp + 1 < n {
        // dd.ddd
        let point = (exp + 1) as usize;

        w.extend(&digits[..point]);
        w.push(b'.');
        w.extend(&digits[point..]);
    } else {
        // ddd00
        w.extend(digits);

        for _ in 0..(exp + 1 - n) {
            w.push(b'0');
        }

        if format.float_suffix {
            w.extend(b".0");
        }
    }

    w.len
}

struct Writer<'a> {
    buf: &'a mut [u8; MAX_LEN],
    len: usize,
}

impl<'a> Writer<'a> {
    #[inline(always)]
    fn push(&mut self, b: u8) {
        self.buf[self.len] = b;
        self.len += 1;
    }

    #[inline(always)]
    fn extend(&mut self, bytes: &[u8]) {
        self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(negative: bool, digits: &[u8], exponent: i32, format: &FloatFormat) -> String {
        let decimal = Decimal::from_digits(negative, digits, exponent);

        let mut buf = [0; MAX_LEN];
        let len = format_decimal(&decimal, format, &mut buf);

        String::from_utf8(buf[..len].to_vec()).unwrap()
    }

    #[test]
    fn fixed_notation() {
        let f = FloatFormat::DEFAULT;

        assert_eq!("0.1", format(false, b"1", -1, &f));
        assert_eq!("0.0001", format(false, b"1", -4, &f));
        assert_eq!("0.00012", format(false, b"12", -4, &f));
        assert_eq!("1.5", format(false, b"15", 0, &f));
        assert_eq!("123.456", format(false, b"123456", 2, &f));
        assert_eq!("100.0", format(false, b"1", 2, &f));
        assert_eq!("-120.0", format(true, b"12", 2, &f));
        assert_eq!("1000000000000000.0", format(false, b"1", 15, &f));
    }

    #[test]
    fn scientific_notation() {
        let f = FloatFormat::DEFAULT;

        assert_eq!("1.0e-05", format(false, b"1", -5, &f));
        assert_eq!("1.5e-05", format(false, b"15", -5, &f));
        assert_eq!("1.0e+16", format(false, b"1", 16, &f));
        assert_eq!("1.0e+300", format(false, b"1", 300, &f));
        assert_eq!("-5.0e-324", format(true, b"5", -324, &f));
        assert_eq!(
            "1.7976931348623157e+308",
            format(false, b"17976931348623157", 308, &f)
        );
    }

    #[test]
    fn digit_count_threshold() {
        let f = FloatFormat {
            scientific: ScientificThreshold::DigitCount,
            float_suffix: true,
        };

        assert_eq!("1.0e+02", format(false, b"1", 2, &f));
        assert_eq!("1.2e+02", format(false, b"12", 2, &f));
        assert_eq!("120.5", format(false, b"1205", 2, &f));
        assert_eq!("5.0", format(false, b"5", 0, &f));
        assert_eq!("0.5", format(false, b"5", -1, &f));
    }

    #[test]
    fn without_float_suffix() {
        let f = FloatFormat {
            scientific: ScientificThreshold::Exponent(16),
            float_suffix: false,
        };

        assert_eq!("100", format(false, b"1", 2, &f));
        assert_eq!("1e+300", format(false, b"1", 300, &f));
        assert_eq!("1.5", format(false, b"15", 0, &f));

        assert_eq!("1e+02", format(false, b"1", 2, &FloatFormat::COMPACT));
    }

    #[test]
    fn large_thresholds_are_clamped() {
        let f = FloatFormat {
            scientific: ScientificThreshold::Exponent(i32::MAX),
            float_suffix: true,
        };

        assert_eq!("100000000000000000000.0", format(false, b"1", 20, &f));
        assert_eq!("1.0e+21", format(false, b"1", 21, &f));
        assert_eq!(
            "-179769313486231570000.0",
            format(true, b"17976931348623157", 20, &f)
        );
    }
}
