/*!
Shortest decimal digit generation for finite, non-zero doubles.

The bounds halfway between a double and its two neighbors are scaled by a power of five
with 128bit precision, then decimal digits are removed from all three until the interval
between the bounds can't shrink any further. What's left is the shortest digit string
that parses back to the same double.
*/

use super::{
    tables::{
        log10_pow2, log10_pow5, pow5bits, POW5_BITCOUNT, POW5_INV_BITCOUNT, POW5_INV_SPLIT,
        POW5_SPLIT,
    },
    Double,
};

/**
A decimal `mantissa * 10^exponent`.

The exponent is for the last digit of the mantissa, not the first.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct FloatingDecimal {
    pub(super) mantissa: u64,
    pub(super) exponent: i32,
}

pub(super) fn d2d(double: Double) -> FloatingDecimal {
    test_assert!(double.is_finite() && !double.is_zero());

    // two extra bits of precision for the halfway bounds
    let e2 = double.exponent() - 2;
    let m2 = double.significand();

    let accept_bounds = m2 & 1 == 0;

    let mv = 4 * m2;
    // the lower neighbor is closer when the significand is a power of two
    // unless it's also the smallest normal or a subnormal
    let mm_shift = (double.mantissa() != 0 || double.biased_exponent() <= 1) as u64;

    let mut vr;
    let mut vp;
    let mut vm;
    let e10;

    let mut vm_is_trailing_zeros = false;
    let mut vr_is_trailing_zeros = false;

    if e2 >= 0 {
        let q = log10_pow2(e2) - (e2 > 3) as u32;
        e10 = q as i32;

        let k = POW5_INV_BITCOUNT + pow5bits(q as i32) - 1;
        let i = (-e2 + q as i32 + k) as u32;

        let mul = get_unchecked!(POW5_INV_SPLIT, q as usize);

        vr = mul_shift_64(mv, *mul, i);
        vp = mul_shift_64(mv + 2, *mul, i);
        vm = mul_shift_64(mv - 1 - mm_shift, *mul, i);

        // only one of mp, mv, and mm can be a multiple of 5, if any
        if q <= 21 {
            if mv % 5 == 0 {
                vr_is_trailing_zeros = multiple_of_power_of_5(mv, q);
            } else if accept_bounds {
                vm_is_trailing_zeros = multiple_of_power_of_5(mv - 1 - mm_shift, q);
            } else {
                vp -= multiple_of_power_of_5(mv + 2, q) as u64;
            }
        }
    } else {
        let q = log10_pow5(-e2) - (-e2 > 1) as u32;
        e10 = q as i32 + e2;

        let i = -e2 - q as i32;
        let k = pow5bits(i) - POW5_BITCOUNT;
        let j = (q as i32 - k) as u32;

        let mul = get_unchecked!(POW5_SPLIT, i as usize);

        vr = mul_shift_64(mv, *mul, j);
        vp = mul_shift_64(mv + 2, *mul, j);
        vm = mul_shift_64(mv - 1 - mm_shift, *mul, j);

        if q <= 1 {
            // mv has at least q trailing zero bits, so vr has at least q trailing zeros
            vr_is_trailing_zeros = true;

            if accept_bounds {
                // mm = mv - 1 - mm_shift, so it only has trailing zeros if mm_shift is 1
                vm_is_trailing_zeros = mm_shift == 1;
            } else {
                // mp = mv + 2, so it always has at least one trailing zero bit
                vp -= 1;
            }
        } else if q < 63 {
            vr_is_trailing_zeros = multiple_of_power_of_2(mv, q);
        }
    }

    let mut removed = 0i32;
    let mut last_removed_digit = 0u64;

    let output = if vm_is_trailing_zeros || vr_is_trailing_zeros {
        // the general case, which rarely happens
        loop {
            let vp_div10 = vp / 10;
            let vm_div10 = vm / 10;

            if vp_div10 <= vm_div10 {
                break;
            }

            let vr_div10 = vr / 10;

            vm_is_trailing_zeros &= vm % 10 == 0;
            vr_is_trailing_zeros &= last_removed_digit == 0;
            last_removed_digit = vr % 10;

            vr = vr_div10;
            vp = vp_div10;
            vm = vm_div10;
            removed += 1;
        }

        if vm_is_trailing_zeros {
            loop {
                if vm % 10 != 0 {
                    break;
                }

                vr_is_trailing_zeros &= last_removed_digit == 0;
                last_removed_digit = vr % 10;

                vr /= 10;
                vm /= 10;
                removed += 1;
            }
        }

        // round even if the exact number is .....50..0
        if vr_is_trailing_zeros && last_removed_digit == 5 && vr % 2 == 0 {
            last_removed_digit = 4;
        }

        let round_up = (vr == vm && (!accept_bounds || !vm_is_trailing_zeros))
            || last_removed_digit >= 5;

        vr + round_up as u64
    } else {
        // the common case, where there are no trailing zeros to track
        let mut round_up = false;

        let vp_div100 = vp / 100;
        let vm_div100 = vm / 100;

        // most numbers have at least two digits to remove
        if vp_div100 > vm_div100 {
            round_up = vr % 100 >= 50;

            vr /= 100;
            vp = vp_div100;
            vm = vm_div100;
            removed += 2;
        }

        loop {
            let vp_div10 = vp / 10;
            let vm_div10 = vm / 10;

            if vp_div10 <= vm_div10 {
                break;
            }

            round_up = vr % 10 >= 5;

            vr /= 10;
            vp = vp_div10;
            vm = vm_div10;
            removed += 1;
        }

        vr + (vr == vm || round_up) as u64
    };

    FloatingDecimal {
        mantissa: output,
        exponent: e10 + removed,
    }
}

/**
`(m * mul) >> j` where `j >= 64`.

`m` is at most 55 bits and `mul` is at most 125 bits, so the full product doesn't need
to be computed.
*/
#[inline(always)]
fn mul_shift_64(m: u64, mul: u128, j: u32) -> u64 {
    test_assert!(j >= 64);

    let b0 = m as u128 * (mul as u64) as u128;
    let b2 = m as u128 * (mul >> 64);

    (((b0 >> 64) + b2) >> (j - 64)) as u64
}

#[inline]
fn pow5_factor(mut value: u64) -> u32 {
    test_assert!(value != 0);

    let mut count = 0;
    while value % 5 == 0 {
        value /= 5;
        count += 1;
    }

    count
}

#[inline]
fn multiple_of_power_of_5(value: u64, p: u32) -> bool {
    pow5_factor(value) >= p
}

#[inline]
fn multiple_of_power_of_2(value: u64, p: u32) -> bool {
    test_assert!(p < 64);

    value & ((1u64 << p) - 1) == 0
}
