/*!
Power-of-five tables for shortest digit generation.

Each entry is a 125 bit approximation of `5^i` or `5^-i`, scaled by a power of two.
The tables are computed by `const` evaluation using a small fixed-width big integer
rather than being written out by hand.
*/

/**
The number of bits in an entry of [`POW5_INV_SPLIT`].
*/
pub(super) const POW5_INV_BITCOUNT: i32 = 125;

/**
The number of bits in an entry of [`POW5_SPLIT`].
*/
pub(super) const POW5_BITCOUNT: i32 = 125;

const POW5_INV_TABLE_SIZE: usize = 342;
const POW5_TABLE_SIZE: usize = 326;

/**
`floor(2^j / 5^i) + 1` where `j = bitlen(5^i) - 1 + POW5_INV_BITCOUNT`.
*/
pub(super) static POW5_INV_SPLIT: [u128; POW5_INV_TABLE_SIZE] = pow5_inv_split();

/**
The top `POW5_BITCOUNT` bits of `5^i`.

Entries where `5^i` has fewer bits are shifted up to fill them.
*/
pub(super) static POW5_SPLIT: [u128; POW5_TABLE_SIZE] = pow5_split();

/**
`ceil(log2(5^e))` for `e` in `1..3529`, and `1` for `e == 0`.

That's the same as the bit length of `5^e`.
*/
#[inline(always)]
pub(super) const fn pow5bits(e: i32) -> i32 {
    (((e as u32).wrapping_mul(1217359) >> 19) + 1) as i32
}

/**
`floor(log10(2^e))` for `e` in `0..=1650`.
*/
#[inline(always)]
pub(super) const fn log10_pow2(e: i32) -> u32 {
    (e as u32).wrapping_mul(78913) >> 18
}

/**
`floor(log10(5^e))` for `e` in `0..=2620`.
*/
#[inline(always)]
pub(super) const fn log10_pow5(e: i32) -> u32 {
    (e as u32).wrapping_mul(732923) >> 20
}

// 33 32bit limbs hold every number below `2^1056`
// the largest number the tables need is `2^1024`
const LIMBS: usize = 33;
const INV_SCALE: u32 = 1024;

type Big = [u32; LIMBS];

const fn big_from_u32(v: u32) -> Big {
    let mut big = [0; LIMBS];
    big[0] = v;
    big
}

const fn big_pow2(e: u32) -> Big {
    let mut big = [0; LIMBS];
    big[(e / 32) as usize] = 1 << (e % 32);
    big
}

const fn big_mul_small(mut big: Big, m: u32) -> Big {
    let mut carry = 0u64;

    let mut i = 0;
    while i < LIMBS {
        let v = big[i] as u64 * m as u64 + carry;
        big[i] = v as u32;
        carry = v >> 32;
        i += 1;
    }

    big
}

const fn big_div_small(mut big: Big, d: u32) -> Big {
    let mut rem = 0u64;

    let mut i = LIMBS;
    while i > 0 {
        i -= 1;

        let v = (rem << 32) | big[i] as u64;
        big[i] = (v / d as u64) as u32;
        rem = v % d as u64;
    }

    big
}

const fn big_bit_len(big: &Big) -> u32 {
    let mut i = LIMBS;
    while i > 0 {
        i -= 1;

        if big[i] != 0 {
            return i as u32 * 32 + (32 - big[i].leading_zeros());
        }
    }

    0
}

/**
The low 128 bits of `big >> shift`.
*/
const fn big_shr_u128(big: &Big, shift: u32) -> u128 {
    let first = (shift / 32) as usize;
    let offset = shift % 32;

    let mut result = 0u128;

    // 5 limbs cover the 128 bits we want plus the offset into the first limb
    let mut k = 0;
    while k < 5 {
        let i = first + k;

        if i < LIMBS {
            let limb = big[i] as u128;
            let pos = k as u32 * 32;

            if pos < offset {
                result |= limb >> (offset - pos);
            } else if pos - offset < 128 {
                result |= limb << (pos - offset);
            }
        }

        k += 1;
    }

    result
}

const fn pow5_split() -> [u128; POW5_TABLE_SIZE] {
    let mut table = [0u128; POW5_TABLE_SIZE];

    let mut pow5 = big_from_u32(1);

    let mut i = 0;
    while i < POW5_TABLE_SIZE {
        let len = big_bit_len(&pow5);
        let bitcount = POW5_BITCOUNT as u32;

        table[i] = if len <= bitcount {
            big_shr_u128(&pow5, 0) << (bitcount - len)
        } else {
            big_shr_u128(&pow5, len - bitcount)
        };

        pow5 = big_mul_small(pow5, 5);
        i += 1;
    }

    table
}

const fn pow5_inv_split() -> [u128; POW5_INV_TABLE_SIZE] {
    let mut table = [0u128; POW5_INV_TABLE_SIZE];

    let mut pow5 = big_from_u32(1);

    // `floor(2^INV_SCALE / 5^i)`
    // dividing the previous floor by 5 again gives the exact floor for the next power
    let mut inv = big_pow2(INV_SCALE);

    let mut i = 0;
    while i < POW5_INV_TABLE_SIZE {
        let j = big_bit_len(&pow5) - 1 + POW5_INV_BITCOUNT as u32;

        table[i] = big_shr_u128(&inv, INV_SCALE - j) + 1;

        pow5 = big_mul_small(pow5, 5);
        inv = big_div_small(inv, 5);
        i += 1;
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(v: u128) -> (u64, u64) {
        (v as u64, (v >> 64) as u64)
    }

    #[test]
    fn pow5_split_known_entries() {
        assert_eq!((0, 1152921504606846976), split(POW5_SPLIT[0]));
        assert_eq!((0, 1441151880758558720), split(POW5_SPLIT[1]));
        assert_eq!((0, 1801439850948198400), split(POW5_SPLIT[2]));

        // 5^54 has 126 bits, so it's the first entry that's truncated
        let pow5_54 = 5u128.pow(54);
        let len = 128 - pow5_54.leading_zeros();
        assert_eq!(126, len);
        assert_eq!(pow5_54 >> (len - 125), POW5_SPLIT[54]);

        let pow5_55 = 5u128.pow(55);
        let len = 128 - pow5_55.leading_zeros();
        assert_eq!(pow5_55 >> (len - 125), POW5_SPLIT[55]);
    }

    #[test]
    fn pow5_split_exact_entries() {
        for i in 0..=53u32 {
            let pow5 = 5u128.pow(i);
            let len = 128 - pow5.leading_zeros();

            assert_eq!(pow5 << (125 - len), POW5_SPLIT[i as usize], "5^{}", i);
        }
    }

    #[test]
    fn pow5_inv_split_known_entries() {
        assert_eq!((1, 2305843009213693952), split(POW5_INV_SPLIT[0]));
        assert_eq!(
            (11068046444225730970, 1844674407370955161),
            split(POW5_INV_SPLIT[1])
        );
    }

    #[test]
    fn entries_have_125_bits() {
        for (i, v) in POW5_SPLIT.iter().enumerate() {
            assert_eq!(125, 128 - v.leading_zeros(), "5^{}", i);
        }

        for (i, v) in POW5_INV_SPLIT.iter().enumerate().skip(1) {
            assert_eq!(125, 128 - v.leading_zeros(), "5^-{}", i);
        }
    }

    #[test]
    fn log_approximations() {
        for e in 0..=55u32 {
            let len = 128 - 5u128.pow(e).leading_zeros();

            assert_eq!(len as i32, pow5bits(e as i32), "pow5bits({})", e);
        }

        assert_eq!(0, log10_pow2(0));
        assert_eq!(0, log10_pow2(3));
        assert_eq!(1, log10_pow2(4));
        assert_eq!(301, log10_pow2(1000));
        assert_eq!(0, log10_pow5(1));
        assert_eq!(1, log10_pow5(2));
        assert_eq!(698, log10_pow5(1000));
    }
}
