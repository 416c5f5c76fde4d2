/*!
Static lookup tables shared by the scanners and the float formatter.

Everything here is built by `const` evaluation and never mutated, so it can be read
from any number of threads without synchronization.
*/

const BB: u8 = b'b'; // \x08
const TT: u8 = b't'; // \x09
const NN: u8 = b'n'; // \x0A
const FF: u8 = b'f'; // \x0C
const RR: u8 = b'r'; // \x0D
const QU: u8 = b'"'; // \x22
const BS: u8 = b'\\'; // \x5C
const UU: u8 = b'u'; // \x00...\x1F except the ones above
const __: u8 = 0;

/**
Classifies each byte by whether it needs escaping in a JSON string.

A value of `0` means the byte can be copied verbatim. Any other value is the
letter that follows the `\` in its escape sequence, with `u` meaning a `\u00XX`
sequence is needed.
*/
#[rustfmt::skip]
pub(crate) static ESCAPE: [u8; 256] = [
    //   1   2   3   4   5   6   7   8   9   A   B   C   D   E   F
    UU, UU, UU, UU, UU, UU, UU, UU, BB, TT, NN, UU, FF, RR, UU, UU, // 0
    UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, // 1
    __, __, QU, __, __, __, __, __, __, __, __, __, __, __, __, __, // 2
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 3
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 4
    __, __, __, __, __, __, __, __, __, __, __, __, BS, __, __, __, // 5
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 6
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 7
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 8
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 9
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // A
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // B
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // C
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // D
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // E
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // F
];

/**
Whether or not a byte needs escaping in a JSON string.
*/
#[inline(always)]
pub(crate) fn needs_escape(b: u8) -> bool {
    ESCAPE[b as usize] != __
}

/**
The ASCII digits for every number in `0..100`, two bytes each.

The digits for `n` are at `DIGIT_PAIRS[n * 2..n * 2 + 2]`.
*/
pub(crate) static DIGIT_PAIRS: [u8; 200] = {
    let mut pairs = [0u8; 200];

    let mut i = 0;
    while i < 100 {
        pairs[i * 2] = b'0' + (i / 10) as u8;
        pairs[i * 2 + 1] = b'0' + (i % 10) as u8;
        i += 1;
    }

    pairs
};

pub(crate) static HEX_DIGITS: [u8; 16] = *b"0123456789abcdef";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_table_matches_json_minimal_set() {
        for b in 0..=255u8 {
            let expected = b < 0x20 || b == b'"' || b == b'\\';

            assert_eq!(expected, needs_escape(b), "byte {:#04x}", b);
        }
    }

    #[test]
    fn escape_table_uses_short_escapes() {
        assert_eq!(b'n', ESCAPE[b'\n' as usize]);
        assert_eq!(b't', ESCAPE[b'\t' as usize]);
        assert_eq!(b'u', ESCAPE[0x1f]);
        assert_eq!(b'u', ESCAPE[0x00]);
    }

    #[test]
    fn digit_pairs_cover_0_to_99() {
        for n in 0..100usize {
            let expected = format!("{:02}", n);

            assert_eq!(expected.as_bytes(), &DIGIT_PAIRS[n * 2..n * 2 + 2]);
        }
    }
}
