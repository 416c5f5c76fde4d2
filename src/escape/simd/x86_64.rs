use super::*;

use crate::std_ext::arch::x86_64::*;
use std::arch::x86_64::*;

pub(super) struct Sse2;
impl EscapeSimd for Sse2 {
    const MASK_SHIFT: u32 = 0;

    #[inline(always)]
    unsafe fn mask_escape(ptr: *const u8) -> u64 {
        // we explicitly perform an unaligned load
        let chunk = _mm_loadu_si128(ptr as *const __m128i);

        // `c < 32 || c == 34` is the same as `(c ^ 2) < 33`
        // flipping bit 1 moves `"` to 32 and keeps every control character below 32
        let match_control_quote =
            _mm_cmple_epu8(_mm_xor_si128(chunk, _mm_set1_epi8(2)), _mm_set1_epi8(32));

        let match_backslash = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'\\' as i8));

        // Pack the vector mask into a bitmask, one bit per byte
        _mm_movemask_epi8(_mm_or_si128(match_control_quote, match_backslash)) as u16 as u64
    }
}

// SAFETY: Callers must ensure SSE2 is available
#[inline]
#[target_feature(enable = "sse2")]
pub(in crate::escape) unsafe fn next_escape_sse2<S: Sink>(
    search: &mut Search<'_, S>,
) -> Result<bool, S::Error> {
    next_escape::<Sse2, S>(search)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::mem;

    #[test]
    fn chunk_is_16_bytes() {
        assert_eq!(CHUNK_SIZE, mem::size_of::<__m128i>());
    }

    #[test]
    fn mask_matches_every_byte() {
        if !is_x86_feature_detected!("sse2") {
            return;
        }

        for b in 0..=255u8 {
            let mut chunk = [b'a'; CHUNK_SIZE];
            chunk[7] = b;

            let mask = unsafe { Sse2::mask_escape(chunk.as_ptr()) };

            let expected = if crate::tables::needs_escape(b) {
                1 << 7
            } else {
                0
            };

            assert_eq!(expected, mask, "byte {:#04x}", b);
        }
    }
}
