use super::*;

use crate::std_ext::arch::aarch64::*;
use std::arch::aarch64::*;

pub(super) struct Neon;
impl EscapeSimd for Neon {
    // each byte owns a nibble in the mask
    const MASK_SHIFT: u32 = 2;

    #[inline(always)]
    unsafe fn mask_escape(ptr: *const u8) -> u64 {
        let chunk = vld1q_u8(ptr);

        // `c < 32 || c == 34` is the same as `(c ^ 2) < 33`
        // flipping bit 1 moves `"` to 32 and keeps every control character below 32
        let match_control_quote = vcltq_u8(veorq_u8(chunk, vdupq_n_u8(2)), vdupq_n_u8(33));

        let match_backslash = vceqq_u8(chunk, vdupq_n_u8(b'\\'));

        vmovemask_nibbles_u8(vorrq_u8(match_control_quote, match_backslash))
    }
}

// SAFETY: Callers must ensure Neon is available
#[inline]
#[target_feature(enable = "neon")]
pub(in crate::escape) unsafe fn next_escape_neon<S: Sink>(
    search: &mut Search<'_, S>,
) -> Result<bool, S::Error> {
    next_escape::<Neon, S>(search)
}
