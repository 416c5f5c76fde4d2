use std::arch::x86_64::*;

// SSE2 only has signed byte comparisons
// An unsigned `a <= b` holds exactly when `min(a, b) == a`
#[target_feature(enable = "sse2")]
#[inline]
// SAFETY: Callers must ensure SSE2 is available
pub unsafe fn _mm_cmple_epu8(a: __m128i, b: __m128i) -> __m128i {
    _mm_cmpeq_epi8(_mm_min_epu8(a, b), a)
}
