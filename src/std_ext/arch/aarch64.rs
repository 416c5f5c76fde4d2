use std::arch::aarch64::*;

// Neon doesn't have a built-in equivalent to x86's movemask
// We narrow each 16bit pair of lanes by shifting right 4, which keeps the high nibble
// of the first byte and the low nibble of the second. Each input byte then owns one
// nibble of the resulting `u64`, and masking keeps a single bit per nibble
#[target_feature(enable = "neon")]
#[inline]
// SAFETY: Callers must ensure Neon is available
pub unsafe fn vmovemask_nibbles_u8(a: uint8x16_t) -> u64 {
    let narrowed = vshrn_n_u16(vreinterpretq_u16_u8(a), 4);

    vget_lane_u64(vreinterpret_u64_u8(narrowed), 0) & 0x8888_8888_8888_8888
}
