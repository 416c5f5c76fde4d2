use super::*;

#[cfg(target_arch = "x86_64")]
mod x86_64;

#[cfg(target_arch = "aarch64")]
mod aarch64;

#[cfg(target_arch = "x86_64")]
pub(super) use self::x86_64::next_escape_sse2;

#[cfg(target_arch = "aarch64")]
pub(super) use self::aarch64::next_escape_neon;

/**
The number of bytes classified at once.

Both vectorized implementations use 128bit lanes.
*/
pub(super) const CHUNK_SIZE: usize = 16;

/**
The fewest remaining bytes worth classifying through a padded scratch chunk.

Any fewer and it's cheaper to look at each byte with the fallback.
*/
pub(super) const MINIMUM_THRESHOLD: usize = 6;

/**
The byte used to pad a scratch chunk.

It must never match the escape test, otherwise padding would produce phantom matches.
Zero can't be used here because it's a control character.
*/
const PADDING: u8 = b'X';

/**
A vectorized classifier for the JSON minimal escape set.
*/
pub(super) trait EscapeSimd {
    /**
    The number of bits each byte owns in a match mask, as a shift.

    An implementation that produces one bit per byte uses `0`.
    */
    const MASK_SHIFT: u32;

    /**
    Classify the 16 bytes starting at `ptr`.

    The returned mask has a single bit set within the bits owned by each byte that needs
    escaping, and no bits set for any other byte.

    # Safety

    Callers must ensure 16 bytes can be read from `ptr` and the instructions used by
    the implementation are available.
    */
    unsafe fn mask_escape(ptr: *const u8) -> u64;
}

// SAFETY: Callers must ensure the instructions used by `B` are available
#[inline(always)]
pub(super) unsafe fn next_escape<B: EscapeSimd, S: Sink>(
    search: &mut Search<'_, S>,
) -> Result<bool, S::Error> {
    if search.simd.has_matches {
        if search.simd.matches != 0 {
            return next_match::<B, S>(search);
        }

        // the last match has been reported, so skip over the rest of its chunk
        // there can't be any more escapes in it
        search.simd.has_matches = false;
        search.ptr = search.simd.chunk_end;
    }

    let input = search.input;
    let end = input.len();

    'chunk: while search.ptr + CHUNK_SIZE <= end {
        test_assert!(search.ptr + CHUNK_SIZE <= input.len());

        let matches = B::mask_escape(input.as_ptr().add(search.ptr));

        if matches == 0 {
            search.ptr += CHUNK_SIZE;
            continue 'chunk;
        }

        search.simd.begin(search.ptr, search.ptr + CHUNK_SIZE, matches);
        return next_match::<B, S>(search);
    }

    test_assert!(end - search.ptr < CHUNK_SIZE);

    let remaining = end - search.ptr;

    if remaining >= MINIMUM_THRESHOLD {
        // everything before the tail is written first, so the tail can be
        // written in one go if it doesn't contain any escapes
        search.flush()?;

        let tail = offset_from_raw_parts!(input, search.ptr, remaining);

        let mut scratch = [PADDING; CHUNK_SIZE];
        scratch[..remaining].copy_from_slice(tail);

        let matches = B::mask_escape(scratch.as_ptr());

        if matches == 0 {
            // only the real bytes are written, not the padding
            search.sink.write_bytes(tail)?;

            search.ptr = end;
            search.cursor = end;

            return Ok(false);
        }

        search.simd.begin(search.ptr, end, matches);
        return next_match::<B, S>(search);
    }

    if search.ptr < end {
        return fallback::next_escape(search);
    }

    search.flush()?;
    Ok(false)
}

#[inline(always)]
fn next_match<B: EscapeSimd, S: Sink>(search: &mut Search<'_, S>) -> Result<bool, S::Error> {
    test_assert!(search.simd.matches != 0);

    let chunk_offset = (search.simd.matches.trailing_zeros() >> B::MASK_SHIFT) as usize;
    test_assert!(chunk_offset < CHUNK_SIZE);

    // matches are reported in order, so the next one is never behind the caller
    search.ptr = search.simd.chunk_base + chunk_offset;
    assert!(search.ptr >= search.cursor, "escape reported behind the flushed output");
    test_assert!(search.ptr < search.simd.chunk_end);

    search.simd.matches &= search.simd.matches - 1;

    search.flush()?;
    Ok(true)
}

impl Simd {
    #[inline(always)]
    fn begin(&mut self, chunk_base: usize, chunk_end: usize, matches: u64) {
        self.chunk_base = chunk_base;
        self.chunk_end = chunk_end;
        self.matches = matches;
        self.has_matches = true;
    }
}
