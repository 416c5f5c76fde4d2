use super::*;

use crate::tables::needs_escape;

/**
Find the next byte that needs escaping, one byte at a time.

This is also how the vectorized implementations finish tails that are too short to
be worth classifying as a chunk.
*/
#[inline(always)]
pub(super) fn next_escape<S: Sink>(search: &mut Search<'_, S>) -> Result<bool, S::Error> {
    let end = search.input.len();

    'scan: while search.ptr < end {
        let curr = *get_unchecked!(search.input, search.ptr);

        if needs_escape(curr) {
            search.flush()?;
            return Ok(true);
        }

        search.ptr += 1;
    }

    test_assert_eq!(end, search.ptr);

    search.flush()?;
    Ok(false)
}
