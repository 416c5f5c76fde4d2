/*!
Finding the bytes in a JSON string value that need escaping.

A [`Search`] walks a single string, reporting the offset of each byte that can't appear
literally inside a JSON string: control characters below `0x20`, `"`, and `\`.
Everything between reported bytes is flushed verbatim to a [`Sink`], so when a byte is
reported the caller can append its substitution and carry on.

There are three implementations:

- an SSE2 vectorized implementation on `x86_64`,
- a Neon vectorized implementation on `aarch64`,
- and a byte-by-byte fallback implementation.

All of them share the same state, the vectorized ones classify 16 bytes at a time and
keep a mask of matches within the last chunk they looked at. Short tails are either
classified through a padded scratch chunk or handed to the fallback. For any input the
three implementations report exactly the same offsets in the same order.

The implementation is picked once when a search is created, using the [`Backend`]
detected for the current process.
*/

use std::{fmt, sync::OnceLock};

use crate::{
    sink::Sink,
    tables::{ESCAPE, HEX_DIGITS},
};

mod fallback;

#[cfg(all(any(target_arch = "x86_64", target_arch = "aarch64"), not(wasm), not(scalar)))]
mod simd;

/**
An implementation of the escape search.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /**
    Byte-by-byte classification using a lookup table.

    This backend is always available.
    */
    Fallback,
    /**
    16 byte chunks classified with SSE2 on `x86_64`.
    */
    Sse2,
    /**
    16 byte chunks classified with Neon on `aarch64`.
    */
    Neon,
}

impl Backend {
    /**
    Detect the best backend for the current process.

    Detection only happens once, later calls return the same result.
    */
    pub fn detect() -> Backend {
        static DETECTED: OnceLock<Backend> = OnceLock::new();

        *DETECTED.get_or_init(|| {
            let backend = [Backend::Sse2, Backend::Neon]
                .into_iter()
                .find(|backend| backend.is_available())
                .unwrap_or(Backend::Fallback);

            tracing::debug!(?backend, "detected escape search backend");

            backend
        })
    }

    /**
    Whether or not this backend can be used by the current process.
    */
    pub fn is_available(self) -> bool {
        match self {
            Backend::Fallback => true,
            Backend::Sse2 => {
                #[cfg(all(target_arch = "x86_64", not(wasm), not(scalar)))]
                {
                    is_x86_feature_detected!("sse2")
                }

                #[cfg(not(all(target_arch = "x86_64", not(wasm), not(scalar))))]
                {
                    false
                }
            }
            Backend::Neon => {
                #[cfg(all(target_arch = "aarch64", not(wasm), not(scalar)))]
                {
                    std::arch::is_aarch64_feature_detected!("neon")
                }

                #[cfg(not(all(target_arch = "aarch64", not(wasm), not(scalar))))]
                {
                    false
                }
            }
        }
    }
}

type NextEscape<'input, S> = fn(&mut Search<'input, S>) -> Result<bool, <S as Sink>::Error>;

/**
The state of a search through a single string.

Bytes in `input[..cursor]` have already been written to the sink, either verbatim or
replaced by the caller. Bytes in `input[cursor..ptr]` are known not to need escaping but
haven't been written yet.
*/
pub struct Search<'input, S: Sink> {
    /**
    The complete string being searched.
    */
    input: &'input [u8],
    /**
    The current offset in the input.

    When a byte is reported this is its offset.
    */
    ptr: usize,
    /**
    The start of the run that hasn't been flushed yet.
    */
    cursor: usize,
    /**
    Where flushed runs and substitutions are written.
    */
    sink: S,
    backend: Backend,
    next: NextEscape<'input, S>,
    /**
    Whether the byte at `ptr` has been reported and not yet advanced past.
    */
    reported: bool,
    /**
    State specifically for the vectorized implementations.

    The fallback implementation never touches it, but since a vectorized search hands
    short tails to the fallback it's always kept consistent.
    */
    simd: Simd,
}

/**
Matches within the last chunk classified by a vectorized search.
*/
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Simd {
    /**
    The offset of the first byte in the chunk.
    */
    chunk_base: usize,
    /**
    The offset just past the last real byte in the chunk.

    For a padded tail chunk this is the end of the input, not `chunk_base + 16`.
    */
    chunk_end: usize,
    /**
    Bits for matches that haven't been reported yet.

    Each byte in the chunk owns `1 << MASK_SHIFT` bits, the lowest set bit is the next match.
    */
    matches: u64,
    /**
    Whether `matches` belongs to a chunk that hasn't been finished yet.
    */
    has_matches: bool,
}

impl<'input, S: Sink> Search<'input, S> {
    /**
    Begin a search through `input`, writing to `sink`.

    The search uses the backend from [`Backend::detect`].
    */
    #[inline]
    pub fn new(input: &'input [u8], sink: S) -> Self {
        Search::with_backend(input, sink, Backend::detect())
    }

    /**
    Begin a search through `input` using a specific backend.

    If the backend isn't available then the fallback is used instead.
    */
    pub fn with_backend(input: &'input [u8], sink: S, backend: Backend) -> Self {
        let backend = if backend.is_available() {
            backend
        } else {
            tracing::trace!(?backend, "escape search backend unavailable, using fallback");

            Backend::Fallback
        };

        let next: NextEscape<'input, S> = match backend {
            #[cfg(all(target_arch = "x86_64", not(wasm), not(scalar)))]
            Backend::Sse2 => next_escape_sse2::<S> as NextEscape<'input, S>,
            #[cfg(all(target_arch = "aarch64", not(wasm), not(scalar)))]
            Backend::Neon => next_escape_neon::<S> as NextEscape<'input, S>,
            _ => fallback::next_escape::<S> as NextEscape<'input, S>,
        };

        Search {
            input,
            ptr: 0,
            cursor: 0,
            sink,
            backend,
            next,
            reported: false,
            simd: Simd::default(),
        }
    }

    /**
    Find the next byte that needs escaping.

    When this method returns `true`, everything before [`position`](Search::position) has
    been written to the sink and the byte at that position needs a substitution. The caller
    must call [`escape_current`](Search::escape_current) or [`advance`](Search::advance)
    before searching again.

    When this method returns `false` the rest of the input has been written verbatim and
    the search is finished.

    # Errors

    Any error from the sink aborts the search.

    # Panics

    This method panics if the last reported byte hasn't been advanced past.
    */
    #[inline(always)]
    pub fn next_escape(&mut self) -> Result<bool, S::Error> {
        assert!(
            !self.reported,
            "attempt to search again without advancing past the reported byte"
        );

        let found = (self.next)(self)?;
        self.reported = found;

        Ok(found)
    }

    /**
    The offset of the last reported byte.
    */
    #[inline]
    pub fn position(&self) -> usize {
        self.ptr
    }

    /**
    The last reported byte.

    # Panics

    This method panics if the search is finished.
    */
    #[inline]
    pub fn current(&self) -> u8 {
        self.input[self.ptr]
    }

    /**
    Write a substitution for the last reported byte and move past it.

    # Panics

    This method panics if there's no reported byte to move past.
    */
    #[inline]
    pub fn escape_current(&mut self, substitution: &[u8]) -> Result<(), S::Error> {
        assert!(self.reported, "attempt to escape without a reported byte");

        self.sink.write_bytes(substitution)?;
        self.advance();

        Ok(())
    }

    /**
    Move past the last reported byte without writing anything for it.

    # Panics

    This method panics if there's no reported byte to move past. That includes calling it
    twice for the same byte.
    */
    #[inline]
    pub fn advance(&mut self) {
        assert!(self.reported, "attempt to advance without a reported byte");

        test_assert!(self.ptr < self.input.len());
        test_assert_eq!(self.cursor, self.ptr);

        self.reported = false;
        self.ptr += 1;
        self.cursor = self.ptr;
    }

    /**
    Whether the whole input has been written to the sink.
    */
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.cursor == self.input.len()
    }

    /**
    The backend this search is using.
    */
    #[inline]
    pub fn backend(&self) -> Backend {
        self.backend
    }

    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[inline]
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    #[inline]
    pub fn into_sink(self) -> S {
        self.sink
    }

    /**
    Write the pending run `input[cursor..ptr]` to the sink.
    */
    #[inline(always)]
    fn flush(&mut self) -> Result<(), S::Error> {
        // if a string starts with an escape then we'll try flush 0 bytes
        if self.cursor == self.ptr {
            return Ok(());
        }

        test_assert!(self.cursor < self.ptr);
        test_assert!(self.ptr <= self.input.len());

        let input = self.input;
        let cursor = self.cursor;
        let cnt = self.ptr - self.cursor;

        self.sink
            .write_bytes(offset_from_raw_parts!(input, cursor, cnt))?;
        self.cursor = self.ptr;

        Ok(())
    }
}

impl<'input, S: Sink> fmt::Debug for Search<'input, S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Search")
            .field("len", &self.input.len())
            .field("ptr", &self.ptr)
            .field("cursor", &self.cursor)
            .field("backend", &self.backend)
            .field("reported", &self.reported)
            .field("simd", &self.simd)
            .finish()
    }
}

#[cfg(all(target_arch = "x86_64", not(wasm), not(scalar)))]
fn next_escape_sse2<S: Sink>(search: &mut Search<'_, S>) -> Result<bool, S::Error> {
    // SAFETY: this implementation is only picked when SSE2 is available
    unsafe { simd::next_escape_sse2(search) }
}

#[cfg(all(target_arch = "aarch64", not(wasm), not(scalar)))]
fn next_escape_neon<S: Sink>(search: &mut Search<'_, S>) -> Result<bool, S::Error> {
    // SAFETY: this implementation is only picked when Neon is available
    unsafe { simd::next_escape_neon(search) }
}

/**
Escape a JSON string value into a sink.

Quotes aren't written around the value. Bytes that need escaping get the short forms
`\"`, `\\`, `\b`, `\f`, `\n`, `\r`, `\t` where JSON has them and `\u00XX` otherwise.
All other bytes, including non-ASCII ones, are written as-is.
*/
pub fn escape_json_into<S: Sink>(input: &[u8], sink: &mut S) -> Result<(), S::Error> {
    let mut search = Search::new(input, sink);

    while search.next_escape()? {
        let curr = search.current();

        match ESCAPE[curr as usize] {
            b'u' => search.escape_current(&[
                b'\\',
                b'u',
                b'0',
                b'0',
                HEX_DIGITS[(curr >> 4) as usize],
                HEX_DIGITS[(curr & 0xf) as usize],
            ])?,
            short => search.escape_current(&[b'\\', short])?,
        }
    }

    test_assert!(search.is_finished());

    Ok(())
}

/**
Escape a string for use as a JSON string value.

Quotes aren't added around the result.
*/
pub fn escape_json(input: &str) -> String {
    let mut escaped = Vec::with_capacity(input.len() + 2);

    match escape_json_into(input.as_bytes(), &mut escaped) {
        Ok(()) => (),
        Err(never) => match never {},
    }

    owned_from_utf8_unchecked!(escaped)
}
