/*!
Escaping an arbitrary set of bytes by prefixing them with `\`.

This is unrelated to escaping JSON strings, there's no substitution and no vectorization.
Each byte in an [`EscapeSet`] is written with a single `\` in front of it, and every other
byte is written as-is.
*/

use std::fmt;

/**
The byte written before each escaped byte.
*/
pub const ESCAPE_MARKER: u8 = b'\\';

/**
An error escaping a byte string with [`escape_with_prefix`].
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PrefixEscapeError {
    #[error("no input to escape")]
    MissingInput,
    #[error("no set of bytes to escape")]
    MissingEscapeSet,
    #[error("no destination buffer")]
    MissingDestination,
    #[error("the destination buffer is {actual} bytes, but escaping may need {required}")]
    DestinationTooSmall { required: usize, actual: usize },
}

/**
A set of bytes to escape.
*/
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct EscapeSet {
    bits: [u64; 4],
}

impl EscapeSet {
    /**
    A set containing every byte in `bytes`.
    */
    pub const fn new(bytes: &[u8]) -> Self {
        let mut bits = [0u64; 4];

        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            bits[(b >> 6) as usize] |= 1 << (b & 63);
            i += 1;
        }

        EscapeSet { bits }
    }

    #[inline(always)]
    pub const fn contains(&self, b: u8) -> bool {
        self.bits[(b >> 6) as usize] & (1 << (b & 63)) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == [0; 4]
    }
}

impl fmt::Debug for EscapeSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set()
            .entries((0..=255u8).filter(|b| self.contains(*b)).map(|b| b as char))
            .finish()
    }
}

/**
The number of bytes a destination needs to escape `len` bytes.

That's enough for every byte to be escaped, plus a trailing NUL.
*/
#[inline]
pub const fn required_capacity(len: usize) -> usize {
    2 * len + 1
}

/**
Escape the bytes in `input` that are in `escape_set` into `escaped`, returning the
length of the escaped content.

The destination must be at least [`required_capacity`] bytes, regardless of how many
bytes actually need escaping. A NUL is written after the escaped content. NUL bytes in the
input are only escaped if they're in the set.

# Errors

If any of the arguments are missing, or the destination is too small, an error is
returned and nothing is written.
*/
pub fn escape_with_prefix(
    input: Option<&[u8]>,
    escape_set: Option<&EscapeSet>,
    escaped: Option<&mut [u8]>,
) -> Result<usize, PrefixEscapeError> {
    let input = input.ok_or(PrefixEscapeError::MissingInput)?;
    let escape_set = escape_set.ok_or(PrefixEscapeError::MissingEscapeSet)?;
    let escaped = escaped.ok_or(PrefixEscapeError::MissingDestination)?;

    let required = required_capacity(input.len());
    if escaped.len() < required {
        return Err(PrefixEscapeError::DestinationTooSmall {
            required,
            actual: escaped.len(),
        });
    }

    let mut len = 0;
    for &b in input {
        if escape_set.contains(b) {
            escaped[len] = ESCAPE_MARKER;
            len += 1;
        }

        escaped[len] = b;
        len += 1;
    }

    escaped[len] = 0;

    Ok(len)
}

/**
Escape the bytes in `input` that are in `escape_set` into a new buffer.

The result doesn't include a trailing NUL.
*/
pub fn escape_with_prefix_to_vec(input: &[u8], escape_set: &EscapeSet) -> Vec<u8> {
    let mut escaped = vec![0; required_capacity(input.len())];

    match escape_with_prefix(Some(input), Some(escape_set), Some(&mut escaped[..])) {
        Ok(len) => escaped.truncate(len),
        Err(err) => unreachable!("the destination is always large enough: {}", err),
    }

    escaped
}
