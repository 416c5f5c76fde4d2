/*!
# `squirrel-encode`

## 🐿⚡

The hot path of a JSON text encoder. This library finds the bytes in a string value that
need escaping, using vectorized comparisons where they're available, and converts doubles
into their shortest round-tripping decimal form.

The surrounding document generator (objects, arrays, indentation) isn't here. Callers drive
a [`Search`] over each string, writing their own substitution for every byte it reports,
and call [`format_double`] once per number.

## ⚠️ CAREFUL

This library contains unsafe code and is very performance sensitive. Any changes
need to be carefully considered and should be:

- tested against the benchmarks to make sure we don't regress (at least not accidentally).
- fuzz tested to ensure the vectorized and fallback scanners never disagree.

Any unchecked operations performed on the input are done using macros that use the checked
variant in test/debug builds (or when the `checked` cfg is enabled) to make sure we don't
ever cause UB when working through strings.
*/

#![allow(
    unused_labels,
    clippy::missing_safety_doc,
    clippy::question_mark,
    clippy::upper_case_acronyms
)]

#[macro_use]
mod macros;

mod std_ext;

mod tables;

pub mod escape;
pub mod float;
pub mod prefix;
pub mod sink;

pub use escape::{escape_json, escape_json_into, Backend, Search};
pub use float::{format_double, format_double_with, write_double, FloatFormat};
pub use prefix::{escape_with_prefix, escape_with_prefix_to_vec, EscapeSet, PrefixEscapeError};
pub use sink::{IoSink, Sink};

#[cfg(test)]
mod tests;
