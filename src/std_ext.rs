/*!
This module has some "standard" extensions used in the scanners.

These extensions follow the same layout as Rust's standard library.
*/

#[cfg(all(not(wasm), not(scalar)))]
pub(crate) mod arch;
