/*!
Macro helpers for the scanners and the float formatter.

Most of these macros perform checked versions of unsafe operations in tests
or when the `checked` cfg is enabled just to try catch any UB early.
*/

macro_rules! get_unchecked {
    ($slice:expr, $index:expr) => {{
        #[cfg(any(all(test, debug), checked))]
        {
            ($slice)
                .get($index)
                .expect("attempt to index out of bounds")
        }

        #[cfg(not(any(all(test, debug), checked)))]
        {
            // SAFETY: the index must always be in bounds
            #[allow(unused_unsafe)]
            unsafe {
                ($slice).get_unchecked($index)
            }
        }
    }};
}

macro_rules! owned_from_utf8_unchecked {
    ($str:expr) => {{
        #[cfg(any(all(test, debug), checked))]
        {
            String::from_utf8($str).expect("invalid utf8")
        }

        #[cfg(not(any(all(test, debug), checked)))]
        {
            // SAFETY: the input must always be valid UTF8
            #[allow(unused_unsafe)]
            unsafe {
                String::from_utf8_unchecked($str)
            }
        }
    }};
}

macro_rules! offset_from_raw_parts {
    ($base:expr, $offset:expr, $len:expr) => {{
        #[cfg(any(all(test, debug), checked))]
        {
            ($base)
                .get($offset..$offset + $len)
                .expect("attempt to slice out of bounds")
        }

        #[cfg(not(any(all(test, debug), checked)))]
        {
            let base: &[u8] = $base;

            // SAFETY: the range must always be within the slice
            #[allow(unused_unsafe)]
            unsafe {
                std::slice::from_raw_parts(base.as_ptr().add($offset), $len)
            }
        }
    }};
}

macro_rules! test_assert {
    ($($tokens:tt)*) => {{
        #[cfg(test)]
        {
            debug_assert!($($tokens)*);
        }
    }};
}

macro_rules! test_assert_eq {
    ($($tokens:tt)*) => {{
        #[cfg(test)]
        {
            debug_assert_eq!($($tokens)*);
        }
    }};
}
