use std::{iter, panic, panic::AssertUnwindSafe};


/**
Run `f` over copies of `input` starting at every offset from an `align_up_to` boundary.
*/
pub(crate) fn test_alignment(input: &[u8], align_up_to: usize, mut f: impl FnMut(&[u8])) {
    for align in 0..align_up_to {
        let mut buf = Vec::<u8>::with_capacity(input.len() + (align_up_to * 4));

        let pad = buf.as_ptr().align_offset(align_up_to) + align_up_to + align;
        buf.extend(iter::repeat(0u8).take(pad));
        buf.extend(input);

        let start_alignment = buf[pad..].as_ptr().align_offset(align_up_to);
        if align == 0 {
            assert_eq!(0, start_alignment);
        } else {
            assert_eq!(align_up_to - align, start_alignment);
        }

        if panic::catch_unwind(AssertUnwindSafe(|| f(&buf[pad..]))).is_err() {
            panic!("failed at alignment {}", align);
        }
    }
}
