/*!
Append-only output for escaped strings and formatted numbers.

The scanners never read back what they've written, they only append verbatim runs.
Substitutions for escaped bytes are appended by the caller through the same sink.
*/

use std::{convert::Infallible, io, ptr};

/**
An append-only byte accumulator.
*/
pub trait Sink {
    /**
    The error returned when bytes can't be appended.

    In-memory sinks use [`Infallible`].
    */
    type Error;

    /**
    Append a run of bytes.
    */
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /**
    The number of bytes appended so far.
    */
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Sink for Vec<u8> {
    type Error = Infallible;

    #[inline(always)]
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Infallible> {
        let cnt = bytes.len();

        self.reserve(cnt);

        test_assert!(Vec::len(self) + cnt <= self.capacity());

        // manually copy into the vec, knowing the slices don't overlap
        // this is more efficient than `extend_from_slice` and friends,
        // because those methods can't guarantee there's no overlapping

        // SAFETY: The `src` and `cnt` slice is within `bytes`,
        // and the `dst` and `cnt` slice is within the reserved capacity.
        // SAFETY: We're only copying bytes, that are `Copy`.
        unsafe {
            let dst = self.as_mut_ptr().add(Vec::len(self));

            ptr::copy_nonoverlapping(bytes.as_ptr(), dst, cnt);
            self.set_len(Vec::len(self) + cnt);
        }

        Ok(())
    }

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl<'a, S: Sink + ?Sized> Sink for &'a mut S {
    type Error = S::Error;

    #[inline(always)]
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write_bytes(bytes)
    }

    #[inline]
    fn len(&self) -> usize {
        (**self).len()
    }
}

/**
A sink that forwards to an [`io::Write`].

Any error from the writer aborts the search that's writing to it.
*/
#[derive(Debug)]
pub struct IoSink<W> {
    writer: W,
    written: usize,
}

impl<W: io::Write> IoSink<W> {
    pub fn new(writer: W) -> Self {
        IoSink { writer, written: 0 }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: io::Write> Sink for IoSink<W> {
    type Error = io::Error;

    #[inline]
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write_all(bytes)?;
        self.written += bytes.len();

        Ok(())
    }

    #[inline]
    fn len(&self) -> usize {
        self.written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Full;

    impl io::Write for Full {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn vec_appends() {
        let mut buf = Vec::new();

        buf.write_bytes(b"abc").unwrap();
        buf.write_bytes(b"").unwrap();
        buf.write_bytes(b"def").unwrap();

        assert_eq!(b"abcdef", &buf[..]);
        assert_eq!(6, Sink::len(&buf));
    }

    #[test]
    fn borrowed_sink_appends_to_owner() {
        let mut buf = Vec::new();

        {
            let sink = &mut buf;
            sink.write_bytes(b"ab").unwrap();
            assert_eq!(2, sink.len());
        }

        assert_eq!(b"ab", &buf[..]);
    }

    #[test]
    fn io_sink_counts_written() {
        let mut sink = IoSink::new(Vec::new());

        sink.write_bytes(b"hello").unwrap();
        sink.write_bytes(b", world").unwrap();

        assert_eq!(12, sink.len());
        assert_eq!(b"hello, world", &sink.into_inner()[..]);
    }

    #[test]
    fn io_sink_propagates_errors() {
        let mut sink = IoSink::new(Full);

        let err = sink.write_bytes(b"x").unwrap_err();

        assert_eq!(io::ErrorKind::Other, err.kind());
        assert_eq!(0, sink.len());
    }
}
