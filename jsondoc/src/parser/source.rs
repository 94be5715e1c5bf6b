//! The byte source abstraction parsers read from.

use std::io::{self, Read};

/// A source of bytes for the parser to read. This is a thin wrapper around [`Read`] (every
/// `R: Read` implements it for free) so [`crate::Document::parse`], [`crate::Document::parse_reader`],
/// and [`crate::Document::parse_with`] can all be expressed as the same generic cursor underneath.
pub trait ByteSource {
    /// Fills `buf` with as many bytes as are available, returning the number written. `Ok(0)`
    /// means end of input.
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl<R: Read> ByteSource for R {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read(buf)
    }
}

/// Adapts a `FnMut(&mut [u8]) -> io::Result<usize>` closure into a [`Read`] (and therefore a
/// [`ByteSource`]), backing [`crate::Document::parse_with`].
pub struct FnSource<F>(pub F);

impl<F: FnMut(&mut [u8]) -> io::Result<usize>> Read for FnSource<F> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (self.0)(buf)
    }
}
