//! Byte-level input and output capabilities consumed by the machine.
//!
//! The engine never touches stdin/stdout directly. Callers hand it a
//! [`ByteSource`] and a [`ByteSink`]; the adapters here cover std readers and
//! writers plus in-memory buffers for tests and batch runs.

use std::io::{self, Read, Write};

/// Where `,` reads from.
pub trait ByteSource {
    /// Next input byte, or `None` once the input is exhausted.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

/// Where `.` writes to.
pub trait ByteSink {
    fn write_byte(&mut self, byte: u8) -> io::Result<()>;

    /// Push buffered output out. Called before every blocking read and when
    /// the machine halts.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// In-memory input: consumes the slice front to back.
impl ByteSource for &[u8] {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        match self.split_first() {
            Some((&byte, rest)) => {
                *self = rest;
                Ok(Some(byte))
            }
            None => Ok(None),
        }
    }
}

/// In-memory output.
impl ByteSink for Vec<u8> {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.push(byte);
        Ok(())
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        (**self).write_byte(byte)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Adapts any [`Read`] into a [`ByteSource`].
pub struct ReadSource<R> {
    bytes: io::Bytes<R>,
}

impl<R: Read> ReadSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            bytes: reader.bytes(),
        }
    }
}

impl<R: Read> ByteSource for ReadSource<R> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        self.bytes.next().transpose()
    }
}

/// Adapts any [`Write`] into a [`ByteSink`].
pub struct WriteSink<W> {
    writer: W,
}

impl<W: Write> WriteSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ByteSink for WriteSink<W> {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.writer.write_all(&[byte])
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_source_drains_in_order() {
        let mut input: &[u8] = b"hi";
        assert_eq!(input.read_byte().unwrap(), Some(b'h'));
        assert_eq!(input.read_byte().unwrap(), Some(b'i'));
        assert_eq!(input.read_byte().unwrap(), None);
        assert_eq!(input.read_byte().unwrap(), None);
    }

    #[test]
    fn test_vec_sink_collects() {
        let mut out = Vec::new();
        out.write_byte(1).unwrap();
        out.write_byte(2).unwrap();
        assert_eq!(out, vec![1, 2]);
    }

    #[test]
    fn test_read_source() {
        let mut source = ReadSource::new(io::Cursor::new(vec![7u8, 8]));
        assert_eq!(source.read_byte().unwrap(), Some(7));
        assert_eq!(source.read_byte().unwrap(), Some(8));
        assert_eq!(source.read_byte().unwrap(), None);
    }

    #[test]
    fn test_write_sink() {
        let mut sink = WriteSink::new(Vec::new());
        sink.write_byte(b'o').unwrap();
        sink.write_byte(b'k').unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.into_inner(), b"ok");
    }
}
