//! Bitstream I/O utilities for cue parsing.
//!
//! Provides a bounds-checked, seekable big-endian bit reader. Every read and
//! cursor move is checked against the declared length in bits, which need not
//! be a whole number of bytes.

use std::io;
use std::io::SeekFrom;

use bitstream_io::{BigEndian, BitRead, BitReader, SignedInteger, UnsignedInteger};
use log::trace;

#[derive(Debug)]
pub struct BitstreamIoReader<R: io::Read + io::Seek> {
    bs: BitReader<R, BigEndian>,
    len: u64,
}

/// Reader over a borrowed buffer.
pub type BsIoSliceReader<'a> = BitstreamIoReader<io::Cursor<&'a [u8]>>;

/// Reader that owns its buffer. This is the stream type produced by
/// [`mk_bits`](crate::utils::source::mk_bits).
pub type BitStream = BitstreamIoReader<io::Cursor<Vec<u8>>>;

fn out_of_bounds(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, msg)
}

impl<R> BitstreamIoReader<R>
where
    R: io::Read + io::Seek,
{
    pub fn new(read: R, len_bytes: u64) -> Self {
        Self::with_len_bits(read, len_bytes << 3)
    }

    pub fn with_len_bits(read: R, len_bits: u64) -> Self {
        Self {
            bs: BitReader::new(read),
            len: len_bits,
        }
    }

    #[inline(always)]
    fn ensure_available(&mut self, n: u64, op: &str) -> io::Result<()> {
        let position = self.position()?;
        if n > self.len.saturating_sub(position) {
            return Err(out_of_bounds(format!(
                "{op}({n}): out of bounds bits at {position}"
            )));
        }

        Ok(())
    }

    #[inline(always)]
    pub fn get(&mut self) -> io::Result<bool> {
        self.ensure_available(1, "get")?;
        self.bs.read_bit()
    }

    /// Reads an `n`-bit unsigned field. Reading zero bits yields zero.
    #[inline(always)]
    pub fn get_n<I: UnsignedInteger>(&mut self, n: u32) -> io::Result<I> {
        if n == 0 {
            return Ok(I::default());
        }

        self.ensure_available(n as u64, "get_n")?;
        self.bs.read_unsigned_var(n)
    }

    /// Reads an `n`-bit two's complement field.
    #[inline(always)]
    pub fn get_s<S: SignedInteger>(&mut self, n: u32) -> io::Result<S> {
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "get_s(0): signed fields need at least one bit",
            ));
        }

        self.ensure_available(n as u64, "get_s")?;
        self.bs.read_signed_var(n)
    }

    /// Moves the cursor relative to its current position.
    #[inline(always)]
    pub fn seek(&mut self, offset: i64) -> io::Result<u64> {
        let position = self.position()?;

        if (offset < 0 && position as i64 + offset >= 0)
            || (offset >= 0 && self.available()? >= offset as u64)
        {
            return self.bs.seek_bits(SeekFrom::Current(offset));
        }

        Err(out_of_bounds(format!(
            "seek({offset}): out of bounds bits at {position}"
        )))
    }

    /// Places the cursor at an absolute bit offset.
    pub fn set_position(&mut self, position: u64) -> io::Result<u64> {
        if position > self.len {
            return Err(out_of_bounds(format!(
                "set_position({position}): stream is {} bits long",
                self.len
            )));
        }

        self.bs.seek_bits(SeekFrom::Start(position))
    }

    /// Advances past `n` reserved bits without reading them.
    ///
    /// The cursor is left where it was if fewer than `n` bits remain.
    #[inline(always)]
    pub fn reserved(&mut self, n: u32) -> io::Result<()> {
        let position = self.seek(n as i64)?;
        trace!("reserved({n}): cursor now at bit {position}");

        Ok(())
    }

    #[inline(always)]
    pub fn skip_n(&mut self, n: u32) -> io::Result<()> {
        self.ensure_available(n as u64, "skip_n")?;
        self.bs.skip(n)
    }

    #[inline(always)]
    pub fn byte_align(&mut self) -> io::Result<()> {
        let remainder = self.position()? & 7;
        if remainder > 0 {
            self.skip_n(8 - remainder as u32)?;
        }

        Ok(())
    }

    #[inline(always)]
    pub fn available(&mut self) -> io::Result<u64> {
        self.bs
            .position_in_bits()
            .map(|pos| self.len.saturating_sub(pos))
    }

    #[inline(always)]
    pub fn position(&mut self) -> io::Result<u64> {
        self.bs.position_in_bits()
    }

    pub fn len_bits(&self) -> u64 {
        self.len
    }

    /// Returns the underlying reader, discarding the cursor.
    pub fn into_inner(self) -> R {
        self.bs.into_reader()
    }
}

/// Advances `reader` past `n` reserved bits.
pub fn reserved<R: io::Read + io::Seek>(
    reader: &mut BitstreamIoReader<R>,
    n: u32,
) -> io::Result<()> {
    reader.reserved(n)
}

impl<'a> BsIoSliceReader<'a> {
    pub fn from_slice(buf: &'a [u8]) -> Self {
        let len = buf.len() as u64;
        let read = io::Cursor::new(buf);

        Self::new(read, len)
    }
}

impl Default for BsIoSliceReader<'_> {
    fn default() -> Self {
        Self::from_slice(&[])
    }
}

impl BitStream {
    pub fn from_vec(buf: Vec<u8>) -> Self {
        let len = buf.len() as u64;
        trace!("BitStream::from_vec: {len} bytes");

        Self::new(io::Cursor::new(buf), len)
    }

    /// Wraps `buf` but exposes only its first `len_bits` bits.
    pub fn from_vec_with_len_bits(buf: Vec<u8>, len_bits: u64) -> Self {
        let len_bits = len_bits.min((buf.len() as u64) << 3);
        trace!("BitStream::from_vec_with_len_bits: {len_bits} bits");

        Self::with_len_bits(io::Cursor::new(buf), len_bits)
    }

    /// Returns the owned buffer backing this stream.
    pub fn into_bytes(self) -> Vec<u8> {
        self.into_inner().into_inner()
    }
}

impl Default for BitStream {
    fn default() -> Self {
        Self::from_vec(Vec::new())
    }
}
