//! A minimal MSB-first bit-level reader/writer pair.
//!
//! This is the bit-stream primitive the rest of `entropy::ari` treats as a
//! lower-level collaborator: it knows nothing about symbols, probabilities,
//! or the arithmetic coder's interval state. It only packs/unpacks bits and
//! bytes, in the order the wire format requires: the first bit written
//! becomes the most significant bit of the first output byte.

use std::io::{self, Read, Write};

/// Writes individual bits, MSB-first, into an underlying byte sink.
pub struct BitWriter<W> {
    writer: W,
    buffer: u8,
    filled: u8,
}

impl<W: Write> BitWriter<W> {
    pub fn new(writer: W) -> Self {
        BitWriter { writer, buffer: 0, filled: 0 }
    }

    /// Writes a single bit.
    pub fn put_bit(&mut self, bit: bool) -> io::Result<()> {
        self.buffer = (self.buffer << 1) | (bit as u8);
        self.filled += 1;
        if self.filled == 8 {
            self.writer.write_all(&[self.buffer])?;
            self.buffer = 0;
            self.filled = 0;
        }
        Ok(())
    }

    /// Writes the `bits` least significant bits of `value`, most significant
    /// first. Only called at header boundaries in this crate.
    pub fn put_bits_msb_first(&mut self, value: u32, bits: u32) -> io::Result<()> {
        for i in (0..bits).rev() {
            self.put_bit((value >> i) & 1 != 0)?;
        }
        Ok(())
    }

    /// Writes a byte-aligned byte. Only valid when no partial byte is
    /// pending, which holds at every call site in this crate (header
    /// boundaries).
    pub fn put_char(&mut self, byte: u8) -> io::Result<()> {
        debug_assert_eq!(self.filled, 0, "put_char called off a byte boundary");
        self.writer.write_all(&[byte])
    }

    /// Pads any partial final byte with zero bits and flushes the sink.
    pub fn finish(mut self) -> io::Result<W> {
        if self.filled > 0 {
            self.buffer <<= 8 - self.filled;
            self.writer.write_all(&[self.buffer])?;
            self.filled = 0;
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Reads individual bits, MSB-first, from an underlying byte source.
pub struct BitReader<R> {
    reader: R,
    buffer: u8,
    remaining: u8,
}

impl<R: Read> BitReader<R> {
    pub fn new(reader: R) -> Self {
        BitReader { reader, buffer: 0, remaining: 0 }
    }

    /// Reads a single bit. Returns `None` once the underlying source is
    /// exhausted; callers in this crate that are allowed to treat end of
    /// stream as implicit zero bits do so explicitly at the call site.
    pub fn get_bit(&mut self) -> io::Result<Option<bool>> {
        if self.remaining == 0 {
            let mut byte = [0u8; 1];
            if self.reader.read(&mut byte)? == 0 {
                return Ok(None);
            }
            self.buffer = byte[0];
            self.remaining = 8;
        }
        self.remaining -= 1;
        Ok(Some((self.buffer >> self.remaining) & 1 != 0))
    }

    /// Reads `bits` bits, most significant first, assembling them into a
    /// `u32`. Bits past end of stream are treated as zero.
    pub fn get_bits_msb_first(&mut self, bits: u32) -> io::Result<u32> {
        let mut value = 0u32;
        for _ in 0..bits {
            let bit = self.get_bit()?.unwrap_or(false);
            value = (value << 1) | bit as u32;
        }
        Ok(value)
    }

    /// Reads a byte-aligned byte. Only valid when no partial byte is
    /// pending (header boundaries). Returns `None` at end of stream.
    pub fn get_char(&mut self) -> io::Result<Option<u8>> {
        debug_assert_eq!(self.remaining, 0, "get_char called off a byte boundary");
        let mut byte = [0u8; 1];
        if self.reader.read(&mut byte)? == 0 {
            Ok(None)
        } else {
            Ok(Some(byte[0]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn round_trips_individual_bits() {
        let bits = [true, false, false, true, true, true, false, false, true];
        let mut w = BitWriter::new(Vec::new());
        for &b in &bits {
            w.put_bit(b).unwrap();
        }
        let buf = w.finish().unwrap();
        assert_eq!(buf.len(), 2); // 9 bits pads to 2 bytes

        let mut r = BitReader::new(Cursor::new(buf));
        for &b in &bits {
            assert_eq!(r.get_bit().unwrap(), Some(b));
        }
    }

    #[test]
    fn pads_final_byte_with_zeros() {
        let mut w = BitWriter::new(Vec::new());
        w.put_bit(true).unwrap();
        w.put_bit(true).unwrap();
        w.put_bit(true).unwrap();
        let buf = w.finish().unwrap();
        assert_eq!(buf, vec![0b1110_0000]);
    }

    #[test]
    fn msb_first_value_round_trips() {
        let mut w = BitWriter::new(Vec::new());
        w.put_bits_msb_first(0x2ABC, 14).unwrap();
        let buf = w.finish().unwrap();
        let mut r = BitReader::new(Cursor::new(buf));
        assert_eq!(r.get_bits_msb_first(14).unwrap(), 0x2ABC);
    }

    #[test]
    fn get_bit_past_eof_returns_none() {
        let mut r = BitReader::new(Cursor::new(Vec::<u8>::new()));
        assert_eq!(r.get_bit().unwrap(), None);
    }

    #[test]
    fn char_round_trips() {
        let mut w = BitWriter::new(Vec::new());
        w.put_char(0x41).unwrap();
        w.put_char(0x00).unwrap();
        let buf = w.finish().unwrap();
        let mut r = BitReader::new(Cursor::new(buf));
        assert_eq!(r.get_char().unwrap(), Some(0x41));
        assert_eq!(r.get_char().unwrap(), Some(0x00));
        assert_eq!(r.get_char().unwrap(), None);
    }
}
