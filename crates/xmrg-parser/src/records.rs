//! Fixed-width record reads over an in-memory XMRG byte stream.
//!
//! XMRG files are Fortran unformatted output: every record is framed by a
//! leading and trailing 4-byte length marker. All multi-byte fields in a file
//! share one byte order, which is not declared anywhere; it is inferred once
//! from the first record marker and then applied to every subsequent read.

use crate::error::{Result, XmrgError};

/// Sequential reader with a byte-order flag shared by all reads.
///
/// Reads are little-endian by default; once `set_swapped(true)` is called,
/// every subsequent fixed-width read byte-swaps (i.e. reads big-endian).
pub(crate) struct RecordReader<'a> {
    data: &'a [u8],
    pos: usize,
    swapped: bool,
}

impl<'a> RecordReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            swapped: false,
        }
    }

    pub fn set_swapped(&mut self, swapped: bool) {
        self.swapped = swapped;
    }

    pub fn swapped(&self) -> bool {
        self.swapped
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Rewind the stream by `count` bytes. Used for the pre-1997 layout,
    /// where the "info block length" turns out to be the first row marker.
    pub fn seek_back(&mut self, count: usize) {
        self.pos = self.pos.saturating_sub(count);
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        if self.pos + count > self.data.len() {
            return Err(XmrgError::Truncated {
                needed: count,
                offset: self.pos,
            });
        }
        let slice = &self.data[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        let value = u32::from_le_bytes([b[0], b[1], b[2], b[3]]);
        Ok(if self.swapped {
            value.swap_bytes()
        } else {
            value
        })
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        let b = self.take(2)?;
        let value = i16::from_le_bytes([b[0], b[1]]);
        Ok(if self.swapped {
            value.swap_bytes()
        } else {
            value
        })
    }

    /// Read a fixed-width character field. The field is space/NUL padded in
    /// the file; padding is trimmed and non-ASCII bytes replaced.
    pub fn read_chars(&mut self, count: usize) -> Result<String> {
        let raw = self.take(count)?;
        Ok(String::from_utf8_lossy(raw)
            .trim_matches(|c: char| c == '\0' || c.is_whitespace())
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_are_little_endian_by_default() {
        let data = [0x10, 0x00, 0x00, 0x00, 0x05, 0x00];
        let mut reader = RecordReader::new(&data);
        assert_eq!(reader.read_u32().unwrap(), 16);
        assert_eq!(reader.read_i16().unwrap(), 5);
    }

    #[test]
    fn test_swapped_reads_are_big_endian() {
        let data = [0x00, 0x00, 0x00, 0x10, 0x00, 0x05, 0xff, 0xfb];
        let mut reader = RecordReader::new(&data);
        reader.set_swapped(true);
        assert_eq!(reader.read_u32().unwrap(), 16);
        assert_eq!(reader.read_i16().unwrap(), 5);
        assert_eq!(reader.read_i16().unwrap(), -5);
    }

    #[test]
    fn test_truncated_read_reports_offset() {
        let data = [0x10, 0x00];
        let mut reader = RecordReader::new(&data);
        match reader.read_u32() {
            Err(XmrgError::Truncated { needed: 4, offset: 0 }) => {}
            other => panic!("expected Truncated, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_seek_back() {
        let data = [0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00];
        let mut reader = RecordReader::new(&data);
        reader.read_u32().unwrap();
        reader.read_u32().unwrap();
        reader.seek_back(4);
        assert_eq!(reader.position(), 4);
        assert_eq!(reader.read_u32().unwrap(), 2);
    }

    #[test]
    fn test_char_field_trims_padding() {
        let data = *b"HP      ";
        let mut reader = RecordReader::new(&data);
        assert_eq!(reader.read_chars(8).unwrap(), "HP");
    }
}
