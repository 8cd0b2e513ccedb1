//! Synthetic XMRG byte-stream generators.
//!
//! These build structurally valid (or deliberately broken) XMRG files in
//! memory so parser and pipeline tests don't depend on archived data files.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;

/// Byte order to encode a synthetic file in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

/// Which info-block layout to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoLayout {
    /// 66-byte post-1999 block.
    Modern66,
    /// 38-byte 1997-1999 block.
    Legacy38,
    /// 37-byte truncated 1997-1999 block.
    Legacy37,
    /// No info block (pre-June-1997 files).
    PreForm,
    /// An info block with an arbitrary (usually bogus) byte count.
    Custom(u32),
}

/// Builder for synthetic XMRG files.
///
/// Defaults: 4x4 grid at HRAP origin (367, 263), little-endian,
/// modern info block, all cell values zero.
pub struct XmrgFileBuilder {
    origin_col: i32,
    origin_row: i32,
    rows: Vec<Vec<i16>>,
    byte_order: ByteOrder,
    info_layout: InfoLayout,
    corrupt_info_tail: bool,
    corrupt_row_marker: Option<usize>,
}

impl Default for XmrgFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl XmrgFileBuilder {
    pub fn new() -> Self {
        Self {
            origin_col: 367,
            origin_row: 263,
            rows: vec![vec![0; 4]; 4],
            byte_order: ByteOrder::Little,
            info_layout: InfoLayout::Modern66,
            corrupt_info_tail: false,
            corrupt_row_marker: None,
        }
    }

    pub fn origin(mut self, column: i32, row: i32) -> Self {
        self.origin_col = column;
        self.origin_row = row;
        self
    }

    /// Set cell values row-major, row 0 (southernmost) first. All rows must
    /// have equal length.
    pub fn values(mut self, rows: Vec<Vec<i16>>) -> Self {
        assert!(!rows.is_empty());
        let width = rows[0].len();
        assert!(rows.iter().all(|r| r.len() == width));
        self.rows = rows;
        self
    }

    /// A `columns x rows` grid with every cell set to `value`.
    pub fn uniform(self, columns: usize, rows: usize, value: i16) -> Self {
        self.values(vec![vec![value; columns]; rows])
    }

    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = order;
        self
    }

    pub fn info_layout(mut self, layout: InfoLayout) -> Self {
        self.info_layout = layout;
        self
    }

    /// Emit an info-block trailing marker that disagrees with its length.
    pub fn corrupt_info_tail(mut self) -> Self {
        self.corrupt_info_tail = true;
        self
    }

    /// Emit a bogus leading marker on the given row.
    pub fn corrupt_row_marker(mut self, row: usize) -> Self {
        self.corrupt_row_marker = Some(row);
        self
    }

    fn put_u32(&self, buf: &mut Vec<u8>, value: u32) {
        match self.byte_order {
            ByteOrder::Little => buf.extend_from_slice(&value.to_le_bytes()),
            ByteOrder::Big => buf.extend_from_slice(&value.to_be_bytes()),
        }
    }

    fn put_i16(&self, buf: &mut Vec<u8>, value: i16) {
        match self.byte_order {
            ByteOrder::Little => buf.extend_from_slice(&value.to_le_bytes()),
            ByteOrder::Big => buf.extend_from_slice(&value.to_be_bytes()),
        }
    }

    fn put_chars(&self, buf: &mut Vec<u8>, text: &str, width: usize) {
        let mut field = text.as_bytes().to_vec();
        field.resize(width, b' ');
        buf.extend_from_slice(&field[..width]);
    }

    pub fn build(&self) -> Vec<u8> {
        let col_count = self.rows[0].len() as u32;
        let row_count = self.rows.len() as u32;
        let row_bytes = col_count * 2;
        let mut buf = Vec::new();

        // Primary header: marker, origin, dimensions, marker.
        self.put_u32(&mut buf, 16);
        self.put_u32(&mut buf, self.origin_col as u32);
        self.put_u32(&mut buf, self.origin_row as u32);
        self.put_u32(&mut buf, col_count);
        self.put_u32(&mut buf, row_count);
        self.put_u32(&mut buf, 16);

        // Info block.
        match self.info_layout {
            InfoLayout::Modern66 => {
                self.put_u32(&mut buf, 66);
                self.put_chars(&mut buf, "HP", 2);
                self.put_chars(&mut buf, "tester", 8);
                self.put_chars(&mut buf, "01/15/2020", 10);
                self.put_chars(&mut buf, "12:00:00", 10);
                self.put_chars(&mut buf, "QPE01", 8);
                self.put_chars(&mut buf, "01/15/2020", 10);
                self.put_chars(&mut buf, "12:00:00", 10);
                self.put_u32(&mut buf, 500);
                self.put_u32(&mut buf, 1.0f32.to_bits());
                self.put_u32(&mut buf, if self.corrupt_info_tail { 65 } else { 66 });
            }
            InfoLayout::Legacy38 | InfoLayout::Legacy37 => {
                let len = if self.info_layout == InfoLayout::Legacy38 {
                    38
                } else {
                    37
                };
                self.put_u32(&mut buf, len);
                self.put_chars(&mut buf, "01/15/1998", 10);
                self.put_chars(&mut buf, "06:00:00", 10);
                self.put_chars(&mut buf, "oper", 10);
                self.put_chars(&mut buf, "QPE01", len as usize - 30);
                self.put_u32(&mut buf, if self.corrupt_info_tail { 0 } else { len });
            }
            InfoLayout::PreForm => {
                // No info block: the next word is already the first row marker.
            }
            InfoLayout::Custom(len) => {
                self.put_u32(&mut buf, len);
                buf.extend(std::iter::repeat(0u8).take(len as usize));
                self.put_u32(&mut buf, len);
            }
        }

        // Framed rows.
        for (index, row) in self.rows.iter().enumerate() {
            let lead = if self.corrupt_row_marker == Some(index) {
                row_bytes + 2
            } else {
                row_bytes
            };
            self.put_u32(&mut buf, lead);
            for &value in row {
                self.put_i16(&mut buf, value);
            }
            self.put_u32(&mut buf, row_bytes);
        }

        buf
    }
}

/// Gzip-wrap a byte stream the way archived XMRG files are transported.
pub fn gzip_bytes(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("in-memory gzip write");
    encoder.finish().expect("in-memory gzip finish")
}
