//! XMRG header parsing.
//!
//! Every XMRG file opens with a fixed 6-word primary header describing the
//! HRAP grid window, followed by an "info" block whose layout changed several
//! times over the product's history. The info block's declared byte count is
//! the only discriminator between the historical layouts.

use crate::error::{Result, XmrgError};
use crate::records::RecordReader;

/// Record marker framing the primary header: 4 words of 4 bytes.
pub const PRIMARY_HEADER_MARKER: u32 = 16;

/// Primary header: the HRAP grid window this file covers.
#[derive(Debug, Clone, Copy)]
pub struct XmrgHeader {
    /// HRAP column of the southwest corner of the grid.
    pub origin_col: i32,
    /// HRAP row of the southwest corner of the grid.
    pub origin_row: i32,
    /// Number of columns (values per row).
    pub col_count: usize,
    /// Number of rows.
    pub row_count: usize,
    /// Whether every fixed-width read in this file is byte-swapped.
    pub byte_swapped: bool,
}

impl XmrgHeader {
    /// Byte count of one row payload, which doubles as the row record marker.
    pub fn row_bytes(&self) -> u32 {
        (self.col_count * 2) as u32
    }
}

/// The historical info-block layouts, selected by declared byte count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderVariant {
    /// 66-byte block, files written 1999 onward.
    Modern66,
    /// 38-byte block, files written June 1997 to 1999.
    Legacy38,
    /// 37-byte block: the 1997-1999 layout with a one-byte truncation bug.
    /// The writer's off-by-one is preserved here for compatibility.
    Legacy37,
    /// Files written before June 1997 have no info block at all; the word
    /// read as its length is actually the first row marker.
    PreForm,
}

impl HeaderVariant {
    /// Classify an info block by its declared byte count.
    pub fn classify(byte_count: u32, col_count: usize) -> Result<HeaderVariant> {
        match byte_count {
            66 => Ok(HeaderVariant::Modern66),
            38 => Ok(HeaderVariant::Legacy38),
            37 => Ok(HeaderVariant::Legacy37),
            n if u64::from(n) == col_count as u64 * 2 => Ok(HeaderVariant::PreForm),
            other => Err(XmrgError::UnknownHeaderFormat(other)),
        }
    }
}

/// Decoded info block. All character fields are fixed-width text in the
/// file; none of them participate in grid decoding.
#[derive(Debug, Clone, Default)]
pub struct InfoHeader {
    pub operating_system: String,
    pub user_id: String,
    pub saved_date: String,
    pub saved_time: String,
    pub process_flag: String,
    pub valid_date: String,
    pub valid_time: String,
    /// Maximum cell value in the file (Modern66 only).
    pub max_value: Option<i32>,
    /// Writer version number (Modern66 only).
    pub version: Option<f32>,
}

/// Parse the primary header and detect the file's byte order.
///
/// The first word must be the record marker 16; if it is not, the entire
/// remaining stream is treated as byte-swapped. That single leading value is
/// the sole byte-order oracle.
pub(crate) fn parse_primary_header(reader: &mut RecordReader<'_>) -> Result<XmrgHeader> {
    let first = reader.read_u32()?;
    if first != PRIMARY_HEADER_MARKER {
        reader.set_swapped(true);
    }

    let origin_col = reader.read_i32()?;
    let origin_row = reader.read_i32()?;
    let col_count = reader.read_u32()?;
    let row_count = reader.read_u32()?;
    // Trailing marker of the primary header; not used as an oracle.
    reader.read_u32()?;

    if col_count == 0 || row_count == 0 {
        return Err(XmrgError::InvalidDimensions {
            columns: col_count,
            rows: row_count,
        });
    }

    Ok(XmrgHeader {
        origin_col,
        origin_row,
        col_count: col_count as usize,
        row_count: row_count as usize,
        byte_swapped: reader.swapped(),
    })
}

/// Parse the info block that follows the primary header.
///
/// Returns the detected layout variant and, for layouts that have one, the
/// decoded block. For [`HeaderVariant::PreForm`] the stream is rewound to
/// just after the primary header so row reads line up.
pub(crate) fn parse_info_header(
    reader: &mut RecordReader<'_>,
    header: &XmrgHeader,
) -> Result<(HeaderVariant, Option<InfoHeader>)> {
    let byte_count = reader.read_u32()?;
    let variant = HeaderVariant::classify(byte_count, header.col_count)?;

    let info = match variant {
        HeaderVariant::Modern66 => Some(parse_modern66(reader)?),
        HeaderVariant::Legacy38 => Some(parse_legacy(reader, false)?),
        HeaderVariant::Legacy37 => Some(parse_legacy(reader, true)?),
        HeaderVariant::PreForm => {
            reader.seek_back(4);
            None
        }
    };

    if variant != HeaderVariant::PreForm {
        let tail = reader.read_u32()?;
        if tail != byte_count {
            return Err(XmrgError::TailMismatch {
                head: byte_count,
                tail,
            });
        }
    }

    Ok((variant, info))
}

fn parse_modern66(reader: &mut RecordReader<'_>) -> Result<InfoHeader> {
    Ok(InfoHeader {
        operating_system: reader.read_chars(2)?,
        user_id: reader.read_chars(8)?,
        saved_date: reader.read_chars(10)?,
        saved_time: reader.read_chars(10)?,
        process_flag: reader.read_chars(8)?,
        valid_date: reader.read_chars(10)?,
        valid_time: reader.read_chars(10)?,
        max_value: Some(reader.read_i32()?),
        version: Some(reader.read_f32()?),
    })
}

/// The 1997-1999 layout: four text fields, 10+10+10+8 bytes. The 37-byte
/// files are identical except the final field lost its last byte.
fn parse_legacy(reader: &mut RecordReader<'_>, truncated: bool) -> Result<InfoHeader> {
    let flag_width = if truncated { 7 } else { 8 };
    Ok(InfoHeader {
        valid_date: reader.read_chars(10)?,
        valid_time: reader.read_chars(10)?,
        user_id: reader.read_chars(10)?,
        process_flag: reader.read_chars(flag_width)?,
        ..InfoHeader::default()
    })
}
