//! Decoded XMRG grid and row reading.

use crate::error::{Result, XmrgError};
use crate::header::{parse_info_header, parse_primary_header, HeaderVariant, InfoHeader, XmrgHeader};
use crate::records::RecordReader;

/// A fully decoded XMRG grid.
///
/// Values are the raw signed 16-bit cell values from the file, stored
/// row-major with row 0 (the southernmost row) first. Scaling to physical
/// units is left to callers; negative values mark missing data.
#[derive(Debug, Clone)]
pub struct XmrgGrid {
    pub header: XmrgHeader,
    pub variant: HeaderVariant,
    pub info: Option<InfoHeader>,
    values: Vec<i16>,
}

impl XmrgGrid {
    /// Decode a complete XMRG byte stream.
    ///
    /// Rows are strictly sequential in the file, so the entire grid is read
    /// even when a caller only cares about a sub-window. Any framing
    /// violation aborts the decode; no partial grid is returned.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = RecordReader::new(data);

        let header = parse_primary_header(&mut reader)?;
        let (variant, info) = parse_info_header(&mut reader, &header)?;

        // Every row is framed by two 4-byte markers. Check the declared
        // dimensions against the bytes actually present before reserving the
        // value buffer, so a hostile header fails with a typed error instead
        // of a giant (or overflowing) allocation.
        let remaining = data.len().saturating_sub(reader.position());
        let framed_row_bytes = header
            .col_count
            .checked_mul(2)
            .and_then(|n| n.checked_add(8));
        let needed = framed_row_bytes.and_then(|b| b.checked_mul(header.row_count));
        match needed {
            Some(needed) if needed <= remaining => {}
            _ => {
                return Err(XmrgError::Truncated {
                    needed: needed.unwrap_or(usize::MAX),
                    offset: reader.position(),
                })
            }
        }

        let mut values = Vec::with_capacity(header.col_count * header.row_count);
        for row in 0..header.row_count {
            read_row(&mut reader, &header, row, &mut values)?;
        }

        Ok(Self {
            header,
            variant,
            info,
            values,
        })
    }

    pub fn column_count(&self) -> usize {
        self.header.col_count
    }

    pub fn row_count(&self) -> usize {
        self.header.row_count
    }

    /// Raw cell value at local (0-based) grid coordinates.
    pub fn value(&self, column: usize, row: usize) -> Option<i16> {
        if column >= self.header.col_count || row >= self.header.row_count {
            return None;
        }
        Some(self.values[row * self.header.col_count + column])
    }

    /// One row of raw values, row 0 being the southernmost.
    pub fn row(&self, row: usize) -> Option<&[i16]> {
        if row >= self.header.row_count {
            return None;
        }
        let width = self.header.col_count;
        Some(&self.values[row * width..(row + 1) * width])
    }
}

/// Read one framed row: leading marker, `col_count` i16 values, trailing
/// marker. Both markers must equal `2 * col_count` or the row is rejected
/// rather than returned partially.
fn read_row(
    reader: &mut RecordReader<'_>,
    header: &XmrgHeader,
    row: usize,
    out: &mut Vec<i16>,
) -> Result<()> {
    let expected = header.row_bytes();

    let lead = reader.read_u32()?;
    if lead != expected {
        return Err(XmrgError::RowTagMismatch {
            row,
            expected,
            found: lead,
        });
    }

    for _ in 0..header.col_count {
        out.push(reader.read_i16()?);
    }

    let tail = reader.read_u32()?;
    if tail != expected {
        return Err(XmrgError::RowTagMismatch {
            row,
            expected,
            found: tail,
        });
    }

    Ok(())
}
