//! XMRG parser implementation.
//!
//! XMRG is the NWS river forecast centers' binary format for hourly radar
//! precipitation estimates on the HRAP grid. Files are Fortran unformatted
//! records: a 6-word primary header, an info block whose layout changed
//! several times between 1997 and 1999, then one framed record per grid row
//! of signed 16-bit precipitation values (hundredths of millimeters).
//!
//! Byte order is never declared in the file; it is inferred from the first
//! record marker and applied to every subsequent read.

pub mod error;
pub mod grid;
pub mod header;
mod records;

pub use error::{Result, XmrgError};
pub use grid::XmrgGrid;
pub use header::{HeaderVariant, InfoHeader, XmrgHeader, PRIMARY_HEADER_MARKER};
