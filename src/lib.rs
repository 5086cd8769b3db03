//! # iwtrace
//!
//! Decoder for ImageWriter-style dot-matrix printer streams.
//!
//! A printer stream is raw text interleaved with `ESC`-introduced commands.
//! This crate turns such a stream into a readable trace and re-encodes the
//! bitmap payloads (graphic lines and custom character patterns) as SIXEL,
//! so a SIXEL-capable terminal shows them inline.
//!
//! ## Quick Start
//!
//! ```rust
//! use iwtrace::{TraceOptions, Tracer};
//!
//! let stream = b"Hi\x1bc";
//! let mut out: Vec<u8> = Vec::new();
//! let summary = Tracer::new(&stream[..], &mut out, TraceOptions::default()).run()?;
//!
//! assert_eq!(summary.escapes, 1);
//! assert!(String::from_utf8_lossy(&out).contains("<Escape c:\"Reset defaults\">"));
//! # Ok::<(), iwtrace::TraceError>(())
//! ```

use thiserror::Error;

pub mod command;
pub mod encoder;
pub mod raster;
pub mod reader;
pub mod trace;

pub use command::{Command, Described, EscapeSequence, Pattern};
pub use encoder::{line_to_sixel, pattern_to_sixel, raster_to_sixel};
pub use raster::RasterBuffer;
pub use reader::ByteReader;
pub use trace::{TraceOptions, TraceSummary, Tracer};

/// Errors that can occur while reading a printer stream.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The input is exhausted.
    ///
    /// This is how a trace normally ends: [`Tracer::run`] turns it into a
    /// final flush and a successful return.
    #[error("end of input")]
    EndOfInput,

    /// Reading the input failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A number list was separated by something other than `,` or `.`.
    #[error("bad list separator {byte:#04x} at offset {offset}")]
    BadListSeparator { byte: u8, offset: u64 },
}

/// Result type for trace operations.
pub type Result<T> = core::result::Result<T, TraceError>;

/// Escape, the byte introducing every printer command.
pub const ESC: u8 = 0x1b;
