//! The outer trace loop: raw bytes in, annotated trace out.

use std::io::{BufRead, Write};

use log::{info, warn};

use crate::command::{Command, EscapeSequence};
use crate::raster::RasterBuffer;
use crate::reader::ByteReader;
use crate::{Result, TraceError, ESC};

/// Trace output settings.
#[derive(Clone, Debug)]
pub struct TraceOptions {
    /// Append a SIXEL preview to every graphic and pattern command.
    pub inline_previews: bool,
    /// Write the composite image of all graphic lines at end of input.
    pub final_image: bool,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            inline_previews: true,
            final_image: true,
        }
    }
}

/// What a finished trace saw.
#[derive(Debug, Clone, Default)]
pub struct TraceSummary {
    /// Every graphic line of the stream, in order.
    pub raster: RasterBuffer,
    /// Bytes consumed from the input.
    pub bytes: u64,
    /// Escape sequences decoded, unknown ones included.
    pub escapes: usize,
    /// Escape sequences with an unrecognized identifier.
    pub unknown_escapes: usize,
}

/// Decodes a printer stream into a readable trace.
///
/// Printable bytes are written as `{hh}`, control bytes as `\n{hh:^C}` and
/// escape sequences as `\n<Escape c:"...">`. When the input ends the
/// composite image of all graphic lines follows on a line of its own.
pub struct Tracer<R, W> {
    reader: ByteReader<R>,
    out: W,
    opts: TraceOptions,
    summary: TraceSummary,
}

impl<R: BufRead, W: Write> Tracer<R, W> {
    pub fn new(input: R, out: W, opts: TraceOptions) -> Self {
        Self {
            reader: ByteReader::new(input),
            out,
            opts,
            summary: TraceSummary::default(),
        }
    }

    /// Traces the whole input.
    ///
    /// Output is flushed after every record, so a live stream is traced as it
    /// arrives.
    ///
    /// Running out of input, even in the middle of a command, ends the trace
    /// successfully; the unfinished command is dropped. I/O faults and
    /// malformed number lists are returned as errors.
    pub fn run(mut self) -> Result<TraceSummary> {
        loop {
            match self.step() {
                Ok(()) => {}
                Err(TraceError::EndOfInput) => return self.finish(),
                Err(e) => {
                    if let Err(flush) = self.out.flush() {
                        warn!("flushing trace output failed: {flush}");
                    }
                    return Err(e);
                }
            }
        }
    }

    fn step(&mut self) -> Result<()> {
        let ch = self.reader.next_byte()?;
        match ch {
            ESC => {
                let seq = EscapeSequence::read(&mut self.reader, &mut self.summary.raster)?;
                self.summary.escapes += 1;
                if seq.command == Command::Unknown {
                    self.summary.unknown_escapes += 1;
                }
                write!(self.out, "\n{}", seq.display(self.opts.inline_previews))?;
            }
            0x00..=0x1f => {
                let note = match ch {
                    0x0e => " Double width",
                    0x0f => " Single width",
                    _ => "",
                };
                write!(self.out, "\n{{{:02x}:^{}{}}}", ch, (ch + b'@') as char, note)?;
            }
            _ => write!(self.out, "{{{ch:02x}}}")?,
        }
        // the next read may block on a live stream
        self.out.flush()?;
        Ok(())
    }

    fn finish(mut self) -> Result<TraceSummary> {
        if self.opts.final_image {
            writeln!(self.out, "\n{}", self.summary.raster.to_sixel())?;
        } else {
            writeln!(self.out)?;
        }
        self.out.flush()?;

        self.summary.bytes = self.reader.offset();
        info!(
            "traced {} bytes: {} escapes ({} unknown), {} graphic lines",
            self.summary.bytes,
            self.summary.escapes,
            self.summary.unknown_escapes,
            self.summary.raster.len()
        );
        Ok(self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace(data: &[u8]) -> String {
        let mut out: Vec<u8> = Vec::new();
        Tracer::new(data, &mut out, TraceOptions::default())
            .run()
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(trace(b""), "\n\x1bPq\x1b\\\n");
    }

    #[test]
    fn test_printable_and_control_bytes() {
        assert_eq!(
            trace(b"A\r\n\x0ez"),
            "{41}\n{0d:^M}\n{0a:^J}\n{0e:^N Double width}{7a}\n\x1bPq\x1b\\\n"
        );
        assert_eq!(trace(b"\x0f"), "\n{0f:^O Single width}\n\x1bPq\x1b\\\n");
        assert_eq!(trace(b"\x00\xff"), "\n{00:^@}{ff}\n\x1bPq\x1b\\\n");
    }

    #[test]
    fn test_truncated_command_is_dropped() {
        assert_eq!(trace(b"A\x1bG0004\x01\x02"), "{41}\n\x1bPq\x1b\\\n");
    }

    #[test]
    fn test_final_image_disabled() {
        let mut out: Vec<u8> = Vec::new();
        let opts = TraceOptions {
            final_image: false,
            ..Default::default()
        };
        Tracer::new(&b"\x1bc"[..], &mut out, opts).run().unwrap();
        assert_eq!(out, b"\n<Escape c:\"Reset defaults\">\n");
    }
}
