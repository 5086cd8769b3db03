//! Byte-level token reader for printer streams.

use std::io::{self, BufRead};

use crate::{Result, TraceError};

/// Pulls bytes, fixed-width numbers, number lists and raw runs from a stream.
///
/// End of input is reported as [`TraceError::EndOfInput`] by every method,
/// whichever token was being read when the stream ran dry.
#[derive(Debug)]
pub struct ByteReader<R> {
    inner: R,
    offset: u64,
}

impl<R: BufRead> ByteReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    /// Number of bytes consumed so far.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn next_byte(&mut self) -> Result<u8> {
        let byte = loop {
            match self.inner.fill_buf() {
                Ok([]) => return Err(TraceError::EndOfInput),
                Ok(buf) => break buf[0],
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };
        self.inner.consume(1);
        self.offset += 1;
        Ok(byte)
    }

    /// Reads a `width`-digit decimal number, most significant digit first.
    ///
    /// Digits are not validated: any byte contributes `byte - b'0'` (wrapping),
    /// so a stray non-digit yields a garbage value instead of an error.
    pub fn fixed_number(&mut self, width: usize) -> Result<u32> {
        let mut number = 0u32;
        for _ in 0..width {
            let digit = self.next_byte()?.wrapping_sub(b'0') as u32;
            number = number.wrapping_mul(10).wrapping_add(digit);
        }
        Ok(number)
    }

    /// Reads `width`-digit numbers separated by `,` and terminated by `.`.
    pub fn number_list(&mut self, width: usize) -> Result<Vec<u32>> {
        let mut list = Vec::new();
        loop {
            list.push(self.fixed_number(width)?);
            match self.next_byte()? {
                b'.' => return Ok(list),
                b',' => continue,
                byte => {
                    return Err(TraceError::BadListSeparator {
                        byte,
                        offset: self.offset - 1,
                    })
                }
            }
        }
    }

    pub fn bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(count);
        for _ in 0..count {
            bytes.push(self.next_byte()?);
        }
        Ok(bytes)
    }
}
