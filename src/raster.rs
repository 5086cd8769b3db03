//! Accumulated printer graphics.

use crate::encoder::raster_to_sixel;

/// Dots stacked in each byte of a raster line.
pub const DOTS_PER_LINE: usize = 8;

/// Every graphic line printed so far, top to bottom.
///
/// Each line holds one byte per column; bit 0 is the top dot. Lines are only
/// ever appended, so the buffer can be read at any point of a trace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RasterBuffer {
    lines: Vec<Vec<u8>>,
}

impl RasterBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: Vec<u8>) {
        self.lines.push(line);
    }

    #[inline]
    pub fn lines(&self) -> &[Vec<u8>] {
        &self.lines
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Length of the longest line, in columns.
    pub fn width(&self) -> usize {
        self.lines.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Height in dots.
    pub fn height(&self) -> usize {
        self.lines.len() * DOTS_PER_LINE
    }

    /// Encodes the whole buffer as a single SIXEL image.
    #[must_use = "this returns the encoded SIXEL string"]
    pub fn to_sixel(&self) -> String {
        raster_to_sixel(&self.lines)
    }

    /// Renders the buffer as 8-bit grayscale pixels, row-major.
    ///
    /// Dots are black (0) on white (255). The grid is `width()` by
    /// `height()` pixels.
    pub fn to_luma(&self) -> Vec<u8> {
        let width = self.width();
        let mut pixels = vec![0xffu8; width * self.height()];
        for (i, line) in self.lines.iter().enumerate() {
            for (x, &col) in line.iter().enumerate() {
                for bit in 0..DOTS_PER_LINE {
                    if col & (1 << bit) != 0 {
                        let y = i * DOTS_PER_LINE + bit;
                        pixels[y * width + x] = 0;
                    }
                }
            }
        }
        pixels
    }
}
