//! Monochrome SIXEL encoder for printer bitmaps.
//!
//! Printer bitmaps store 8 vertical dots per byte with bit 0 on top, which is
//! also the bit order of a sixel. Each encoder slices those bytes into 6-dot
//! bands; the terminal's default colour register paints the set bits.

use crate::command::Pattern;

/// Sixel values are offset by this to land on printable characters.
const SIXEL_OFFSET: u8 = 63;

/// Raster lines per strip. Six lines of 8 dots give 48 rows, which splits
/// evenly into 8 sixel bands.
const STRIP_LINES: usize = 6;
const STRIP_BANDS: usize = 8;

#[inline]
fn sixel(bits: u64) -> char {
    ((bits & 0x3f) as u8 + SIXEL_OFFSET) as char
}

/// Wraps a sixel body into `ESC P q <body> ESC \`.
fn wrap(body: &str) -> String {
    let mut out = String::with_capacity(body.len() + 5);
    // DCS introducer with default parameters
    out.push('\x1b');
    out.push('P');
    out.push('q');
    out.push_str(body);
    // String terminator: ESC \
    out.push('\x1b');
    out.push('\\');
    out
}

/// Encodes a custom character pattern as a two-band (12 dot) image.
///
/// A pattern loaded for the bottom half of the cell is shifted down one dot,
/// so both orientations line up in the same 12-dot cell.
#[must_use = "this returns the encoded SIXEL string"]
pub fn pattern_to_sixel(pattern: &Pattern) -> String {
    let mut band0 = String::with_capacity(pattern.data.len());
    let mut band1 = String::with_capacity(pattern.data.len());
    for &col in &pattern.data {
        let mut bits = col as u64;
        if !pattern.top {
            bits <<= 1;
        }
        band0.push(sixel(bits));
        band1.push(sixel(bits >> 6));
    }
    wrap(&format!("{band0}-{band1}"))
}

/// Encodes a single raster line as a two-band image.
#[must_use = "this returns the encoded SIXEL string"]
pub fn line_to_sixel(line: &[u8]) -> String {
    let mut band0 = String::with_capacity(line.len());
    let mut band1 = String::with_capacity(line.len());
    for &col in line {
        band0.push(sixel(col as u64));
        band1.push(sixel(col as u64 >> 6));
    }
    wrap(&format!("{band0}-{band1}"))
}

/// Encodes a stack of raster lines as one image.
///
/// Lines are grouped six at a time (missing lines at the bottom count as
/// empty) and every column of a group is packed into a 48-bit value with the
/// first line in the low byte. The value is then peeled off 6 bits at a time,
/// giving 8 bands per group, each followed by `-`. Lines shorter than the
/// longest one are blank on the right.
#[must_use = "this returns the encoded SIXEL string"]
pub fn raster_to_sixel<L: AsRef<[u8]>>(lines: &[L]) -> String {
    let width = lines.iter().map(|l| l.as_ref().len()).max().unwrap_or(0);
    let strips = lines.len().div_ceil(STRIP_LINES);

    let mut body = String::with_capacity(strips * STRIP_BANDS * (width + 1));
    let mut columns = vec![0u64; width];

    for strip in 0..strips {
        let group = &lines[strip * STRIP_LINES..lines.len().min((strip + 1) * STRIP_LINES)];

        for (x, column) in columns.iter_mut().enumerate() {
            let mut fat_bits = 0u64;
            for j in (0..STRIP_LINES).rev() {
                let b = group
                    .get(j)
                    .and_then(|line| line.as_ref().get(x))
                    .copied()
                    .unwrap_or(0);
                fat_bits = (fat_bits << 8) | b as u64;
            }
            *column = fat_bits;
        }

        for _ in 0..STRIP_BANDS {
            for column in columns.iter_mut() {
                body.push(sixel(*column));
                *column >>= 6;
            }
            // Move to next band
            body.push('-');
        }
    }

    wrap(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(top: bool, data: &[u8]) -> Pattern {
        Pattern {
            key: b'A',
            top,
            data: data.to_vec(),
        }
    }

    #[test]
    fn test_pattern_top() {
        assert_eq!(pattern_to_sixel(&pattern(true, &[0x3f])), "\x1bPq~-?\x1b\\");
        assert_eq!(pattern_to_sixel(&pattern(true, &[0xff])), "\x1bPq~-B\x1b\\");
    }

    #[test]
    fn test_pattern_bottom_is_shifted() {
        // 0x3f << 1 = 0x7e: bits 1..5 in band 0, bit 6 in band 1
        assert_eq!(pattern_to_sixel(&pattern(false, &[0x3f])), "\x1bPq}-@\x1b\\");
        // 0xff << 1 = 0x1fe
        assert_eq!(pattern_to_sixel(&pattern(false, &[0xff])), "\x1bPq}-F\x1b\\");
    }

    #[test]
    fn test_pattern_empty() {
        assert_eq!(pattern_to_sixel(&pattern(true, &[])), "\x1bPq-\x1b\\");
    }

    #[test]
    fn test_line() {
        assert_eq!(line_to_sixel(&[0x00, 0x01, 0x40, 0xff]), "\x1bPq?@?~-??@B\x1b\\");
    }

    #[test]
    fn test_raster_empty() {
        let lines: [&[u8]; 0] = [];
        assert_eq!(raster_to_sixel(&lines), "\x1bPq\x1b\\");
    }

    #[test]
    fn test_raster_six_blank_lines() {
        let lines = vec![vec![0u8]; 6];
        assert_eq!(raster_to_sixel(&lines), "\x1bPq?-?-?-?-?-?-?-?-\x1b\\");
    }

    #[test]
    fn test_raster_pads_to_six_lines() {
        // one line is enough for a whole strip
        let lines = vec![vec![0xffu8]];
        // rows 0..8 set: band 0 full, band 1 has its two top rows
        assert_eq!(raster_to_sixel(&lines), "\x1bPq~-B-?-?-?-?-?-?-\x1b\\");
    }

    #[test]
    fn test_raster_last_line_is_bottom() {
        let mut lines = vec![vec![0u8]; 5];
        lines.push(vec![0x80]);
        // dot 47, the top bit of the last band
        assert_eq!(raster_to_sixel(&lines), "\x1bPq?-?-?-?-?-?-?-_-\x1b\\");
    }

    #[test]
    fn test_raster_short_lines_are_padded() {
        let lines = vec![vec![0x01u8, 0x01], vec![]];
        assert_eq!(
            raster_to_sixel(&lines),
            "\x1bPq@@-??-??-??-??-??-??-??-\x1b\\"
        );
    }

    #[test]
    fn test_raster_second_strip() {
        let mut lines = vec![vec![0u8]; 6];
        lines.push(vec![0x01]);
        let sixel = raster_to_sixel(&lines);
        assert_eq!(sixel, "\x1bPq?-?-?-?-?-?-?-?-@-?-?-?-?-?-?-?-\x1b\\");
    }
}
