//! Printer escape commands.
//!
//! Every command starts with `ESC` followed by a one-byte identifier. The
//! identifier alone decides the shape of the payload that follows, so
//! [`EscapeSequence::read`] is a single `match` over the closed command set.

use std::fmt;
use std::io::BufRead;

use log::{debug, warn};

use crate::encoder::{line_to_sixel, pattern_to_sixel};
use crate::raster::RasterBuffer;
use crate::reader::ByteReader;
use crate::Result;

/// Ends the pattern table of a "load characters" command (CTRL-D).
const PATTERN_TABLE_END: u8 = 0x04;

/// A custom character bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// Character code being redefined.
    pub key: u8,
    /// Whether the bitmap occupies the upper part of the 12-dot cell.
    pub top: bool,
    /// One byte per column.
    pub data: Vec<u8>,
}

impl Pattern {
    /// Reads the width selector and bitmap that follow a pattern key.
    ///
    /// Lowercase selectors (`a` = 1 column) place the pattern low in the
    /// cell, uppercase ones (`A` = 1 column) place it on top.
    fn read<R: BufRead>(reader: &mut ByteReader<R>, key: u8) -> Result<Self> {
        let selector = reader.next_byte()?;
        let (top, width) = if selector >= b'a' {
            (false, selector.wrapping_sub(b'a').wrapping_add(1))
        } else {
            (true, selector.wrapping_sub(b'A').wrapping_add(1))
        };
        let data = reader.bytes(width as usize)?;
        Ok(Self { key, top, data })
    }
}

fn read_patterns<R: BufRead>(reader: &mut ByteReader<R>) -> Result<Vec<Pattern>> {
    let mut patterns = Vec::new();
    loop {
        let key = reader.next_byte()?;
        if key == PATTERN_TABLE_END {
            return Ok(patterns);
        }
        patterns.push(Pattern::read(reader, key)?);
    }
}

/// Character pitch selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pitch {
    Cpi9,
    Cpi10,
    Cpi12,
    Cpi13_4,
    Cpi15,
    Cpi17,
    Dpi144,
    Dpi160,
}

impl Pitch {
    fn label(self) -> &'static str {
        match self {
            Pitch::Cpi9 => "9 cpi",
            Pitch::Cpi10 => "10 cpi",
            Pitch::Cpi12 => "12 cpi",
            Pitch::Cpi13_4 => "13.4 cpi",
            Pitch::Cpi15 => "15 cpi",
            Pitch::Cpi17 => "17 cpi",
            Pitch::Dpi144 => "144 dpi",
            Pitch::Dpi160 => "160 dpi",
        }
    }
}

/// A decoded printer command and its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Print quality
    PrintQuality(u32),
    CorrespondenceQuality,
    NearLetterQuality,

    // Software switches, 16 bits with the first byte on top
    OpenSwitches(u16),
    CloseSwitches(u16),

    // User-designed characters
    CustomWidth8,
    CustomWidth16,
    LoadCharacters(Vec<Pattern>),
    CustomFont,
    CustomFontHigh,
    NormalFont,
    MouseText,

    Pitch(Pitch),

    // Proportional spacing
    DotSpacing(u32),
    /// Carries the ASCII digit `1`..`6`.
    InsertDotSpaces(u8),

    // Character attributes
    StartUnderline,
    StopUnderline,
    StartBold,
    StopBold,
    StartHalfHeight,
    StopHalfHeight,
    StartSuperscript,
    StartSubscript,
    StopScript,

    // Page formatting, lengths in 1/144 inch
    LeftMargin(u32),
    PageLength(u32),

    // Print head motion
    Unidirectional,
    Bidirectional,
    SetTabs(Vec<u32>),
    AddTab(u32),
    ClearTabs(Vec<u32>),
    ClearAllTabs,
    PrintHeadPosition(u32),

    // Paper motion
    TopOfForm,
    SixLinesPerInch,
    EightLinesPerInch,
    LineSpacing(u32),
    ForwardFeed,
    ReverseFeed,
    PaperOutSensorOff,
    PaperOutSensorOn,
    /// Automatic CR before LF and FF. The mode is the decoded digit value:
    /// 0 is off, 1 is on. The digit codes `'0'`/`'1'` (48/49) are not modes
    /// and, like every other value, describe as undefined.
    AutoCarriageReturn(u32),

    // Graphics
    GraphicLine(Vec<u8>),
    /// One byte repeated; holds the expanded line.
    RepeatedGraphic(Vec<u8>),

    SetColor(u32),
    RepeatChar { ch: u8, count: u32 },
    Reset,
    SendId,

    /// Unrecognized identifier; nothing after it was consumed.
    Unknown,
}

impl Command {
    /// Raster bytes this command prints, if it is a graphic command.
    pub fn raster_line(&self) -> Option<&[u8]> {
        match self {
            Command::GraphicLine(line) | Command::RepeatedGraphic(line) => Some(line.as_slice()),
            _ => None,
        }
    }

    /// Writes the human readable description.
    ///
    /// With `previews` set, graphic and pattern commands carry their bitmaps
    /// inline as SIXEL images.
    pub fn describe(&self, f: &mut impl fmt::Write, previews: bool) -> fmt::Result {
        match self {
            Command::PrintQuality(mode) => write!(f, "Print quality {mode}"),
            Command::CorrespondenceQuality => f.write_str("Print quality 0-correspondence"),
            Command::NearLetterQuality => f.write_str("Print quality 2-near-letter"),

            Command::OpenSwitches(bits) => write!(f, "Open switches {bits:016b}"),
            Command::CloseSwitches(bits) => write!(f, "Close switches {bits:016b}"),

            Command::CustomWidth8 => f.write_str("Max width of custom chars to 8 dots"),
            Command::CustomWidth16 => f.write_str("Max width of custom chars to 16 dots"),
            Command::LoadCharacters(patterns) => {
                write!(f, "Load {} new characters", patterns.len())?;
                for p in patterns {
                    write!(f, "\n    Key '{}', {} bytes", char::from(p.key), p.data.len())?;
                    if previews {
                        f.write_str(&pattern_to_sixel(p))?;
                    }
                }
                Ok(())
            }
            Command::CustomFont => f.write_str("Switch to custom character font"),
            Command::CustomFontHigh => {
                f.write_str("Switch to custom character font (high ASCII)")
            }
            Command::NormalFont => f.write_str("Switch to normal font"),
            Command::MouseText => f.write_str("Map MouseText to low ASCII"),

            Command::Pitch(pitch) => write!(f, "Pitch {}", pitch.label()),

            Command::DotSpacing(dots) => write!(f, "Dot spacing to {dots}"),
            Command::InsertDotSpaces(digit) => {
                write!(f, "Insert {} dot spaces", char::from(*digit))
            }

            Command::StartUnderline => f.write_str("Start underline"),
            Command::StopUnderline => f.write_str("Stop underline"),
            Command::StartBold => f.write_str("Start bold"),
            Command::StopBold => f.write_str("Stop bold"),
            Command::StartHalfHeight => f.write_str("Start half-height"),
            Command::StopHalfHeight => f.write_str("Stop half-height"),
            Command::StartSuperscript => f.write_str("Start superscript"),
            Command::StartSubscript => f.write_str("Start subscript"),
            Command::StopScript => f.write_str("Stop superscript or subscript"),

            Command::LeftMargin(column) => write!(f, "Set left margin at column {column}"),
            Command::PageLength(length) => write!(f, "Set page length to {length}/144 inches"),

            Command::Unidirectional => f.write_str("Unidirectional printing"),
            Command::Bidirectional => f.write_str("Bidirectional printing"),
            Command::SetTabs(tabs) => {
                f.write_str("Set tabs at ")?;
                write_list(f, tabs)
            }
            Command::AddTab(column) => write!(f, "Add tab at column {column}"),
            Command::ClearTabs(tabs) => {
                f.write_str("Clear tabs at ")?;
                write_list(f, tabs)
            }
            Command::ClearAllTabs => f.write_str("Clear all tabs"),
            Command::PrintHeadPosition(pos) => {
                write!(f, "Place print head at pixel position {pos}")
            }

            Command::TopOfForm => f.write_str("Set top of file"),
            Command::SixLinesPerInch => f.write_str("6 lines per inch"),
            Command::EightLinesPerInch => f.write_str("8 lines per inch"),
            Command::LineSpacing(interline) => {
                write!(f, "Distance between lines {interline}/144 inches")
            }
            Command::ForwardFeed => f.write_str("Forward line feeding"),
            Command::ReverseFeed => f.write_str("Reverse line feeding"),
            Command::PaperOutSensorOff => f.write_str("Paper-out sensor off"),
            Command::PaperOutSensorOn => f.write_str("Paper-out sensor on"),
            Command::AutoCarriageReturn(0) => f.write_str("No CR insertion before LF and FF"),
            Command::AutoCarriageReturn(1) => f.write_str("Insert CR before LF and FF"),
            Command::AutoCarriageReturn(_) => f.write_str("CR insertion undefined"),

            Command::GraphicLine(line) => {
                write!(f, "Graphic line, {} bytes", line.len())?;
                if previews {
                    f.write_str(&line_to_sixel(line))?;
                }
                Ok(())
            }
            Command::RepeatedGraphic(line) => {
                write!(f, "Graphic line, {} times", line.len())?;
                if previews {
                    f.write_str(&line_to_sixel(line))?;
                }
                Ok(())
            }

            Command::SetColor(color) => write!(f, "Set color {color}"),
            Command::RepeatChar { ch, count } => {
                write!(f, "Repeat char '{}', {count} times", char::from(*ch))
            }
            Command::Reset => f.write_str("Reset defaults"),
            Command::SendId => f.write_str("Send ID string"),
            Command::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Formats a number list as `[a b c]`.
fn write_list(f: &mut impl fmt::Write, list: &[u32]) -> fmt::Result {
    f.write_char('[')?;
    for (i, n) in list.iter().enumerate() {
        if i > 0 {
            f.write_char(' ')?;
        }
        write!(f, "{n}")?;
    }
    f.write_char(']')
}

fn read_bitmask<R: BufRead>(reader: &mut ByteReader<R>) -> Result<u16> {
    let high = reader.next_byte()? as u16;
    let low = reader.next_byte()? as u16;
    Ok((high << 8) | low)
}

/// One command as it appeared in the stream: identifier byte plus payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapeSequence {
    pub id: u8,
    pub command: Command,
}

impl EscapeSequence {
    /// Reads one command, the `ESC` having been consumed already.
    ///
    /// Graphic commands append their line to `raster`.
    pub fn read<R: BufRead>(
        reader: &mut ByteReader<R>,
        raster: &mut RasterBuffer,
    ) -> Result<Self> {
        let offset = reader.offset();
        let id = reader.next_byte()?;
        let command = match id {
            b'a' => Command::PrintQuality(reader.fixed_number(1)?),
            b'm' => Command::CorrespondenceQuality,
            b'M' => Command::NearLetterQuality,

            b'Z' => Command::OpenSwitches(read_bitmask(reader)?),
            b'D' => Command::CloseSwitches(read_bitmask(reader)?),

            b'-' => Command::CustomWidth8,
            b'+' => Command::CustomWidth16,
            b'I' => Command::LoadCharacters(read_patterns(reader)?),
            b'\'' => Command::CustomFont,
            b'*' => Command::CustomFontHigh,
            b'$' => Command::NormalFont,
            b'&' => Command::MouseText,

            b'n' => Command::Pitch(Pitch::Cpi9),
            b'N' => Command::Pitch(Pitch::Cpi10),
            b'E' => Command::Pitch(Pitch::Cpi12),
            b'e' => Command::Pitch(Pitch::Cpi13_4),
            b'q' => Command::Pitch(Pitch::Cpi15),
            b'Q' => Command::Pitch(Pitch::Cpi17),
            b'p' => Command::Pitch(Pitch::Dpi144),
            b'P' => Command::Pitch(Pitch::Dpi160),

            b's' => Command::DotSpacing(reader.fixed_number(1)?),
            b'1'..=b'6' => Command::InsertDotSpaces(id),

            b'X' => Command::StartUnderline,
            b'Y' => Command::StopUnderline,
            b'!' => Command::StartBold,
            b'"' => Command::StopBold,
            b'w' => Command::StartHalfHeight,
            b'W' => Command::StopHalfHeight,
            b'x' => Command::StartSuperscript,
            b'y' => Command::StartSubscript,
            b'z' => Command::StopScript,

            b'L' => Command::LeftMargin(reader.fixed_number(3)?),
            b'H' => Command::PageLength(reader.fixed_number(4)?),

            b'>' => Command::Unidirectional,
            b'<' => Command::Bidirectional,
            b'(' => Command::SetTabs(reader.number_list(3)?),
            b'u' => Command::AddTab(reader.fixed_number(3)?),
            b')' => Command::ClearTabs(reader.number_list(3)?),
            b'0' => Command::ClearAllTabs,
            b'F' => Command::PrintHeadPosition(reader.fixed_number(4)?),

            b'v' => Command::TopOfForm,
            b'A' => Command::SixLinesPerInch,
            b'B' => Command::EightLinesPerInch,
            b'T' => Command::LineSpacing(reader.fixed_number(2)?),
            b'f' => Command::ForwardFeed,
            b'r' => Command::ReverseFeed,
            b'O' => Command::PaperOutSensorOff,
            b'o' => Command::PaperOutSensorOn,
            b'l' => Command::AutoCarriageReturn(reader.fixed_number(1)?),

            b'G' | b'S' => {
                let count = reader.fixed_number(4)? as usize;
                Command::GraphicLine(reader.bytes(count)?)
            }
            b'g' => {
                let count = 8 * reader.fixed_number(3)? as usize;
                Command::GraphicLine(reader.bytes(count)?)
            }
            b'V' => {
                let count = reader.fixed_number(4)? as usize;
                let pattern = reader.next_byte()?;
                Command::RepeatedGraphic(vec![pattern; count])
            }

            b'K' => Command::SetColor(reader.fixed_number(1)?),
            b'R' => {
                let count = reader.fixed_number(3)?;
                let ch = reader.next_byte()?;
                Command::RepeatChar { ch, count }
            }
            b'c' => Command::Reset,
            b'?' => Command::SendId,

            _ => {
                warn!("unknown escape {id:#04x} at offset {offset}, stream may be out of sync");
                Command::Unknown
            }
        };

        if let Some(line) = command.raster_line() {
            raster.push(line.to_vec());
        }
        debug!("escape {:?} at offset {offset}", char::from(id));

        Ok(Self { id, command })
    }

    /// Formats as `<Escape <id>:"<description>">`.
    pub fn describe(&self, f: &mut impl fmt::Write, previews: bool) -> fmt::Result {
        write!(f, "<Escape {}:\"", char::from(self.id))?;
        self.command.describe(f, previews)?;
        f.write_str("\">")
    }
}

impl fmt::Display for EscapeSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.describe(f, true)
    }
}

/// [`Display`](fmt::Display) adapter choosing whether previews are shown.
pub struct Described<'a> {
    seq: &'a EscapeSequence,
    previews: bool,
}

impl EscapeSequence {
    pub fn display(&self, previews: bool) -> Described<'_> {
        Described {
            seq: self,
            previews,
        }
    }
}

impl fmt::Display for Described<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.seq.describe(f, self.previews)
    }
}
