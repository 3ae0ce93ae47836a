//! Wire block encoding
//!
//! Block format:
//! - optional blank separator line
//! - `-----BEGIN <TAG>-----\n`
//! - one line per chunk: base64 of up to `stride` raw bytes, then `\n`
//! - `-----END <TAG>-----\n`
//!
//! The final chunk may be shorter than the stride; it is always emitted.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use heapless::Vec;

/// Largest chunk stride (raw bytes per line) the encoder accepts
pub const MAX_STRIDE: usize = 192;

/// Longest line produced by the encoder, newline included
pub const MAX_LINE_LEN: usize = MAX_STRIDE / 3 * 4 + 1;

/// Marker line framing
pub(crate) const DASHES: &[u8] = b"-----";
pub(crate) const BEGIN: &[u8] = b"BEGIN ";
pub(crate) const END: &[u8] = b"END ";

/// One encoded output line
pub type Line = Vec<u8, MAX_LINE_LEN>;

/// Block tag naming the payload type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tag {
    /// Packed indexed raster bytes
    Frame,
    /// Palette color bytes in display order
    Palette,
}

impl Tag {
    /// Marker text for this tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Frame => "FRAME",
            Tag::Palette => "PALETTE",
        }
    }

    /// Parse a tag from marker text
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes {
            b"FRAME" => Some(Tag::Frame),
            b"PALETTE" => Some(Tag::Palette),
            _ => None,
        }
    }
}

/// Errors raised when building a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Stride is zero or exceeds [`MAX_STRIDE`]
    InvalidStride,
}

/// A block ready to be written
///
/// Borrowing the payload keeps the block free of any buffering: lines are
/// encoded one at a time as the caller pulls them.
#[derive(Debug, Clone, Copy)]
pub struct WireBlock<'a> {
    tag: Tag,
    payload: &'a [u8],
    stride: usize,
    separator: bool,
}

impl<'a> WireBlock<'a> {
    /// Create a block over `payload`, chunked every `stride` bytes
    pub fn new(tag: Tag, payload: &'a [u8], stride: usize) -> Result<Self, EncodeError> {
        if stride == 0 || stride > MAX_STRIDE {
            return Err(EncodeError::InvalidStride);
        }

        Ok(Self {
            tag,
            payload,
            stride,
            separator: false,
        })
    }

    /// Emit a blank line before the `BEGIN` marker
    ///
    /// Useful when the link is shared with console text that may not end
    /// in a newline.
    pub fn with_separator(mut self, separator: bool) -> Self {
        self.separator = separator;
        self
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of chunk lines, counting the trailing partial chunk
    pub fn chunk_count(&self) -> usize {
        self.payload.len().div_ceil(self.stride)
    }

    /// Total number of bytes the block occupies on the wire
    pub fn encoded_len(&self) -> usize {
        let marker = |kind: &[u8]| 2 * DASHES.len() + kind.len() + self.tag.as_str().len() + 1;
        let full = self.payload.len() / self.stride;
        let rest = self.payload.len() % self.stride;
        let mut len = usize::from(self.separator) + marker(BEGIN) + marker(END);
        len += full * (base64_len(self.stride) + 1);
        if rest > 0 {
            len += base64_len(rest) + 1;
        }
        len
    }

    /// Iterate over the encoded lines of this block
    pub fn lines(&self) -> BlockLines<'a> {
        BlockLines {
            block: *self,
            stage: if self.separator {
                Stage::Separator
            } else {
                Stage::Begin
            },
        }
    }
}

fn base64_len(n: usize) -> usize {
    n.div_ceil(3) * 4
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Separator,
    Begin,
    /// Next chunk starts at this payload offset
    Chunk(usize),
    End,
    Done,
}

/// Iterator over the lines of a [`WireBlock`]
#[derive(Debug, Clone)]
pub struct BlockLines<'a> {
    block: WireBlock<'a>,
    stage: Stage,
}

impl<'a> Iterator for BlockLines<'a> {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        let payload = self.block.payload;
        match self.stage {
            Stage::Separator => {
                self.stage = Stage::Begin;
                let mut line = Line::new();
                push_all(&mut line, b"\n");
                Some(line)
            }
            Stage::Begin => {
                self.stage = if payload.is_empty() {
                    Stage::End
                } else {
                    Stage::Chunk(0)
                };
                Some(marker_line(BEGIN, self.block.tag))
            }
            Stage::Chunk(start) => {
                let end = (start + self.block.stride).min(payload.len());
                self.stage = if end < payload.len() {
                    Stage::Chunk(end)
                } else {
                    Stage::End
                };
                Some(chunk_line(&payload[start..end]))
            }
            Stage::End => {
                self.stage = Stage::Done;
                Some(marker_line(END, self.block.tag))
            }
            Stage::Done => None,
        }
    }
}

fn push_all(line: &mut Line, bytes: &[u8]) {
    if line.extend_from_slice(bytes).is_err() {
        unreachable!("line buffer sized for MAX_STRIDE");
    }
}

fn marker_line(kind: &[u8], tag: Tag) -> Line {
    let mut line = Line::new();
    push_all(&mut line, DASHES);
    push_all(&mut line, kind);
    push_all(&mut line, tag.as_str().as_bytes());
    push_all(&mut line, DASHES);
    push_all(&mut line, b"\n");
    line
}

fn chunk_line(chunk: &[u8]) -> Line {
    let mut line = Line::new();
    // Leave room for the newline
    line.resize_default(MAX_LINE_LEN - 1).ok();
    let written = match STANDARD.encode_slice(chunk, &mut line) {
        Ok(n) => n,
        Err(_) => unreachable!("chunk longer than MAX_STRIDE"),
    };
    line.truncate(written);
    push_all(&mut line, b"\n");
    line
}
