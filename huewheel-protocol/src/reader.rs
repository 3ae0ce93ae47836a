//! Tolerant wire block reader
//!
//! Bytes are fed one at a time; each completed line is classified as a
//! marker, a chunk, or noise. Anything outside a block (console output,
//! blank lines, partial garbage) is skipped. A block is abandoned when a
//! line inside it cannot be decoded, when a new `BEGIN` arrives before its
//! `END`, or when an `END` does not match its tag. The reader then waits for
//! the next `BEGIN`, so one corrupted block never leaks into the next.

use base64::engine::general_purpose::STANDARD;
use base64::{DecodeSliceError, Engine};
use heapless::Vec;

use crate::block::{Tag, BEGIN, DASHES, END, MAX_LINE_LEN, MAX_STRIDE};

/// Decoded bytes of one chunk line
pub type Chunk = Vec<u8, MAX_STRIDE>;

/// Reader errors; the block in progress (if any) is dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlockError {
    /// Line exceeded the longest valid chunk line
    LineTooLong,
    /// Chunk line is not valid base64
    InvalidBase64,
    /// Chunk decodes to more than [`MAX_STRIDE`] bytes
    ChunkTooLarge,
    /// `BEGIN` marker with a tag this reader does not know
    UnknownTag,
    /// `END` marker without a matching open block
    UnexpectedEnd,
}

/// Something recognized on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockEvent {
    /// A block started
    Begin {
        tag: Tag,
        /// Block that was still open and got discarded
        abandoned: Option<Tag>,
    },
    /// Decoded bytes belonging to the open block
    Chunk(Chunk),
    /// The open block completed
    End(Tag),
}

/// Byte-fed block parser
#[derive(Debug, Clone)]
pub struct BlockReader {
    /// Current line without its newline
    line: Vec<u8, MAX_LINE_LEN>,
    /// Current line overflowed and is being skipped
    overflow: bool,
    /// Tag of the open block
    open: Option<Tag>,
}

impl Default for BlockReader {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockReader {
    /// Create a reader waiting for a `BEGIN` marker
    pub fn new() -> Self {
        Self {
            line: Vec::new(),
            overflow: false,
            open: None,
        }
    }

    /// Tag of the block currently being received
    pub fn open_block(&self) -> Option<Tag> {
        self.open
    }

    /// Drop any partial line and open block
    pub fn reset(&mut self) {
        self.line.clear();
        self.overflow = false;
        self.open = None;
    }

    /// Feed a single byte to the reader
    ///
    /// Returns `Ok(Some(event))` when a line completes something
    /// meaningful, `Ok(None)` otherwise.
    pub fn feed(&mut self, byte: u8) -> Result<Option<BlockEvent>, BlockError> {
        if byte != b'\n' {
            if self.line.push(byte).is_err() {
                self.overflow = true;
            }
            return Ok(None);
        }

        let result = if self.overflow {
            // Overlong noise outside a block is harmless
            match self.open.take() {
                Some(_) => Err(BlockError::LineTooLong),
                None => Ok(None),
            }
        } else {
            let mut end = self.line.len();
            if end > 0 && self.line[end - 1] == b'\r' {
                end -= 1;
            }
            let line = core::mem::take(&mut self.line);
            self.process_line(&line[..end])
        };

        self.line.clear();
        self.overflow = false;
        result
    }

    fn process_line(&mut self, line: &[u8]) -> Result<Option<BlockEvent>, BlockError> {
        if line.is_empty() {
            return Ok(None);
        }

        if let Some(name) = marker(line, BEGIN) {
            let abandoned = self.open.take();
            let tag = Tag::from_bytes(name).ok_or(BlockError::UnknownTag)?;
            self.open = Some(tag);
            return Ok(Some(BlockEvent::Begin { tag, abandoned }));
        }

        if let Some(name) = marker(line, END) {
            return match self.open.take() {
                Some(tag) if tag.as_str().as_bytes() == name => Ok(Some(BlockEvent::End(tag))),
                _ => Err(BlockError::UnexpectedEnd),
            };
        }

        if self.open.is_none() {
            return Ok(None);
        }

        match decode_chunk(line) {
            Ok(chunk) => Ok(Some(BlockEvent::Chunk(chunk))),
            Err(e) => {
                self.open = None;
                Err(e)
            }
        }
    }
}

/// Extract the tag text from `-----<kind><TAG>-----`
fn marker<'l>(line: &'l [u8], kind: &[u8]) -> Option<&'l [u8]> {
    line.strip_prefix(DASHES)?
        .strip_prefix(kind)?
        .strip_suffix(DASHES)
}

fn decode_chunk(line: &[u8]) -> Result<Chunk, BlockError> {
    let mut chunk = Chunk::new();
    chunk
        .resize_default(MAX_STRIDE)
        .map_err(|_| BlockError::ChunkTooLarge)?;
    let len = STANDARD.decode_slice(line, &mut chunk).map_err(|e| match e {
        DecodeSliceError::OutputSliceTooSmall => BlockError::ChunkTooLarge,
        DecodeSliceError::DecodeError(_) => BlockError::InvalidBase64,
    })?;
    chunk.truncate(len);
    Ok(chunk)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_str(reader: &mut BlockReader, text: &str) -> std::vec::Vec<Result<BlockEvent, BlockError>> {
        let mut events = std::vec::Vec::new();
        for &b in text.as_bytes() {
            match reader.feed(b) {
                Ok(Some(event)) => events.push(Ok(event)),
                Ok(None) => {}
                Err(e) => events.push(Err(e)),
            }
        }
        events
    }

    fn chunk(bytes: &[u8]) -> BlockEvent {
        BlockEvent::Chunk(Chunk::from_slice(bytes).unwrap())
    }

    #[test]
    fn test_single_block() {
        let mut reader = BlockReader::new();
        let events = feed_str(
            &mut reader,
            "\n-----BEGIN PALETTE-----\n/wAA\n////\n-----END PALETTE-----\n",
        );
        let expected: [Result<BlockEvent, BlockError>; 4] = [
            Ok(BlockEvent::Begin {
                tag: Tag::Palette,
                abandoned: None,
            }),
            Ok(chunk(&[0xff, 0, 0])),
            Ok(chunk(&[0xff, 0xff, 0xff])),
            Ok(BlockEvent::End(Tag::Palette)),
        ];
        assert_eq!(events, expected);
        assert_eq!(reader.open_block(), None);
    }

    #[test]
    fn test_noise_outside_blocks_ignored() {
        let mut reader = BlockReader::new();
        let events = feed_str(&mut reader, "display size 160 128\nbits per pixel 4\n");
        assert!(events.is_empty());
    }

    #[test]
    fn test_crlf_tolerated() {
        let mut reader = BlockReader::new();
        let events = feed_str(&mut reader, "-----BEGIN FRAME-----\r\nAAEC\r\n-----END FRAME-----\r\n");
        assert_eq!(events.len(), 3);
        assert_eq!(events[1], Ok(chunk(&[0, 1, 2])));
    }

    #[test]
    fn test_truncated_block_resyncs_on_begin() {
        let mut reader = BlockReader::new();
        let events = feed_str(
            &mut reader,
            "-----BEGIN FRAME-----\nAAEC\n-----BEGIN PALETTE-----\n////\n-----END PALETTE-----\n",
        );
        assert_eq!(
            events[2],
            Ok(BlockEvent::Begin {
                tag: Tag::Palette,
                abandoned: Some(Tag::Frame)
            })
        );
        assert_eq!(events[4], Ok(BlockEvent::End(Tag::Palette)));
    }

    #[test]
    fn test_corrupt_chunk_drops_block() {
        let mut reader = BlockReader::new();
        let events = feed_str(
            &mut reader,
            "-----BEGIN FRAME-----\nA*EC\nAAEC\n-----END FRAME-----\n",
        );
        assert_eq!(events[1], Err(BlockError::InvalidBase64));
        // Following chunk and END belong to a dropped block
        assert_eq!(events[2], Err(BlockError::UnexpectedEnd));
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_mismatched_end() {
        let mut reader = BlockReader::new();
        let events = feed_str(&mut reader, "-----BEGIN FRAME-----\n-----END PALETTE-----\n");
        assert_eq!(events[1], Err(BlockError::UnexpectedEnd));
        assert_eq!(reader.open_block(), None);
    }

    #[test]
    fn test_unknown_tag() {
        let mut reader = BlockReader::new();
        let events = feed_str(&mut reader, "-----BEGIN CERTIFICATE-----\nAAEC\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], Err(BlockError::UnknownTag));
    }

    #[test]
    fn test_overlong_line_inside_block() {
        let mut reader = BlockReader::new();
        let mut text = std::string::String::from("-----BEGIN FRAME-----\n");
        text.push_str(&"A".repeat(MAX_LINE_LEN + 4));
        text.push('\n');
        let events = feed_str(&mut reader, &text);
        assert_eq!(events[1], Err(BlockError::LineTooLong));

        // Reader recovers for the next block
        let events = feed_str(&mut reader, "-----BEGIN FRAME-----\nAAEC\n-----END FRAME-----\n");
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_overlong_noise_outside_block() {
        let mut reader = BlockReader::new();
        let mut text = "x".repeat(MAX_LINE_LEN * 2);
        text.push('\n');
        assert!(feed_str(&mut reader, &text).is_empty());
    }
}
