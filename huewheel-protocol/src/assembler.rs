//! Host-side block assembly
//!
//! Wraps [`BlockReader`] and concatenates chunk payloads so the host gets
//! whole frames and palettes. Broken blocks are counted and dropped.

use std::vec::Vec;

use crate::block::Tag;
use crate::reader::{BlockEvent, BlockReader};

/// A fully received block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub tag: Tag,
    pub data: Vec<u8>,
}

/// Collects complete blocks from a byte stream
#[derive(Debug, Default)]
pub struct BlockAssembler {
    reader: BlockReader,
    pending: Vec<u8>,
    discarded: usize,
}

impl BlockAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blocks dropped so far (truncated or corrupt)
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Feed bytes and return every block completed by them
    pub fn push(&mut self, bytes: &[u8]) -> Vec<Block> {
        let mut done = Vec::new();
        for &byte in bytes {
            let was_open = self.reader.open_block().is_some();
            match self.reader.feed(byte) {
                Ok(Some(BlockEvent::Begin { abandoned, .. })) => {
                    if abandoned.is_some() {
                        self.discarded += 1;
                    }
                    self.pending.clear();
                }
                Ok(Some(BlockEvent::Chunk(chunk))) => self.pending.extend_from_slice(&chunk),
                Ok(Some(BlockEvent::End(tag))) => done.push(Block {
                    tag,
                    data: core::mem::take(&mut self.pending),
                }),
                Ok(None) => {}
                // Stray markers after a drop belong to no block
                Err(_) => {
                    if was_open {
                        self.discarded += 1;
                    }
                    self.pending.clear();
                }
            }
        }
        done
    }
}

/// Decode every complete block in `bytes`
pub fn decode_all(bytes: &[u8]) -> Vec<Block> {
    BlockAssembler::new().push(bytes)
}
