//! Wire block protocol for the Huewheel serial link
//!
//! The firmware streams two kinds of data to the host: the indexed frame
//! (raw packed pixel indices) and the color palette. Both travel as
//! *wire blocks*, a PEM-like text envelope that survives any 7-bit-clean
//! terminal link:
//!
//! ```text
//! -----BEGIN FRAME-----
//! <base64 of bytes 0..stride>
//! <base64 of bytes stride..2*stride>
//! ...
//! <base64 of the final partial chunk>
//! -----END FRAME-----
//! ```
//!
//! Every chunk line is an independent base64 unit, so the sender never
//! needs more than one line of scratch space and a receiver that loses a
//! line can drop the block and pick up again at the next `BEGIN` marker.
//!
//! - [`WireBlock`] / [`BlockLines`] produce the lines of one block
//! - [`BlockReader`] is a byte-fed, resynchronizing parser
//! - [`BlockAssembler`] (feature `std`) collects complete blocks on the host

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod block;
pub mod reader;
#[cfg(any(test, feature = "std"))]
pub mod assembler;

pub use block::{BlockLines, EncodeError, Line, Tag, WireBlock, MAX_LINE_LEN, MAX_STRIDE};
pub use reader::{BlockError, BlockEvent, BlockReader, Chunk};
#[cfg(any(test, feature = "std"))]
pub use assembler::{decode_all, Block, BlockAssembler};
