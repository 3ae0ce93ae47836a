//! Block output to the serial sink

use huewheel_hal::UartTx;
use huewheel_protocol::WireBlock;

/// Write every line of `block`, then flush
///
/// Lines are encoded one at a time; nothing larger than a single line is
/// ever buffered. A failed write abandons the rest of the block, which the
/// receiver drops when the next `BEGIN` arrives.
pub fn send_block<S: UartTx + ?Sized>(sink: &mut S, block: &WireBlock<'_>) -> Result<(), S::Error> {
    for line in block.lines() {
        sink.write_blocking(&line)?;
    }
    sink.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use huewheel_protocol::Tag;

    /// Fails after accepting `limit` writes
    struct Flaky {
        written: std::vec::Vec<u8>,
        limit: usize,
    }

    impl UartTx for Flaky {
        type Error = ();

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
            if self.limit == 0 {
                return Err(());
            }
            self.limit -= 1;
            self.written.extend_from_slice(data);
            Ok(())
        }

        fn flush(&mut self) -> Result<(), ()> {
            Ok(())
        }
    }

    #[test]
    fn test_send_block_layout() {
        let mut sink = std::vec::Vec::new();
        let block = WireBlock::new(Tag::Palette, &[0xff, 0, 0], 60)
            .unwrap()
            .with_separator(true);
        send_block(&mut sink, &block).unwrap();
        assert_eq!(
            sink,
            b"\n-----BEGIN PALETTE-----\n/wAA\n-----END PALETTE-----\n"
        );
        assert_eq!(sink.len(), block.encoded_len());
    }

    #[test]
    fn test_write_error_stops_block() {
        let mut sink = Flaky {
            written: std::vec::Vec::new(),
            limit: 2,
        };
        let block = WireBlock::new(Tag::Frame, &[1, 2, 3, 4, 5, 6], 3).unwrap();
        assert_eq!(send_block(&mut sink, &block), Err(()));
        assert_eq!(sink.written, b"-----BEGIN FRAME-----\nAQID\n");
    }
}
