//! Main loop logic
//!
//! The [`Orchestrator`] owns all animation state (palette ordering and
//! rotation offset) plus the frozen raster, and decides each tick which
//! blocks go out:
//!
//! | Event   | Blocks, in order                                  |
//! |---------|---------------------------------------------------|
//! | start   | FRAME, PALETTE                                    |
//! | click   | FRAME, then PALETTE if [`ClickPolicy`] says so    |
//! | rotate  | PALETTE, then FRAME if [`RotatePolicy`] says so   |
//!
//! When both events land in the same tick the click is handled first.
//! The raster bytes are never re-encoded into a different form; only the
//! palette ordering changes between sends.

pub mod state;
pub mod stream;

pub use state::{LoopEvent, LoopState};
pub use stream::send_block;

use heapless::Vec;
use huewheel_hal::UartTx;
use huewheel_protocol::{Tag, WireBlock};

use crate::config::{ClickPolicy, ConfigError, RotatePolicy, StreamSettings};
use crate::input::{InputController, InputSample};
use crate::palette::PaletteStore;
use crate::raster::FrozenRaster;
use crate::rotation::RotationScheme;
use crate::traits::RotaryEncoder;

/// Blocks written during one tick, in order
pub type SentBlocks = Vec<Tag, 4>;

/// What happened during one tick
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Input seen this tick
    pub sample: InputSample,
    /// Rotation offset after the tick
    pub offset: usize,
    /// Blocks written, in wire order
    pub sent: SentBlocks,
}

impl TickReport {
    pub fn is_idle(&self) -> bool {
        self.sent.is_empty()
    }
}

/// Failure during one tick of the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoopError<I, T> {
    /// Encoder read failed; nothing was sent
    Input(I),
    /// Sink write failed; the block in flight is incomplete
    Transport(T),
}

/// Loop context for one session
pub struct Orchestrator<'a, S: UartTx> {
    sink: S,
    frame: WireBlock<'a>,
    palette: PaletteStore,
    scheme: RotationScheme,
    settings: StreamSettings,
    input: InputController,
    offset: usize,
    state: LoopState,
}

impl<'a, S: UartTx> Orchestrator<'a, S> {
    /// Build the loop context
    ///
    /// Checks that the palette, the rotation scheme and the palette size
    /// the raster was painted for all agree and that both strides are
    /// usable. The palette is taken in its unrotated order and the offset
    /// starts at 0.
    pub fn new(
        sink: S,
        raster: FrozenRaster<'a>,
        palette: PaletteStore,
        scheme: RotationScheme,
        settings: StreamSettings,
    ) -> Result<Self, ConfigError> {
        if scheme.palette_len() != palette.len() || raster.colors() != palette.len() {
            return Err(ConfigError::PaletteMismatch);
        }
        settings.validate()?;

        let frame = WireBlock::new(Tag::Frame, raster.as_bytes(), settings.frame_stride)
            .map_err(|_| ConfigError::Stride)?
            .with_separator(settings.separator);

        Ok(Self {
            sink,
            frame,
            palette,
            scheme,
            settings,
            input: InputController::new(),
            offset: 0,
            state: LoopState::Idle,
        })
    }

    /// Current rotation offset, in `[0, K)`
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn palette(&self) -> &PaletteStore {
        &self.palette
    }

    pub fn scheme(&self) -> &RotationScheme {
        &self.scheme
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Give the sink back, ending the session
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Unconditional initial send so a new receiver gets a full picture
    pub fn start(&mut self) -> Result<SentBlocks, S::Error> {
        let mut sent = SentBlocks::new();
        self.send(Tag::Frame, &mut sent)?;
        self.send(Tag::Palette, &mut sent)?;
        Ok(sent)
    }

    /// Poll the encoder and act on what it reports
    pub fn tick<E: RotaryEncoder>(
        &mut self,
        encoder: &mut E,
    ) -> Result<TickReport, LoopError<E::Error, S::Error>> {
        let sample = self.input.poll(encoder).map_err(LoopError::Input)?;
        self.handle(sample).map_err(LoopError::Transport)
    }

    /// Act on one tick of input
    ///
    /// The offset and palette ordering are updated before anything is
    /// written, so a transport error leaves the state consistent; the next
    /// send carries the current ordering. A failed click send does not
    /// stop the rotation: both events run and the first error is returned.
    pub fn handle(&mut self, sample: InputSample) -> Result<TickReport, S::Error> {
        let mut sent = SentBlocks::new();
        let mut failure = None;

        if sample.click {
            self.state = self.state.transition(LoopEvent::Click);
            if let Err(e) = self.on_click(&mut sent) {
                failure.get_or_insert(e);
            }
            self.state = self.state.transition(LoopEvent::Done);
        }

        if sample.rotated() {
            self.state = self.state.transition(LoopEvent::Rotate);
            if let Err(e) = self.on_rotate(sample.delta, &mut sent) {
                failure.get_or_insert(e);
            }
            self.state = self.state.transition(LoopEvent::Done);
        }

        if let Some(e) = failure {
            return Err(e);
        }
        Ok(TickReport {
            sample,
            offset: self.offset,
            sent,
        })
    }

    fn on_click(&mut self, sent: &mut SentBlocks) -> Result<(), S::Error> {
        self.send(Tag::Frame, sent)?;
        if self.settings.click == ClickPolicy::FrameAndPalette {
            self.send(Tag::Palette, sent)?;
        }
        Ok(())
    }

    fn on_rotate(&mut self, delta: i32, sent: &mut SentBlocks) -> Result<(), S::Error> {
        let rotation = self.scheme.rotate(self.palette.base(), self.offset, delta);
        self.offset = rotation.offset;
        self.palette.replace(rotation.palette);

        self.send(Tag::Palette, sent)?;
        if self.settings.rotate == RotatePolicy::PaletteAndFrame {
            self.send(Tag::Frame, sent)?;
        }
        Ok(())
    }

    fn send(&mut self, tag: Tag, sent: &mut SentBlocks) -> Result<(), S::Error> {
        match tag {
            Tag::Frame => send_block(&mut self.sink, &self.frame)?,
            Tag::Palette => {
                let bytes = self.palette.to_bytes(self.settings.color_format);
                let block = WireBlock::new(Tag::Palette, &bytes, self.settings.palette_stride)
                    .unwrap_or_else(|_| unreachable!("palette stride checked in new"))
                    .with_separator(self.settings.separator);
                send_block(&mut self.sink, &block)?;
            }
        }
        // At most two blocks per event, two events per tick
        let _ = sent.push(tag);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{Color, ColorFormat};
    use crate::raster::{CheckerPainter, IndexedRaster, Painter, RasterGeometry};
    use huewheel_protocol::{decode_all, Block};

    fn settings() -> StreamSettings {
        StreamSettings {
            frame_stride: 6,
            palette_stride: 60,
            color_format: ColorFormat::Rgb888,
            separator: false,
            click: ClickPolicy::FrameAndPalette,
            rotate: RotatePolicy::PaletteOnly,
        }
    }

    fn colors() -> std::vec::Vec<Color> {
        (0..4).map(|i| Color::rgb(0x10 * i)).collect()
    }

    /// Whole-table rotation over 4 colors with a 2 x 2 raster
    fn with_orchestrator(settings: StreamSettings, f: impl FnOnce(Orchestrator<'_, std::vec::Vec<u8>>)) {
        let geometry = RasterGeometry::for_palette(2, 2, 4).unwrap();
        let mut buf = [0u8; 8];
        let mut raster = IndexedRaster::new(geometry, 4, &mut buf).unwrap();
        raster.set(1, 0, 3).unwrap();
        let orchestrator = Orchestrator::new(
            std::vec::Vec::new(),
            raster.freeze(),
            PaletteStore::new(&colors()).unwrap(),
            RotationScheme::whole_table(4).unwrap(),
            settings,
        )
        .unwrap();
        f(orchestrator)
    }

    fn tags(bytes: &[u8]) -> std::vec::Vec<Tag> {
        decode_all(bytes).into_iter().map(|b| b.tag).collect()
    }

    #[test]
    fn test_start_sends_frame_then_palette() {
        with_orchestrator(settings(), |mut o| {
            let sent = o.start().unwrap();
            assert_eq!(&sent[..], &[Tag::Frame, Tag::Palette]);
            let blocks = decode_all(o.sink());
            assert_eq!(
                blocks[0],
                Block {
                    tag: Tag::Frame,
                    data: std::vec![0b0011_0000, 0, 0, 0, 0, 0, 0, 0]
                }
            );
            assert_eq!(blocks[1].data, [0, 0, 0, 0, 0, 0x10, 0, 0, 0x20, 0, 0, 0x30]);
            assert_eq!(o.offset(), 0);
        });
    }

    #[test]
    fn test_idle_tick_sends_nothing() {
        with_orchestrator(settings(), |mut o| {
            let report = o.handle(InputSample::default()).unwrap();
            assert!(report.is_idle());
            assert!(o.sink().is_empty());
        });
    }

    #[test]
    fn test_click_before_rotate_in_same_tick() {
        with_orchestrator(settings(), |mut o| {
            let report = o.handle(InputSample { click: true, delta: 1 }).unwrap();
            assert_eq!(&report.sent[..], &[Tag::Frame, Tag::Palette, Tag::Palette]);
            assert_eq!(report.offset, 1);
            assert!(o.state().is_idle());

            let blocks = decode_all(o.sink());
            // Click palette is unrotated, rotate palette starts at color 1
            assert_eq!(blocks[1].data[..3], [0, 0, 0]);
            assert_eq!(blocks[2].data[..3], [0, 0, 0x10]);
        });
    }

    #[test]
    fn test_frame_only_click_policy() {
        let settings = StreamSettings {
            click: ClickPolicy::FrameOnly,
            ..settings()
        };
        with_orchestrator(settings, |mut o| {
            o.handle(InputSample { click: true, delta: 0 }).unwrap();
            assert_eq!(tags(o.sink()), [Tag::Frame]);
        });
    }

    #[test]
    fn test_rotate_policy_resends_frame() {
        let settings = StreamSettings {
            rotate: RotatePolicy::PaletteAndFrame,
            ..settings()
        };
        with_orchestrator(settings, |mut o| {
            o.handle(InputSample { click: false, delta: -1 }).unwrap();
            assert_eq!(tags(o.sink()), [Tag::Palette, Tag::Frame]);
            assert_eq!(o.offset(), 3);
        });
    }

    #[test]
    fn test_frame_bytes_never_change() {
        with_orchestrator(settings(), |mut o| {
            o.handle(InputSample { click: true, delta: 0 }).unwrap();
            o.handle(InputSample { click: false, delta: 2 }).unwrap();
            o.handle(InputSample { click: true, delta: 0 }).unwrap();
            let frames: std::vec::Vec<Block> = decode_all(o.sink())
                .into_iter()
                .filter(|b| b.tag == Tag::Frame)
                .collect();
            assert_eq!(frames.len(), 2);
            assert_eq!(frames[0], frames[1]);
        });
    }

    #[test]
    fn test_construction_checks() {
        let geometry = RasterGeometry::for_palette(2, 2, 4).unwrap();
        let mut buf = [0u8; 8];
        let raster = IndexedRaster::new(geometry, 4, &mut buf).unwrap().freeze();
        let palette = || PaletteStore::new(&colors()).unwrap();

        let mismatch = Orchestrator::new(
            std::vec::Vec::new(),
            raster,
            palette(),
            RotationScheme::whole_table(5).unwrap(),
            settings(),
        );
        assert_eq!(mismatch.err(), Some(ConfigError::PaletteMismatch));

        let stride = Orchestrator::new(
            std::vec::Vec::new(),
            raster,
            palette(),
            RotationScheme::whole_table(4).unwrap(),
            StreamSettings {
                palette_stride: 0,
                ..settings()
            },
        );
        assert_eq!(stride.err(), Some(ConfigError::Stride));

        let narrow = RasterGeometry::for_palette(2, 2, 2).unwrap();
        let mut buf = [0u8; 8];
        let narrow = IndexedRaster::new(narrow, 2, &mut buf).unwrap().freeze();
        let depth = Orchestrator::new(
            std::vec::Vec::new(),
            narrow,
            palette(),
            RotationScheme::whole_table(4).unwrap(),
            settings(),
        );
        assert_eq!(depth.err(), Some(ConfigError::PaletteMismatch));
    }

    #[test]
    fn test_raster_painted_for_other_palette_rejected() {
        // Checker pattern uses indices up to 11; a 6-color palette cannot show it
        let geometry = RasterGeometry::for_palette(160, 128, 16).unwrap();
        let mut buf = std::vec![0u8; geometry.buffer_len()];
        let mut raster = IndexedRaster::new(geometry, 16, &mut buf).unwrap();
        CheckerPainter::default().paint(&mut raster).unwrap();
        let raster = raster.freeze();

        let six: std::vec::Vec<Color> = (0..6).map(|i| Color::rgb(0x101010 * i)).collect();
        let result = Orchestrator::new(
            std::vec::Vec::new(),
            raster,
            PaletteStore::new(&six).unwrap(),
            RotationScheme::whole_table(6).unwrap(),
            settings(),
        );
        assert_eq!(result.err(), Some(ConfigError::PaletteMismatch));
    }

    /// Rejects the first `failures` writes, then records
    struct FailingSink {
        failures: usize,
        written: std::vec::Vec<u8>,
    }

    impl UartTx for FailingSink {
        type Error = ();

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err(());
            }
            self.written.extend_from_slice(data);
            Ok(())
        }

        fn flush(&mut self) -> Result<(), ()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_click_send_keeps_rotation() {
        let geometry = RasterGeometry::for_palette(2, 2, 4).unwrap();
        let mut buf = [0u8; 8];
        let raster = IndexedRaster::new(geometry, 4, &mut buf).unwrap().freeze();
        let sink = FailingSink {
            failures: 1,
            written: std::vec::Vec::new(),
        };
        let mut o = Orchestrator::new(
            sink,
            raster,
            PaletteStore::new(&colors()).unwrap(),
            RotationScheme::whole_table(4).unwrap(),
            settings(),
        )
        .unwrap();

        let result = o.handle(InputSample { click: true, delta: 1 });
        assert_eq!(result, Err(()));
        assert_eq!(o.offset(), 1);
        assert!(o.state().is_idle());
        assert_eq!(o.palette().get()[0], colors()[1]);

        // The rotated palette still went out after the broken frame
        let blocks = decode_all(&o.sink().written);
        let last = blocks.last().unwrap();
        assert_eq!(last.tag, Tag::Palette);
        assert_eq!(last.data[..3], [0, 0, 0x10]);
    }
}
