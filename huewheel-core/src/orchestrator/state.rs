//! Per-tick loop state
//!
//! The loop is idle between ticks. Within a tick a click is handled first
//! and a rotation second, each passing through its own event state and
//! back to idle once its blocks are written.

/// Loop states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoopState {
    /// Nothing pending
    #[default]
    Idle,
    /// Re-sending the frame (and palette, by policy) after a click
    ClickEvent,
    /// Re-sending the palette (and frame, by policy) after a rotation
    RotateEvent,
}

/// Events driving [`LoopState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoopEvent {
    /// Button rising edge
    Click,
    /// Non-zero encoder delta
    Rotate,
    /// Blocks for the current event written, or the write failed
    Done,
}

impl LoopState {
    pub fn is_idle(&self) -> bool {
        matches!(self, LoopState::Idle)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: LoopEvent) -> Self {
        use LoopEvent::*;
        use LoopState::*;

        match (self, event) {
            (Idle, Click) => ClickEvent,
            (Idle, Rotate) => RotateEvent,
            (_, Done) => Idle,

            // An event arriving while another is in flight waits its turn
            (state, _) => state,
        }
    }
}
