#![no_std]

pub mod clock;
pub mod controller;
pub mod curve;
pub mod engine;
pub mod error;
pub mod mode;
pub mod pulse;
pub mod waveform;

pub use clock::{Clock, CounterClock, SystemClock, Timebase, WrappingCounter};
pub use controller::{OscillatorState, PhaseController};
pub use curve::{BrightnessCurve, PulsePlan};
pub use engine::{CrossfadeConfig, CrossfadeEngine, PollOutcome};
pub use error::{Error, PinId};
pub use mode::{Mode, ModeState};
pub use pulse::PulseScheduler;
pub use waveform::{WaveformError, WaveformTable};
pub use embassy_time::{Duration, Instant};

/// Analog dimmer input
///
/// Implement this trait over the platform ADC. The reading is a raw
/// integer in `[0, max_raw]`; values above that range are clamped.
pub trait DimmerInput {
    /// Sample the dimmer
    fn read_raw(&mut self) -> u16;
}

impl<F: FnMut() -> u16> DimmerInput for F {
    fn read_raw(&mut self) -> u16 {
        self()
    }
}
