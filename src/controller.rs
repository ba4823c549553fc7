//! Phase and mode controller
//!
//! Owns the oscillator phase and the current mode. The phase advances in
//! proportion to elapsed time, at most once per update interval.

use core::f32::consts::TAU;

use embassy_time::{Duration, Instant};
use embedded_hal::digital::PinState;

use crate::DimmerInput;
use crate::engine::CrossfadeConfig;
use crate::mode::{Mode, ModeState};
use crate::waveform::WaveformTable;

/// Mutable oscillator state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorState {
    /// Phase in radians, always in `[0, 2π)`
    phase: f32,
    /// Time of the last successful update
    last_step: Instant,
    /// Normalized dimmer reading in `[0, 1]`
    dimmer: f32,
}

impl OscillatorState {
    pub const fn new(now: Instant) -> Self {
        Self {
            phase: 0.0,
            last_step: now,
            dimmer: 0.0,
        }
    }

    pub const fn phase(&self) -> f32 {
        self.phase
    }

    pub const fn last_step(&self) -> Instant {
        self.last_step
    }

    pub const fn dimmer(&self) -> f32 {
        self.dimmer
    }

    /// Advance the phase by `elapsed` out of a full `cycle`
    #[allow(clippy::cast_precision_loss)]
    pub fn advance(&mut self, elapsed: Duration, cycle: Duration) {
        let cycle_us = cycle.as_micros().max(1);
        let within_cycle = elapsed.as_micros() % cycle_us;
        self.phase += TAU * (within_cycle as f32 / cycle_us as f32);
        while self.phase >= TAU {
            self.phase -= TAU;
        }
        if !(0.0..TAU).contains(&self.phase) {
            self.phase = 0.0;
        }
    }

    fn reset(&mut self, now: Instant) {
        self.phase = 0.0;
        self.last_step = now;
    }
}

/// Drives the oscillator from elapsed time and the physical inputs.
#[derive(Debug, Clone)]
pub struct PhaseController {
    oscillator: OscillatorState,
    modes: ModeState,
    cycle_period: Duration,
    update_interval: Duration,
    dimmer_max_raw: u16,
}

impl PhaseController {
    /// Create a controller in crossfade mode at phase zero
    pub fn new(config: &CrossfadeConfig, now: Instant) -> Self {
        Self {
            oscillator: OscillatorState::new(now),
            modes: ModeState::new(),
            cycle_period: config.cycle_period,
            update_interval: config.update_interval,
            dimmer_max_raw: config.dimmer_max_raw,
        }
    }

    pub const fn mode(&self) -> Mode {
        self.modes.mode()
    }

    pub const fn oscillator(&self) -> &OscillatorState {
        &self.oscillator
    }

    pub const fn modes(&self) -> &ModeState {
        &self.modes
    }

    /// Feed one switch reading.
    ///
    /// On a mode change the phase and the step timestamp are reset and the
    /// new mode is returned; the caller must force both channels off.
    pub fn observe_switch(&mut self, level: PinState, now: Instant) -> Option<Mode> {
        let mode = self.modes.observe(level)?;
        self.oscillator.reset(now);
        Some(mode)
    }

    /// Run the rate-limited update.
    ///
    /// Returns `false` without touching any state if less than the update
    /// interval has passed since the last successful update.
    pub fn update<D: DimmerInput>(&mut self, now: Instant, dimmer: &mut D) -> bool {
        let elapsed = now.saturating_duration_since(self.oscillator.last_step);
        if elapsed < self.update_interval {
            return false;
        }

        if self.modes.mode().advances_phase() {
            self.oscillator.advance(elapsed, self.cycle_period);
        }
        self.oscillator.dimmer = self.normalize(dimmer.read_raw());
        self.oscillator.last_step = now;
        true
    }

    /// Blend value for the current mode
    pub fn blend<const N: usize>(&self, table: &WaveformTable<N>) -> f32 {
        match self.modes.mode() {
            Mode::Crossfade => table.at(self.oscillator.phase),
            Mode::AllOn => 0.0,
        }
    }

    fn normalize(&self, raw: u16) -> f32 {
        let max = f32::from(self.dimmer_max_raw.max(1));
        (f32::from(raw) / max).clamp(0.0, 1.0)
    }
}
