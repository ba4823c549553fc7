//! Crossfade engine: owns the hardware and runs the poll loop

use core::convert::Infallible;

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin, PinState};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::DimmerInput;
use crate::clock::Clock;
use crate::controller::PhaseController;
use crate::curve::{BrightnessCurve, PulsePlan};
use crate::error::{Error, PinId};
use crate::mode::Mode;
use crate::pulse::PulseScheduler;
use crate::waveform::WaveformTable;

/// Default duration of one full crossfade cycle.
pub const DEFAULT_CYCLE_PERIOD: Duration = Duration::from_millis(5000);

/// Default minimum time between oscillator updates.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_micros(5000);

/// Default pause between poll iterations in [`CrossfadeEngine::run`].
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Default blend frequency (one warm and one cool slot per cycle).
pub const DEFAULT_BLEND_FREQUENCY_HZ: u32 = 500;

/// Default full-scale dimmer reading (10-bit ADC).
pub const DEFAULT_DIMMER_MAX_RAW: u16 = 1023;

/// Configuration for the crossfade engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossfadeConfig {
    /// Time for one full warm-to-cool-to-warm cycle
    pub cycle_period: Duration,
    /// Minimum time between oscillator updates
    pub update_interval: Duration,
    /// Pause between poll iterations
    pub poll_interval: Duration,
    /// Blend frequency in Hz
    pub blend_frequency_hz: u32,
    /// Dimmer reading that maps to full brightness
    pub dimmer_max_raw: u16,
    /// Brightness curve
    pub curve: BrightnessCurve,
}

impl Default for CrossfadeConfig {
    fn default() -> Self {
        Self {
            cycle_period: DEFAULT_CYCLE_PERIOD,
            update_interval: DEFAULT_UPDATE_INTERVAL,
            poll_interval: DEFAULT_POLL_INTERVAL,
            blend_frequency_hz: DEFAULT_BLEND_FREQUENCY_HZ,
            dimmer_max_raw: DEFAULT_DIMMER_MAX_RAW,
            curve: BrightnessCurve::default(),
        }
    }
}

impl CrossfadeConfig {
    /// Length of one channel slot
    pub fn half_period(&self) -> Duration {
        Duration::from_micros(500_000 / u64::from(self.blend_frequency_hz.max(1)))
    }
}

/// What a single poll iteration did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The switch selected a new mode; both channels were forced off
    ModeChanged(Mode),
    /// The update interval has not elapsed yet
    Idle,
    /// The oscillator advanced and a pulse pair was emitted
    Pulsed(PulsePlan),
}

/// Crossfade engine - the main orchestrator
///
/// Owns the hardware and runs the poll loop: switch check, rate-limited
/// oscillator update, then one blocking pulse pair.
pub struct CrossfadeEngine<W, C, S, D, T, const N: usize>
where
    W: OutputPin,
    C: OutputPin,
    S: InputPin,
    D: DimmerInput,
    T: Clock + DelayNs,
{
    // External dependencies and configuration
    switch: S,
    dimmer: D,
    timebase: T,
    config: CrossfadeConfig,

    // Internal state
    table: WaveformTable<N>,
    controller: PhaseController,

    // Internal dependencies
    scheduler: PulseScheduler<W, C>,
}

impl<W, C, S, D, T, const N: usize> CrossfadeEngine<W, C, S, D, T, N>
where
    W: OutputPin,
    C: OutputPin,
    S: InputPin,
    D: DimmerInput,
    T: Clock + DelayNs,
{
    /// Create a new engine in crossfade mode.
    ///
    /// Outputs are left untouched until [`start`](Self::start) or the first
    /// poll.
    pub fn new(
        table: WaveformTable<N>,
        warm: W,
        cool: C,
        switch: S,
        dimmer: D,
        mut timebase: T,
        config: &CrossfadeConfig,
    ) -> Self {
        let now = timebase.now();
        Self {
            switch,
            dimmer,
            timebase,
            config: *config,
            table,
            controller: PhaseController::new(config, now),
            scheduler: PulseScheduler::new(warm, cool, config.half_period()),
        }
    }

    /// Force both channels off before the first poll
    pub fn start(&mut self) -> Result<(), Error> {
        #[cfg(feature = "esp32-log")]
        println!(
            "[CrossfadeEngine.start] cycle {}ms, half-period {}us, mode {}",
            self.config.cycle_period.as_millis(),
            self.scheduler.half_period().as_micros(),
            self.controller.mode().as_str()
        );
        self.scheduler.all_off()
    }

    /// Run one poll iteration
    pub fn poll(&mut self) -> Result<PollOutcome, Error> {
        let now = self.timebase.now();
        let level = self.read_switch()?;

        if let Some(mode) = self.controller.observe_switch(level, now) {
            #[cfg(feature = "esp32-log")]
            println!("[CrossfadeEngine] mode: {}", mode.as_str());
            self.scheduler.all_off()?;
            return Ok(PollOutcome::ModeChanged(mode));
        }

        if !self.controller.update(now, &mut self.dimmer) {
            return Ok(PollOutcome::Idle);
        }

        let plan = self.plan();
        self.scheduler.emit(plan, &mut self.timebase)?;
        Ok(PollOutcome::Pulsed(plan))
    }

    /// Poll forever, pausing `poll_interval` between iterations.
    ///
    /// Only returns if a pin operation fails.
    pub fn run(&mut self) -> Result<Infallible, Error> {
        self.start()?;
        let pause = u32::try_from(self.config.poll_interval.as_micros()).unwrap_or(u32::MAX);
        loop {
            self.poll()?;
            if pause > 0 {
                self.timebase.delay_us(pause);
            }
        }
    }

    /// Pulse plan for the current oscillator state
    pub fn plan(&self) -> PulsePlan {
        let blend = self.controller.blend(&self.table);
        self.config.curve.plan(
            blend,
            self.controller.oscillator().dimmer(),
            self.scheduler.half_period(),
        )
    }

    pub const fn controller(&self) -> &PhaseController {
        &self.controller
    }

    pub const fn config(&self) -> &CrossfadeConfig {
        &self.config
    }

    pub const fn mode(&self) -> Mode {
        self.controller.mode()
    }

    fn read_switch(&mut self) -> Result<PinState, Error> {
        let high = self
            .switch
            .is_high()
            .map_err(|err| Error::pin(PinId::ModeSwitch, &err))?;
        Ok(PinState::from(high))
    }
}
