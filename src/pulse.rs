//! Alternating pulse emission
//!
//! The warm and cool channels share a center-tapped driver, so they must
//! never be high at the same time. Every transition drives the opposite
//! channel low before raising the other one.

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::curve::PulsePlan;
use crate::error::{Error, PinId};

/// Emits one warm slot followed by one cool slot per call.
pub struct PulseScheduler<W: OutputPin, C: OutputPin> {
    warm: W,
    cool: C,
    half_period: Duration,
}

impl<W: OutputPin, C: OutputPin> PulseScheduler<W, C> {
    /// Create a scheduler; outputs are not touched until the first call
    pub const fn new(warm: W, cool: C, half_period: Duration) -> Self {
        Self {
            warm,
            cool,
            half_period,
        }
    }

    pub const fn half_period(&self) -> Duration {
        self.half_period
    }

    /// Drive both channels low
    pub fn all_off(&mut self) -> Result<(), Error> {
        self.warm_low()?;
        self.cool_low()
    }

    /// Emit the plan, blocking for two full half-periods.
    ///
    /// On-times longer than the half-period are capped to it.
    pub fn emit<D: DelayNs>(&mut self, plan: PulsePlan, delay: &mut D) -> Result<(), Error> {
        let warm_on = plan.warm_on.min(self.half_period);
        let cool_on = plan.cool_on.min(self.half_period);

        // Warm slot
        self.cool_low()?;
        self.warm_high()?;
        hold(delay, warm_on);
        self.warm_low()?;
        hold(delay, self.half_period - warm_on);

        // Cool slot
        self.warm_low()?;
        self.cool_high()?;
        hold(delay, cool_on);
        self.cool_low()?;
        hold(delay, self.half_period - cool_on);

        Ok(())
    }

    /// Give the output pins back
    pub fn release(self) -> (W, C) {
        (self.warm, self.cool)
    }

    fn warm_high(&mut self) -> Result<(), Error> {
        self.warm.set_high().map_err(|err| Error::pin(PinId::Warm, &err))
    }

    fn warm_low(&mut self) -> Result<(), Error> {
        self.warm.set_low().map_err(|err| Error::pin(PinId::Warm, &err))
    }

    fn cool_high(&mut self) -> Result<(), Error> {
        self.cool.set_high().map_err(|err| Error::pin(PinId::Cool, &err))
    }

    fn cool_low(&mut self) -> Result<(), Error> {
        self.cool.set_low().map_err(|err| Error::pin(PinId::Cool, &err))
    }
}

/// Busy-wait for `duration`; zero-length holds are skipped
fn hold<D: DelayNs>(delay: &mut D, duration: Duration) {
    let micros = duration.as_micros();
    if micros == 0 {
        return;
    }
    delay.delay_us(u32::try_from(micros).unwrap_or(u32::MAX));
}
