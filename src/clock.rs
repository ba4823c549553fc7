//! Time sources
//!
//! The engine reads time through [`Clock`] and busy-waits through
//! [`DelayNs`], so host tests can drive it with a virtual clock.

use embassy_time::Instant;
use embedded_hal::delay::DelayNs;

/// Monotonic time source
pub trait Clock {
    /// Current instant
    fn now(&mut self) -> Instant;
}

/// Clock backed by the embassy time driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&mut self) -> Instant {
        Instant::now()
    }
}

/// Extends a wrapping 32-bit microsecond counter into a monotonic [`Instant`].
///
/// Each read adds the wraparound-safe difference to the previous read, so
/// the counter may overflow any number of times as long as it is sampled
/// at least once per wrap (about 71 minutes at 1 MHz).
#[derive(Debug, Clone, Copy)]
pub struct WrappingCounter {
    last_raw: u32,
    micros: u64,
}

impl WrappingCounter {
    /// Start counting from the raw value `raw`
    pub const fn new(raw: u32) -> Self {
        Self {
            last_raw: raw,
            micros: 0,
        }
    }

    /// Feed a new raw reading and return the extended instant
    pub fn extend(&mut self, raw: u32) -> Instant {
        let delta = raw.wrapping_sub(self.last_raw);
        self.last_raw = raw;
        self.micros = self.micros.saturating_add(u64::from(delta));
        Instant::from_micros(self.micros)
    }
}

/// [`Clock`] over a raw wrapping microsecond counter read by a closure.
pub struct CounterClock<F: FnMut() -> u32> {
    read: F,
    counter: WrappingCounter,
}

impl<F: FnMut() -> u32> CounterClock<F> {
    /// Create a clock; the first read becomes instant zero
    pub fn new(mut read: F) -> Self {
        let counter = WrappingCounter::new(read());
        Self { read, counter }
    }
}

impl<F: FnMut() -> u32> Clock for CounterClock<F> {
    fn now(&mut self) -> Instant {
        let raw = (self.read)();
        self.counter.extend(raw)
    }
}

/// A clock paired with a busy-wait delay.
pub struct Timebase<C: Clock, D: DelayNs> {
    clock: C,
    delay: D,
}

impl<C: Clock, D: DelayNs> Timebase<C, D> {
    pub const fn new(clock: C, delay: D) -> Self {
        Self { clock, delay }
    }

    /// Split back into clock and delay
    pub fn release(self) -> (C, D) {
        (self.clock, self.delay)
    }
}

impl<C: Clock, D: DelayNs> Clock for Timebase<C, D> {
    fn now(&mut self) -> Instant {
        self.clock.now()
    }
}

impl<C: Clock, D: DelayNs> DelayNs for Timebase<C, D> {
    fn delay_ns(&mut self, ns: u32) {
        self.delay.delay_ns(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
