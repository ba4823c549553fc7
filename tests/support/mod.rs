//! Virtual hardware for host tests
//!
//! Pins, switch, dimmer and time all share one bench so pin events can be
//! checked against the virtual clock.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};
use myrtio_crossfade::{Clock, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Warm,
    Cool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinEvent {
    pub at_us: u64,
    pub channel: Channel,
    pub high: bool,
}

#[derive(Default)]
struct BenchState {
    now_us: Cell<u64>,
    events: RefCell<Vec<PinEvent>>,
    delays: RefCell<Vec<u32>>,
    switch_low: Cell<bool>,
    dimmer: Cell<u16>,
}

#[derive(Clone, Default)]
pub struct Bench {
    state: Rc<BenchState>,
}

impl Bench {
    pub fn new() -> Self {
        let bench = Self::default();
        bench.set_dimmer(1023);
        bench
    }

    pub fn warm_pin(&self) -> FakePin {
        FakePin {
            channel: Channel::Warm,
            state: Rc::clone(&self.state),
        }
    }

    pub fn cool_pin(&self) -> FakePin {
        FakePin {
            channel: Channel::Cool,
            state: Rc::clone(&self.state),
        }
    }

    pub fn switch(&self) -> FakeSwitch {
        FakeSwitch {
            state: Rc::clone(&self.state),
        }
    }

    pub fn dimmer(&self) -> impl FnMut() -> u16 + use<> {
        let state = Rc::clone(&self.state);
        move || state.dimmer.get()
    }

    pub fn timebase(&self) -> FakeTime {
        FakeTime {
            state: Rc::clone(&self.state),
        }
    }

    pub fn now_us(&self) -> u64 {
        self.state.now_us.get()
    }

    pub fn advance_us(&self, us: u64) {
        self.state.now_us.set(self.state.now_us.get() + us);
    }

    pub fn set_switch_low(&self, low: bool) {
        self.state.switch_low.set(low);
    }

    pub fn set_dimmer(&self, raw: u16) {
        self.state.dimmer.set(raw);
    }

    pub fn events(&self) -> Vec<PinEvent> {
        self.state.events.borrow().clone()
    }

    pub fn delays(&self) -> Vec<u32> {
        self.state.delays.borrow().clone()
    }

    pub fn clear(&self) {
        self.state.events.borrow_mut().clear();
        self.state.delays.borrow_mut().clear();
    }

    /// Replay the event log and assert both channels are never high together
    pub fn assert_no_overlap(&self) {
        let mut warm = false;
        let mut cool = false;
        for event in self.events() {
            match event.channel {
                Channel::Warm => warm = event.high,
                Channel::Cool => cool = event.high,
            }
            assert!(!(warm && cool), "both channels high at {}us", event.at_us);
        }
    }

    /// Output levels after the last recorded event
    pub fn levels(&self) -> (bool, bool) {
        let mut warm = false;
        let mut cool = false;
        for event in self.events() {
            match event.channel {
                Channel::Warm => warm = event.high,
                Channel::Cool => cool = event.high,
            }
        }
        (warm, cool)
    }
}

pub struct FakePin {
    channel: Channel,
    state: Rc<BenchState>,
}

impl FakePin {
    fn record(&self, high: bool) {
        self.state.events.borrow_mut().push(PinEvent {
            at_us: self.state.now_us.get(),
            channel: self.channel,
            high,
        });
    }
}

impl ErrorType for FakePin {
    type Error = Infallible;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.record(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.record(true);
        Ok(())
    }
}

pub struct FakeSwitch {
    state: Rc<BenchState>,
}

impl ErrorType for FakeSwitch {
    type Error = Infallible;
}

impl InputPin for FakeSwitch {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.state.switch_low.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.state.switch_low.get())
    }
}

pub struct FakeTime {
    state: Rc<BenchState>,
}

impl Clock for FakeTime {
    fn now(&mut self) -> Instant {
        Instant::from_micros(self.state.now_us.get())
    }
}

impl DelayNs for FakeTime {
    fn delay_ns(&mut self, ns: u32) {
        let us = u64::from(ns).div_ceil(1000);
        self.state.now_us.set(self.state.now_us.get() + us);
    }

    fn delay_us(&mut self, us: u32) {
        self.state.delays.borrow_mut().push(us);
        self.state.now_us.set(self.state.now_us.get() + u64::from(us));
    }
}

/// Output pin whose every write fails
pub struct BrokenPin;

#[derive(Debug)]
pub struct BrokenPinError;

impl embedded_hal::digital::Error for BrokenPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl ErrorType for BrokenPin {
    type Error = BrokenPinError;
}

impl OutputPin for BrokenPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Err(BrokenPinError)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Err(BrokenPinError)
    }
}
