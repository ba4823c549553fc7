mod tests {
    use std::cell::Cell;

    use embedded_hal::delay::DelayNs;
    use myrtio_crossfade::{Clock, CounterClock, Instant, SystemClock, Timebase, WrappingCounter};

    /// Delay that records requests and moves a shared counter forward
    struct CountingDelay<'a> {
        raw: &'a Cell<u32>,
        requested_us: Vec<u32>,
    }

    impl DelayNs for CountingDelay<'_> {
        fn delay_ns(&mut self, ns: u32) {
            self.raw.set(self.raw.get().wrapping_add(ns.div_ceil(1000)));
        }

        fn delay_us(&mut self, us: u32) {
            self.requested_us.push(us);
            self.raw.set(self.raw.get().wrapping_add(us));
        }
    }

    #[test]
    fn test_wrapping_counter() {
        let mut counter = WrappingCounter::new(u32::MAX - 10);
        assert_eq!(counter.extend(u32::MAX - 10), Instant::from_micros(0));
        assert_eq!(counter.extend(u32::MAX), Instant::from_micros(10));
        assert_eq!(counter.extend(5), Instant::from_micros(16));
        assert_eq!(counter.extend(1_005), Instant::from_micros(1_016));
    }

    #[test]
    fn test_counter_clock_survives_wrap() {
        let raw = Cell::new(4_000_000_000u32);
        let mut clock = CounterClock::new(|| raw.get());
        assert_eq!(clock.now(), Instant::from_micros(0));

        let mut previous = clock.now();
        for _ in 0..100 {
            raw.set(raw.get().wrapping_add(10_000_000));
            let now = clock.now();
            assert_eq!(now.duration_since(previous).as_micros(), 10_000_000);
            previous = now;
        }
        assert_eq!(previous, Instant::from_micros(1_000_000_000));
    }

    #[test]
    fn test_timebase_passes_through() {
        let raw = Cell::new(u32::MAX - 500);
        let clock = CounterClock::new(|| raw.get());
        let delay = CountingDelay {
            raw: &raw,
            requested_us: Vec::new(),
        };
        let mut timebase = Timebase::new(clock, delay);

        assert_eq!(timebase.now(), Instant::from_micros(0));
        timebase.delay_us(300);
        timebase.delay_us(700);
        assert_eq!(timebase.now(), Instant::from_micros(1_000));

        let (mut clock, delay) = timebase.release();
        assert_eq!(delay.requested_us, vec![300, 700]);
        assert_eq!(clock.now(), Instant::from_micros(1_000));
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let mut clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
