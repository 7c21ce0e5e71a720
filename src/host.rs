//! `std` implementations of the timing traits, for running the driver and channel on a
//! host (simulators, test benches, USB bit-bang adapters).
use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;

use crate::clock::Monotonic;

/// Wall-clock time and sleeping delays backed by `std::time`
#[derive(Clone, Copy, Debug)]
pub struct StdClock {
    origin: Instant,
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl StdClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Monotonic for StdClock {
    fn now_micros(&mut self) -> u32 {
        // Truncation gives the wrapping counter the trait expects
        self.origin.elapsed().as_micros() as u32
    }
}

impl DelayNs for StdClock {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(ns.into()));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms.into()));
    }
}
