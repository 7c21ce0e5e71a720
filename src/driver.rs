//! Cycle-level control of the JTAG lines.
//!
//! TMS and TDI changes are deferred: they land in a shadow register and are written to
//! the port together with the next falling clock edge.  That keeps every clock pulse at
//! exactly two port writes and means the data lines always change half a period before
//! the rising edge at which the target samples them.
use embedded_hal::delay::DelayNs;

use crate::clock::{elapsed_micros, Monotonic};
use crate::port::{Lines, SignalPort};

/// Output state that has been requested but not yet written to the port.
///
/// Only the clock primitives of `PinDriver` can commit it, which is what guarantees
/// that a TMS or TDI change has no physical effect until the next clock edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingOutput(Lines);

impl PendingOutput {
    pub fn lines(&self) -> Lines {
        self.0
    }

    fn set(&mut self, line: Lines) {
        self.0.insert(line);
    }

    fn clear(&mut self, line: Lines) {
        self.0.remove(line);
    }

    fn commit<P: SignalPort>(&self, port: &mut P) {
        port.write(self.0);
    }
}

/// Bit-bang driver for a JTAG port.
///
/// TCK idles high.  Each pulse drives it low, waits the shortest delay the timer can
/// resolve and drives it high again.  The target shifts TDO out on the falling edge and
/// samples TMS/TDI on the rising edge.
pub struct PinDriver<P, D, C> {
    port: P,
    delay: D,
    clock: C,
    shadow: PendingOutput,
}

impl<P, D, C> PinDriver<P, D, C>
where
    P: SignalPort,
    D: DelayNs,
    C: Monotonic,
{
    /// Take ownership of the port and configure the line directions.  The shadow state
    /// starts with every line low; nothing is written until the first clock pulse.
    pub fn new(mut port: P, delay: D, clock: C) -> Self {
        port.configure();
        Self {
            port,
            delay,
            clock,
            shadow: PendingOutput::default(),
        }
    }

    /// Give back the hardware handles
    pub fn release(self) -> (P, D, C) {
        (self.port, self.delay, self.clock)
    }

    /// The line state that the next clock edge will write
    pub fn output(&self) -> PendingOutput {
        self.shadow
    }

    fn falling_edge(&mut self) {
        self.shadow.clear(Lines::TCK);
        self.shadow.commit(&mut self.port);
        self.delay.delay_us(1);
    }

    fn rising_edge(&mut self) {
        self.shadow.set(Lines::TCK);
        self.shadow.commit(&mut self.port);
    }

    /// Run one TCK cycle, carrying any pending TMS/TDI changes with the falling edge
    #[inline]
    pub fn pulse_clock(&mut self) {
        self.falling_edge();
        self.rising_edge();
    }

    /// Run one TCK cycle and return TDO as it stood between the two edges.
    ///
    /// TDO has to be read before the rising edge: the target updates it on the falling
    /// edge and a read after the rising edge would see the previous bit.
    pub fn pulse_clock_and_sample(&mut self) -> bool {
        self.falling_edge();
        let tdo = self.port.read_tdo();
        self.rising_edge();
        tdo
    }

    /// Keep the TAP clocked for at least `micros` microseconds.
    ///
    /// Run-Test/Idle only counts time while TCK is running, so this pulses the whole
    /// time.  One pulse takes at least a microsecond, so `micros` pulses is a first
    /// approximation; the clock then decides when the deadline has really passed.
    pub fn wait_time(&mut self, micros: u32) {
        let start = self.clock.now_micros();
        for _ in 0..micros {
            self.pulse_clock();
        }
        while elapsed_micros(start, self.clock.now_micros()) < micros {
            self.pulse_clock();
        }
    }

    pub fn set_tms(&mut self) {
        self.shadow.set(Lines::TMS);
    }

    pub fn clr_tms(&mut self) {
        self.shadow.clear(Lines::TMS);
    }

    pub fn set_tdi(&mut self) {
        self.shadow.set(Lines::TDI);
    }

    pub fn clr_tdi(&mut self) {
        self.shadow.clear(Lines::TDI);
    }

    /// Set or clear TMS; takes effect with the next clock pulse
    pub fn put_tms(&mut self, high: bool) {
        if high {
            self.set_tms()
        } else {
            self.clr_tms()
        }
    }

    /// Set or clear TDI; takes effect with the next clock pulse
    pub fn put_tdi(&mut self, high: bool) {
        if high {
            self.set_tdi()
        } else {
            self.clr_tdi()
        }
    }
}
