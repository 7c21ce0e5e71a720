//! The four JTAG signal lines and the ports they live on.
//!
//! `Lines` is a logical bitmask; how those bits land on hardware is up to the
//! `SignalPort` implementation.  Two are provided: `MappedPort`, for the classic
//! arrangement where all outputs share one port register and are written in a single
//! store, and `GpioPort`, which drives individual embedded-hal pins.
use core::convert::Infallible;

use embedded_hal::digital::{InputPin, OutputPin, PinState};

/// A set of JTAG signal lines
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lines(u8);

impl Lines {
    pub const NONE: Lines = Lines(0);
    pub const TMS: Lines = Lines(1 << 0);
    pub const TDI: Lines = Lines(1 << 1);
    pub const TDO: Lines = Lines(1 << 2);
    pub const TCK: Lines = Lines(1 << 3);
    /// The lines driven by the adapter
    pub const OUTPUTS: Lines = Lines(Self::TMS.0 | Self::TDI.0 | Self::TCK.0);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Lines) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Lines) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Lines) {
        self.0 &= !other.0;
    }

    #[must_use]
    pub const fn with(self, other: Lines) -> Lines {
        Lines(self.0 | other.0)
    }

    #[must_use]
    pub const fn without(self, other: Lines) -> Lines {
        Lines(self.0 & !other.0)
    }
}

/// Physical access to the JTAG lines.
///
/// Implementations should make each call to `write` a single, cheap store; the driver
/// counts on it to keep the clock edges tight.
pub trait SignalPort {
    /// Set TMS, TDI and TCK as outputs and TDO as an input.
    fn configure(&mut self);
    /// Drive every output line to the state given in `lines`.  TDO is ignored.
    fn write(&mut self, lines: Lines);
    /// Sample the TDO line.
    fn read_tdo(&mut self) -> bool;
}

/// Bit positions of the JTAG lines on an 8-bit port
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinMap {
    pub tms: u8,
    pub tdi: u8,
    pub tdo: u8,
    pub tck: u8,
}

impl Default for PinMap {
    /// TMS, TDI, TDO and TCK on bits 0 to 3
    fn default() -> Self {
        Self { tms: 0, tdi: 1, tdo: 2, tck: 3 }
    }
}

impl PinMap {
    /// Translate logical lines into a port value
    pub fn encode(&self, lines: Lines) -> u8 {
        let mut value = 0;
        if lines.contains(Lines::TMS) {
            value |= 1 << self.tms;
        }
        if lines.contains(Lines::TDI) {
            value |= 1 << self.tdi;
        }
        if lines.contains(Lines::TDO) {
            value |= 1 << self.tdo;
        }
        if lines.contains(Lines::TCK) {
            value |= 1 << self.tck;
        }
        value
    }

    /// Mask of the port bits that must be configured as outputs
    pub fn output_mask(&self) -> u8 {
        self.encode(Lines::OUTPUTS)
    }
}

/// A raw 8-bit GPIO port register, like an AVR `PORTx`/`PINx`/`DDRx` triple.
pub trait PortRegister {
    /// Configure the bits set in `outputs` as outputs and the rest as inputs.
    fn set_direction(&mut self, outputs: u8);
    fn write(&mut self, value: u8);
    fn read(&mut self) -> u8;
}

/// All four lines on one port register, translated through a `PinMap`
pub struct MappedPort<R> {
    register: R,
    map: PinMap,
}

impl<R: PortRegister> MappedPort<R> {
    pub fn new(register: R, map: PinMap) -> Self {
        Self { register, map }
    }

    pub fn release(self) -> R {
        self.register
    }
}

impl<R: PortRegister> SignalPort for MappedPort<R> {
    fn configure(&mut self) {
        self.register.set_direction(self.map.output_mask());
    }

    fn write(&mut self, lines: Lines) {
        self.register.write(self.map.encode(lines.without(Lines::TDO)));
    }

    fn read_tdo(&mut self) -> bool {
        self.register.read() & (1 << self.map.tdo) != 0
    }
}

/// Four independent embedded-hal pins.
///
/// The pins must be infallible, which is the case for memory-mapped GPIO on every
/// common microcontroller HAL.  A write updates TMS and TDI before TCK so the data
/// lines are settled by the time the clock edge arrives.
pub struct GpioPort<Clk, Tdi, Tdo, Tms> {
    clock: Clk,
    tdi: Tdi,
    tdo: Tdo,
    tms: Tms,
}

fn settle<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

impl<Clk, Tdi, Tdo, Tms> GpioPort<Clk, Tdi, Tdo, Tms>
where
    Clk: OutputPin<Error = Infallible>,
    Tdi: OutputPin<Error = Infallible>,
    Tdo: InputPin<Error = Infallible>,
    Tms: OutputPin<Error = Infallible>,
{
    /// The pins are expected to already be in output (TCK, TDI, TMS) and input (TDO)
    /// mode; embedded-hal encodes pin direction in the type.
    pub fn new(clock: Clk, tdi: Tdi, tdo: Tdo, tms: Tms) -> Self {
        Self { clock, tdi, tdo, tms }
    }

    pub fn release(self) -> (Clk, Tdi, Tdo, Tms) {
        (self.clock, self.tdi, self.tdo, self.tms)
    }
}

impl<Clk, Tdi, Tdo, Tms> SignalPort for GpioPort<Clk, Tdi, Tdo, Tms>
where
    Clk: OutputPin<Error = Infallible>,
    Tdi: OutputPin<Error = Infallible>,
    Tdo: InputPin<Error = Infallible>,
    Tms: OutputPin<Error = Infallible>,
{
    fn configure(&mut self) {}

    fn write(&mut self, lines: Lines) {
        settle(self.tms.set_state(PinState::from(lines.contains(Lines::TMS))));
        settle(self.tdi.set_state(PinState::from(lines.contains(Lines::TDI))));
        settle(self.clock.set_state(PinState::from(lines.contains(Lines::TCK))));
    }

    fn read_tdo(&mut self) -> bool {
        settle(self.tdo.is_high())
    }
}
