//! This crate drives a JTAG test access port by bit-banging four signal lines, while
//! streaming the vector bytes that describe what to do with it from a host over a
//! serial link.  It is written for small microcontrollers: no heap is needed on the hot
//! paths, buffers are fixed size and every operation either succeeds or waits.
//!
//! At the lowest level is the `PinDriver`, which owns a `SignalPort` (the TMS, TDI, TDO
//! and TCK lines) and exposes single clock pulses, sampled clock pulses and timed idle
//! waits.  Changes to TMS and TDI are only recorded in a shadow register and reach the
//! port together with the next clock edge, so each pulse costs exactly two port writes.
//! The `Cable` trait sits on top of that for clients that prefer to shift whole bit
//! strings.
//!
//! The `ByteChannel` is the other half.  It keeps a small ring buffer in front of a
//! `Link`, asks the host for more data with a `R SEND` line whenever it runs dry, and
//! backs off exponentially while the host is slow.  Every byte handed out is added to a
//! running checksum which is reported when the channel is dropped.
//!
//! # Example
//! ```ignore
//! use jtag_link::channel::{ByteChannel, IoLink};
//! use jtag_link::config::ChannelConfig;
//! use jtag_link::driver::PinDriver;
//! use jtag_link::port::{MappedPort, PinMap};
//!
//! let mut pins = PinDriver::new(MappedPort::new(portb, PinMap::default()), delay, timer);
//! let mut channel = ByteChannel::new(IoLink::new(uart), delay, ChannelConfig::default());
//!
//! let opcode = channel.next_byte();
//! pins.set_tms();
//! pins.pulse_clock();
//! ```

#![no_std]

#[cfg(any(test, feature = "std"))]
extern crate std;

extern crate alloc;

pub mod cable;
pub mod channel;
pub mod clock;
pub mod config;
pub mod driver;
pub mod port;

#[cfg(test)]
mod mock;

#[cfg(feature = "std")]
pub mod host;

pub use channel::ByteChannel;
pub use driver::PinDriver;
