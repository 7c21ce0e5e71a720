//! Flow-controlled byte stream from the host.
//!
//! The host pushes vector data whenever it likes; the channel has no way to pause it.
//! Instead it keeps a small ring buffer, and only when that runs dry does it ask for
//! more with a `R SEND` line.  While the host is slow to answer, the channel polls with
//! an exponentially growing delay.
use core::fmt;

use embedded_hal::delay::DelayNs;

use crate::config::{ChannelConfig, BUFFER_SIZE};

pub mod accounting;
pub mod link;
pub mod ring;
pub mod status;

pub use accounting::StreamAccounting;
pub use link::{IoLink, Link};
pub use ring::{Push, RingBuffer};
pub use status::StatusKind;

use status::{render, write_line};

/// Poll interval while waiting for the host.  Doubles on every empty poll and starts over
/// with each fill cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Backoff {
    initial_ms: u32,
    current_ms: u32,
}

impl Backoff {
    pub const fn new(initial_ms: u32) -> Self {
        Self {
            initial_ms,
            current_ms: initial_ms,
        }
    }

    pub fn current_ms(&self) -> u32 {
        self.current_ms
    }

    pub fn reset(&mut self) {
        self.current_ms = self.initial_ms;
    }

    pub fn grow(&mut self) {
        self.current_ms = self.current_ms.saturating_mul(2);
    }
}

/// Buffered, checksummed byte source over a `Link`.
///
/// `N` is the ring size; `N - 1` bytes can be buffered.  When the host sends more than
/// fits before they are consumed, the oldest bytes are lost and an `Overran serial
/// buffer` message is sent for each one.
///
/// Dropping the channel reports the checksum and sends the quit line.
pub struct ByteChannel<L: Link, D: DelayNs, const N: usize = BUFFER_SIZE> {
    link: L,
    delay: D,
    config: ChannelConfig,
    ring: RingBuffer<N>,
    accounting: StreamAccounting,
    backoff: Backoff,
}

impl<L: Link, D: DelayNs> ByteChannel<L, D> {
    /// Open the link and announce the vector format.  Nothing is read from the link until
    /// the first call to `next_byte`.
    pub fn new(link: L, delay: D, config: ChannelConfig) -> Self {
        Self::new_sized(link, delay, config)
    }
}

impl<L: Link, D: DelayNs, const N: usize> ByteChannel<L, D, N> {
    /// Same as `new` with a ring size other than `BUFFER_SIZE`
    pub fn new_sized(mut link: L, delay: D, config: ChannelConfig) -> Self {
        link.open(config.baudrate);
        let mut channel = Self {
            link,
            delay,
            config,
            ring: RingBuffer::new(),
            accounting: StreamAccounting::new(),
            backoff: Backoff::new(config.initial_backoff_ms),
        };
        channel.ready(config.vector_format);
        channel
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Sum and count of every byte returned so far
    pub fn accounting(&self) -> StreamAccounting {
        self.accounting
    }

    /// Bytes received but not yet consumed
    pub fn buffered(&self) -> usize {
        self.ring.len()
    }

    /// Return the next byte of the stream, waiting for the host as long as it takes.
    pub fn next_byte(&mut self) -> u8 {
        loop {
            if let Some(byte) = self.ring.pop() {
                self.accounting.record(byte);
                return byte;
            }
            self.fill();
        }
    }

    /// Return the next byte if one has already arrived.
    ///
    /// This never asks the host for data or waits, so it suits callers that have other
    /// work to do.  They remain responsible for not letting the host's unsolicited data
    /// overrun the buffer.
    pub fn poll_next_byte(&mut self) -> Option<u8> {
        if self.ring.is_empty() {
            self.drain();
        }
        let byte = self.ring.pop()?;
        self.accounting.record(byte);
        Some(byte)
    }

    /// Move everything the link has ready into the ring
    fn drain(&mut self) {
        while let Some(byte) = self.link.read_byte() {
            if self.ring.push(byte) == Push::Overran {
                #[cfg(feature = "defmt")]
                defmt::warn!("ring overrun after {} bytes", self.accounting.count());
                self.important(format_args!("Overran serial buffer"));
            }
        }
    }

    fn fill(&mut self) {
        self.drain();
        if !self.ring.is_empty() {
            return;
        }

        self.ready(self.config.more_data_token);
        self.backoff.reset();
        loop {
            self.delay.delay_ms(self.backoff.current_ms());
            self.drain();
            if !self.ring.is_empty() {
                break;
            }
            self.backoff.grow();
        }
    }

    /// Send a ready line: the vector format at startup, the more-data token afterwards
    pub fn ready(&mut self, token: &str) {
        write_line(&mut self.link, StatusKind::Ready, token);
    }

    /// Send an important diagnostic, e.g. `channel.important(format_args!("bad opcode {op}"))`
    pub fn important(&mut self, args: fmt::Arguments<'_>) {
        let message = render(args);
        write_line(&mut self.link, StatusKind::Important, &message);
    }

    /// Send the quit line
    pub fn quit(&mut self, message: &str) {
        write_line(&mut self.link, StatusKind::Quit, message);
    }

    #[cfg(feature = "debug-trace")]
    pub fn debug(&mut self, args: fmt::Arguments<'_>) {
        let message = render(args);
        write_line(&mut self.link, StatusKind::Debug, &message);
    }

    /// Debug traces are compiled out without the `debug-trace` feature
    #[cfg(not(feature = "debug-trace"))]
    #[inline(always)]
    pub fn debug(&mut self, _args: fmt::Arguments<'_>) {}

    /// Trace `bytes` as hex after `label`
    #[cfg(feature = "debug-trace")]
    pub fn debug_bytes(&mut self, label: &str, bytes: &[u8]) {
        let message = status::hex_line(label, bytes);
        write_line(&mut self.link, StatusKind::Debug, &message);
    }

    #[cfg(not(feature = "debug-trace"))]
    #[inline(always)]
    pub fn debug_bytes(&mut self, _label: &str, _bytes: &[u8]) {}
}

impl<L: Link, D: DelayNs, const N: usize> Drop for ByteChannel<L, D, N> {
    fn drop(&mut self) {
        let accounting = self.accounting;
        self.important(format_args!(
            "Checksum {:x}/{:x}.",
            accounting.sum(),
            accounting.count()
        ));
        self.quit("Exiting!");
    }
}
