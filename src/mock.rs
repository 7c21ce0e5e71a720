//! Recording fakes for the hardware traits, shared by the unit tests.
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::channel::Link;
use crate::clock::Monotonic;
use crate::port::{Lines, SignalPort};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortEvent {
    Configure,
    Write(Lines),
    Read(bool),
}

#[derive(Default)]
pub struct PortState {
    pub events: Vec<PortEvent>,
    /// TDO values returned by successive reads; the last one repeats
    pub tdo: VecDeque<bool>,
}

impl PortState {
    pub fn writes(&self) -> Vec<Lines> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PortEvent::Write(lines) => Some(*lines),
                _ => None,
            })
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct FakePort(pub Rc<RefCell<PortState>>);

impl SignalPort for FakePort {
    fn configure(&mut self) {
        self.0.borrow_mut().events.push(PortEvent::Configure);
    }

    fn write(&mut self, lines: Lines) {
        self.0.borrow_mut().events.push(PortEvent::Write(lines));
    }

    fn read_tdo(&mut self) -> bool {
        let mut state = self.0.borrow_mut();
        let value = if state.tdo.len() > 1 {
            state.tdo.pop_front().unwrap_or(false)
        } else {
            state.tdo.front().copied().unwrap_or(false)
        };
        state.events.push(PortEvent::Read(value));
        value
    }
}

/// A clock that only moves when something waits on it.
///
/// `tick` is added on every `now_micros` call so busy loops terminate.
#[derive(Default)]
pub struct TimeState {
    pub now: u32,
    pub tick: u32,
    pub delays_ns: Vec<u32>,
    pub delays_ms: Vec<u32>,
}

#[derive(Clone, Default)]
pub struct FakeTime(pub Rc<RefCell<TimeState>>);

impl FakeTime {
    pub fn starting_at(now: u32, tick: u32) -> Self {
        let time = Self::default();
        {
            let mut state = time.0.borrow_mut();
            state.now = now;
            state.tick = tick;
        }
        time
    }

    pub fn now(&self) -> u32 {
        self.0.borrow().now
    }
}

impl Monotonic for FakeTime {
    fn now_micros(&mut self) -> u32 {
        let mut state = self.0.borrow_mut();
        state.now = state.now.wrapping_add(state.tick);
        state.now
    }
}

impl DelayNs for FakeTime {
    fn delay_ns(&mut self, ns: u32) {
        let mut state = self.0.borrow_mut();
        state.now = state.now.wrapping_add(ns.div_ceil(1000));
        state.delays_ns.push(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        let mut state = self.0.borrow_mut();
        state.now = state.now.wrapping_add(ms.saturating_mul(1000));
        state.delays_ms.push(ms);
    }
}

#[derive(Default)]
pub struct LinkState {
    pub baudrate: Option<u32>,
    pub incoming: VecDeque<u8>,
    /// Bytes that arrive only after the given number of polls that found nothing
    pub late: VecDeque<(usize, Vec<u8>)>,
    pub empty_polls: usize,
    pub reads: usize,
    pub sent: Vec<u8>,
}

#[derive(Clone, Default)]
pub struct FakeLink(pub Rc<RefCell<LinkState>>);

impl FakeLink {
    pub fn with_bytes(bytes: &[u8]) -> Self {
        let link = Self::default();
        link.push(bytes);
        link
    }

    pub fn push(&self, bytes: &[u8]) {
        self.0.borrow_mut().incoming.extend(bytes.iter().copied());
    }

    /// Deliver `bytes` once the channel has polled an empty link `after` more times
    pub fn push_late(&self, after: usize, bytes: &[u8]) {
        let mut state = self.0.borrow_mut();
        if state.late.is_empty() {
            state.empty_polls = 0;
        }
        state.late.push_back((after, bytes.to_vec()));
    }

    pub fn sent_text(&self) -> std::string::String {
        std::string::String::from_utf8_lossy(&self.0.borrow().sent).into_owned()
    }

    pub fn clear_sent(&self) {
        self.0.borrow_mut().sent.clear();
    }
}

impl Link for FakeLink {
    fn open(&mut self, baudrate: u32) {
        self.0.borrow_mut().baudrate = Some(baudrate);
    }

    fn read_byte(&mut self) -> Option<u8> {
        let mut state = self.0.borrow_mut();
        state.reads += 1;
        if let Some(byte) = state.incoming.pop_front() {
            return Some(byte);
        }
        state.empty_polls += 1;
        let due = matches!(state.late.front(), Some((after, _)) if *after < state.empty_polls);
        if due {
            if let Some((_, bytes)) = state.late.pop_front() {
                state.empty_polls = 0;
                state.incoming.extend(bytes);
            }
        }
        None
    }

    fn send(&mut self, bytes: &[u8]) {
        self.0.borrow_mut().sent.extend_from_slice(bytes);
    }
}
