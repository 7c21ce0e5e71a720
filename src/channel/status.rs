//! Tagged status lines sent back to the host.
//!
//! Every line starts with a one-character tag the host side dispatches on:
//!
//! ```text
//! \nR<token>\r\n    ready: vector format at startup, SEND when the buffer is dry
//! ! <text>\r\n      important diagnostic
//! \nQ <text>\r\n    quitting
//! D <text>\r\n      debug trace (debug-trace feature only)
//! ```
use core::fmt::{self, Write};

use heapless::String;

use crate::channel::Link;
use crate::config::MESSAGE_CAPACITY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusKind {
    Ready,
    Important,
    Quit,
    Debug,
}

impl StatusKind {
    /// The tag character identifying the line
    pub const fn tag(self) -> u8 {
        match self {
            StatusKind::Ready => b'R',
            StatusKind::Important => b'!',
            StatusKind::Quit => b'Q',
            StatusKind::Debug => b'D',
        }
    }

    /// Ready and quit lines start on a fresh line of their own
    const fn breaks_line(self) -> bool {
        matches!(self, StatusKind::Ready | StatusKind::Quit)
    }
}

/// A rendered status payload
pub type Message = String<MESSAGE_CAPACITY>;

/// Writer that keeps the longest prefix that fits and silently drops the rest
struct Truncating {
    message: Message,
    full: bool,
}

impl Truncating {
    fn new() -> Self {
        Self {
            message: Message::new(),
            full: false,
        }
    }
}

impl Write for Truncating {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.full {
            return Ok(());
        }
        for c in s.chars() {
            if self.message.push(c).is_err() {
                self.full = true;
                break;
            }
        }
        Ok(())
    }
}

/// Format `args` into a bounded message, truncating at `MESSAGE_CAPACITY` bytes
pub fn render(args: fmt::Arguments<'_>) -> Message {
    let mut out = Truncating::new();
    // Truncating never fails; an error here could only come from a Display impl
    let _ = out.write_fmt(args);
    out.message
}

/// Send one complete status line
pub fn write_line<L: Link + ?Sized>(link: &mut L, kind: StatusKind, text: &str) {
    if kind.breaks_line() {
        link.send(b"\n");
    }
    link.send(&[kind.tag()]);
    if kind != StatusKind::Ready {
        link.send(b" ");
    }
    link.send(text.as_bytes());
    link.send(b"\r\n");
}

/// Lowercase hex rendering of `bytes` appended to `label`, for debug traces
pub fn hex_line(label: &str, bytes: &[u8]) -> Message {
    let mut out = Truncating::new();
    let _ = out.write_str(label);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out.message
}
