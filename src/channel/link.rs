//! The byte link to the host.
use embedded_io::{Read, ReadReady, Write};

/// A byte pipe to the host with no flow control.
///
/// Reads must not block: the channel polls the link and does its own waiting.
pub trait Link {
    /// Bring the link up at `baudrate`.  Links whose rate is fixed by the HAL can ignore it.
    fn open(&mut self, baudrate: u32) {
        let _ = baudrate;
    }

    /// Return the next received byte if one is waiting
    fn read_byte(&mut self) -> Option<u8>;

    /// Queue `bytes` for transmission
    fn send(&mut self, bytes: &[u8]);
}

impl<T: Link + ?Sized> Link for &mut T {
    fn open(&mut self, baudrate: u32) {
        T::open(self, baudrate)
    }

    fn read_byte(&mut self) -> Option<u8> {
        T::read_byte(self)
    }

    fn send(&mut self, bytes: &[u8]) {
        T::send(self, bytes)
    }
}

/// A `Link` over any embedded-io serial port that can report read readiness.
///
/// Errors from the port are not propagated.  A failed read looks like an idle line and
/// the channel keeps polling; a failed write loses that status line.  With the `defmt`
/// feature both are logged.
pub struct IoLink<T> {
    io: T,
}

impl<T> IoLink<T>
where
    T: Read + ReadReady + Write,
{
    pub fn new(io: T) -> Self {
        Self { io }
    }

    pub fn release(self) -> T {
        self.io
    }
}

impl<T> Link for IoLink<T>
where
    T: Read + ReadReady + Write,
{
    fn read_byte(&mut self) -> Option<u8> {
        match self.io.read_ready() {
            Ok(true) => {}
            Ok(false) => return None,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("link read_ready failed: {}", embedded_io::Error::kind(&_e));
                return None;
            }
        }

        let mut byte = [0u8; 1];
        match self.io.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            Ok(_) => None,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("link read failed: {}", embedded_io::Error::kind(&_e));
                None
            }
        }
    }

    fn send(&mut self, bytes: &[u8]) {
        if let Err(_e) = self.io.write_all(bytes) {
            #[cfg(feature = "defmt")]
            defmt::warn!("link write failed: {}", embedded_io::Error::kind(&_e));
        }
    }
}
