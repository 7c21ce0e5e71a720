//! Implement the `Cable` trait directly on the pin driver
use alloc::vec;
use alloc::vec::Vec;
use embedded_hal::delay::DelayNs;

use crate::cable::Cable;
use crate::clock::Monotonic;
use crate::driver::PinDriver;
use crate::port::SignalPort;

impl<P, D, C> PinDriver<P, D, C>
where
    P: SignalPort,
    D: DelayNs,
    C: Monotonic,
{
    /// Shift the low `count` bits of `byte` out on TDI, least significant first, and return
    /// the bits captured from TDO in the same order.  TMS goes high for the final bit when
    /// `exit` is set.
    fn shift_byte(&mut self, byte: u8, count: u8, exit: bool) -> u8 {
        let mut captured = 0;
        for b in 0..count {
            self.put_tdi((byte >> b) & 1 == 1);
            if exit && b == count - 1 {
                self.set_tms();
            }
            let tdo = self.pulse_clock_and_sample() as u8;
            captured |= tdo << b;
        }
        captured
    }
}

impl<P, D, C> Cable for PinDriver<P, D, C>
where
    P: SignalPort,
    D: DelayNs,
    C: Monotonic,
{
    fn change_mode(&mut self, tms: &[usize], tdi: bool) {
        self.put_tdi(tdi);
        for d in tms {
            self.put_tms(*d != 0);
            self.pulse_clock();
        }
    }

    fn read_data(&mut self, bits: usize) -> Vec<u8> {
        let mut buf = vec![];
        let mut value: u8 = 0;
        let mut b = 0;

        self.clr_tms();
        self.set_tdi();
        for _ in 0..bits {
            let bit = self.pulse_clock_and_sample() as u8;

            // Shift in the bit into the next byte
            value |= bit << b;
            b = (b + 1) % 8;

            // When we get back to 0, we've finished a byte
            if b == 0 {
                buf.push(value);
                value = 0;
            }
        }
        // Anything left over goes out as an incomplete byte
        if b != 0 {
            buf.push(value);
        }
        buf
    }

    fn write_data(&mut self, data: &[u8], bits: u8, pause_after: bool) {
        self.read_write_data(data, bits, pause_after);
    }

    fn read_write_data(&mut self, data: &[u8], bits: u8, pause_after: bool) -> Vec<u8> {
        let Some((last, body)) = data.split_last() else {
            return vec![];
        };
        // Constrain `bits` to be between 1 and 8
        let bits = bits.clamp(1, 8);

        let mut out_buffer = Vec::with_capacity(data.len());
        self.clr_tms();
        for d in body {
            let byte = self.shift_byte(*d, 8, false);
            out_buffer.push(byte);
        }
        let byte = self.shift_byte(*last, bits, pause_after);
        out_buffer.push(byte);

        if pause_after {
            // Exit1 -> Pause
            self.clr_tms();
            self.pulse_clock();
        }
        out_buffer
    }
}
