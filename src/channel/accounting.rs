/// Running sum and count of the bytes handed to the consumer.
///
/// Both wrap at 2^32.  This is a cheap end-to-end check the host can compare against
/// what it sent, not an integrity code.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StreamAccounting {
    sum: u32,
    count: u32,
}

impl StreamAccounting {
    pub const fn new() -> Self {
        Self { sum: 0, count: 0 }
    }

    pub fn record(&mut self, byte: u8) {
        self.sum = self.sum.wrapping_add(byte.into());
        self.count = self.count.wrapping_add(1);
    }

    pub fn sum(&self) -> u32 {
        self.sum
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}
