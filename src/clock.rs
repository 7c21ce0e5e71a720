//! Free-running time source used to bound idle waits.

/// A monotonic microsecond counter.
///
/// The counter is allowed to wrap; consumers compare timestamps with wrapping
/// arithmetic, so any span shorter than about 71 minutes is measured correctly.
pub trait Monotonic {
    /// Microseconds since an arbitrary fixed origin
    fn now_micros(&mut self) -> u32;
}

impl<T: Monotonic + ?Sized> Monotonic for &mut T {
    fn now_micros(&mut self) -> u32 {
        T::now_micros(self)
    }
}

/// Microseconds elapsed between `start` and `now`, tolerating one counter wrap
pub fn elapsed_micros(start: u32, now: u32) -> u32 {
    now.wrapping_sub(start)
}
