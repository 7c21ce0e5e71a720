//! Fixed-size byte queue between the link and the consumer.
//!
//! One slot is always left empty so `head == tail` unambiguously means empty, leaving
//! `N - 1` usable bytes.  The queue never refuses a byte: when it is full, pushing drops
//! the oldest unread byte instead.  The link has no way to pause the host, so losing
//! data and saying so is the only option.

/// Outcome of a push into the ring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Push {
    Stored,
    /// The byte was stored but the oldest unread byte was lost to make room
    Overran,
}

#[derive(Debug, Clone)]
pub struct RingBuffer<const N: usize> {
    buffer: [u8; N],
    head: usize,
    tail: usize,
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RingBuffer<N> {
    const VALID: () = assert!(N >= 2, "ring buffer needs at least two slots");

    pub const fn new() -> Self {
        let () = Self::VALID;
        Self {
            buffer: [0; N],
            head: 0,
            tail: 0,
        }
    }

    /// Usable capacity
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    pub fn len(&self) -> usize {
        (self.tail + N - self.head) % N
    }

    pub fn push(&mut self, byte: u8) -> Push {
        self.buffer[self.tail] = byte;
        self.tail = (self.tail + 1) % N;
        if self.tail == self.head {
            // Wrote into the reserved slot; give up the oldest byte so it becomes the
            // new reserved slot
            self.head = (self.head + 1) % N;
            Push::Overran
        } else {
            Push::Stored
        }
    }

    pub fn pop(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let byte = self.buffer[self.head];
        self.head = (self.head + 1) % N;
        Some(byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::vec::Vec;

    fn drain<const N: usize>(ring: &mut RingBuffer<N>) -> Vec<u8> {
        core::iter::from_fn(|| ring.pop()).collect()
    }

    #[test]
    fn test_empty_ring() {
        let mut ring = RingBuffer::<8>::new();
        assert!(ring.is_empty());
        assert_eq!(ring.len(), 0);
        assert_eq!(ring.capacity(), 7);
        assert_eq!(ring.pop(), None);
    }

    #[test]
    fn test_wraparound_keeps_order() {
        let mut ring = RingBuffer::<4>::new();
        for round in 0..10u8 {
            assert_eq!(ring.push(round), Push::Stored);
            assert_eq!(ring.push(round + 100), Push::Stored);
            assert_eq!(ring.len(), 2);
            assert_eq!(ring.pop(), Some(round));
            assert_eq!(ring.pop(), Some(round + 100));
        }
        assert!(ring.is_empty());
    }

    #[test]
    fn test_fills_to_capacity_without_overrun() {
        let mut ring = RingBuffer::<4>::new();
        assert_eq!(ring.push(1), Push::Stored);
        assert_eq!(ring.push(2), Push::Stored);
        assert_eq!(ring.push(3), Push::Stored);
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.push(4), Push::Overran);
        assert_eq!(ring.len(), 3);
        assert_eq!(drain(&mut ring), [2, 3, 4]);
    }

    proptest! {
        #[test]
        fn test_fifo_without_overrun(chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..16), 0..20)) {
            let mut ring = RingBuffer::<16>::new();
            let mut expected = Vec::new();
            let mut got = Vec::new();
            for chunk in chunks {
                for byte in chunk {
                    prop_assert_eq!(ring.push(byte), Push::Stored);
                    expected.push(byte);
                }
                got.extend(drain(&mut ring));
            }
            prop_assert_eq!(got, expected);
        }

        #[test]
        fn test_burst_drops_oldest(burst in prop::collection::vec(any::<u8>(), 16..64)) {
            let mut ring = RingBuffer::<16>::new();
            let overruns = burst.iter().filter(|b| ring.push(**b) == Push::Overran).count();

            prop_assert_eq!(overruns, burst.len() - 15);
            prop_assert_eq!(drain(&mut ring), &burst[burst.len() - 15..]);
        }
    }
}
