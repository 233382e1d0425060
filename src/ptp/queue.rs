//! Bounded status queue
//!
//! Fixed-capacity FIFO for decoded status messages and timestamps. When the
//! queue is full, new entries either push out the oldest one or are
//! rejected; either way the loss is counted the way the PHY counts FIFO
//! overflow, in a counter that saturates at 3 and stays set until the queue
//! has been drained empty.

/// Highest value of the dropped counter
pub const MAX_DROPPED: u8 = 3;

/// What a full queue does with a new entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OverflowPolicy {
    /// Discard the oldest entry to make room
    #[default]
    DropOldest,
    /// Discard the new entry
    Reject,
}

/// Fixed-capacity ring buffer with a saturating loss counter
#[derive(Debug, Clone)]
pub struct StatusQueue<T: Copy, const N: usize> {
    entries: [Option<T>; N],
    /// Index of the oldest entry
    head: usize,
    len: usize,
    dropped: u8,
    policy: OverflowPolicy,
}

impl<T: Copy, const N: usize> StatusQueue<T, N> {
    /// Create an empty queue
    #[must_use]
    pub const fn new(policy: OverflowPolicy) -> Self {
        Self {
            entries: [None; N],
            head: 0,
            len: 0,
            dropped: 0,
            policy,
        }
    }

    /// Maximum number of entries
    #[inline(always)]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of queued entries
    #[inline(always)]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Check if the queue is empty
    #[inline(always)]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if the queue is full
    #[inline(always)]
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.len == N
    }

    /// Entries lost since the queue was last empty (0-3)
    #[must_use]
    pub const fn dropped(&self) -> u8 {
        self.dropped
    }

    /// Overflow policy
    #[must_use]
    pub const fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Add an entry
    ///
    /// Returns `false` if the entry itself was discarded.
    pub fn push(&mut self, item: T) -> bool {
        if N == 0 {
            self.count_drop();
            return false;
        }
        if self.is_full() {
            self.count_drop();
            match self.policy {
                OverflowPolicy::Reject => return false,
                OverflowPolicy::DropOldest => {
                    self.head = (self.head + 1) % N;
                    self.len -= 1;
                }
            }
        }
        self.entries[(self.head + self.len) % N] = Some(item);
        self.len += 1;
        true
    }

    /// Remove the oldest entry
    ///
    /// Removing the last entry clears the dropped counter.
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let item = self.entries[self.head].take();
        self.head = (self.head + 1) % N;
        self.len -= 1;
        if self.len == 0 {
            self.dropped = 0;
        }
        item
    }

    /// Oldest entry without removing it
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.entries[self.head].as_ref()
    }

    /// Discard every entry and clear the dropped counter
    pub fn clear(&mut self) {
        self.entries = [None; N];
        self.head = 0;
        self.len = 0;
        self.dropped = 0;
    }

    fn count_drop(&mut self) {
        if self.dropped < MAX_DROPPED {
            self.dropped += 1;
        }
        #[cfg(feature = "defmt")]
        defmt::warn!("status queue overflow ({} dropped)", self.dropped);
    }
}

impl<T: Copy, const N: usize> Default for StatusQueue<T, N> {
    fn default() -> Self {
        Self::new(OverflowPolicy::DropOldest)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order_across_wrap() {
        let mut queue: StatusQueue<u16, 3> = StatusQueue::default();
        for value in [1, 2, 3] {
            assert!(queue.push(value));
        }
        assert_eq!(queue.pop(), Some(1));
        assert!(queue.push(4));

        assert_eq!(queue.peek(), Some(&2));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(3));
        assert_eq!(queue.pop(), Some(4));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn drop_oldest_keeps_newest() {
        let mut queue: StatusQueue<u16, 2> = StatusQueue::new(OverflowPolicy::DropOldest);
        for value in 1..=4 {
            assert!(queue.push(value));
        }

        assert_eq!(queue.dropped(), 2);
        assert_eq!(queue.pop(), Some(3));
        assert_eq!(queue.pop(), Some(4));
    }

    #[test]
    fn reject_keeps_oldest() {
        let mut queue: StatusQueue<u16, 2> = StatusQueue::new(OverflowPolicy::Reject);
        assert!(queue.push(1));
        assert!(queue.push(2));
        assert!(!queue.push(3));

        assert_eq!(queue.dropped(), 1);
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
    }

    #[test]
    fn dropped_saturates_and_clears_when_drained() {
        let mut queue: StatusQueue<u16, 1> = StatusQueue::new(OverflowPolicy::Reject);
        queue.push(0);
        for value in 1..10 {
            queue.push(value);
        }
        assert_eq!(queue.dropped(), MAX_DROPPED);

        // Sticky while entries remain
        queue.push(99);
        assert_eq!(queue.dropped(), MAX_DROPPED);

        assert_eq!(queue.pop(), Some(0));
        assert_eq!(queue.dropped(), 0);
        assert!(queue.is_empty());
    }

    #[test]
    fn clear_resets_everything() {
        let mut queue: StatusQueue<u8, 2> = StatusQueue::new(OverflowPolicy::DropOldest);
        queue.push(1);
        queue.push(2);
        queue.push(3);
        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(queue.dropped(), 0);
        assert_eq!(queue.capacity(), 2);
    }
}
