//! Fixed-capacity backlog of received bytes.

use alloc::collections::VecDeque;

/// A ring buffer of stream bytes, addressed from the write head.
///
/// Offsets are negative: `-1` is the most recently pushed byte, `-len()` the
/// oldest one retained. Pushing into a full buffer discards the oldest byte.
#[derive(Debug, Clone)]
pub struct StreamBuffer {
    buf: VecDeque<u8>,
    capacity: usize,
}

impl StreamBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a byte, discarding the oldest one when full.
    pub fn push(&mut self, b: u8) {
        if self.capacity == 0 {
            return;
        }
        if self.buf.len() == self.capacity {
            self.buf.pop_front();
        }
        self.buf.push_back(b);
    }

    /// The byte at a negative offset from the write head, if retained.
    pub fn get(&self, offset: isize) -> Option<u8> {
        let depth = usize::try_from(offset.checked_neg()?).ok()?;
        if depth == 0 {
            return None;
        }

        let index = self.buf.len().checked_sub(depth)?;
        self.buf.get(index).copied()
    }

    /// Number of bytes currently retained.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Retained bytes, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.buf.iter().copied()
    }
}
