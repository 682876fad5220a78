//! Fixed-capacity trailing window of sample values.

use crate::types::WindowStatistics;

/// A strict FIFO of at most `capacity` values, oldest first.
///
/// Backed by a circular buffer: once full, each push overwrites the
/// oldest slot and returns the evicted value.
#[derive(Clone, Debug)]
pub struct SlidingWindow {
    slots: Vec<f64>,
    capacity: usize,
    head: usize,
    len: usize,
}

impl SlidingWindow {
    /// Create an empty window. A zero capacity is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            head: 0,
            len: 0,
        }
    }

    /// Push a value, evicting and returning the oldest one if full.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        if self.slots.len() < self.capacity {
            self.slots.push(value);
            self.len += 1;
            return None;
        }
        let evicted = std::mem::replace(&mut self.slots[self.head], value);
        self.head = (self.head + 1) % self.capacity;
        Some(evicted)
    }

    /// Values in arrival order (oldest first).
    pub fn iter(&self) -> WindowIter<'_> {
        WindowIter {
            slots: &self.slots,
            pos: self.head,
            remaining: self.len,
        }
    }

    /// Copy of the values in arrival order.
    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().copied().collect()
    }

    /// Mean and population standard deviation, `None` while empty.
    pub fn statistics(&self) -> Option<WindowStatistics> {
        WindowStatistics::from_values(self.iter())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all values, keeping the capacity.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = 0;
        self.len = 0;
    }
}

/// Iterator over a [`SlidingWindow`], oldest first.
#[derive(Clone)]
pub struct WindowIter<'a> {
    slots: &'a [f64],
    pos: usize,
    remaining: usize,
}

impl<'a> Iterator for WindowIter<'a> {
    type Item = &'a f64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = &self.slots[self.pos];
        self.pos = (self.pos + 1) % self.slots.len();
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for WindowIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_then_slides() {
        let mut w = SlidingWindow::new(3);
        assert!(w.is_empty());
        assert_eq!(w.push(1.0), None);
        assert_eq!(w.push(2.0), None);
        assert!(!w.is_full());
        assert_eq!(w.push(3.0), None);
        assert!(w.is_full());
        assert_eq!(w.to_vec(), vec![1.0, 2.0, 3.0]);

        assert_eq!(w.push(4.0), Some(1.0));
        assert_eq!(w.push(5.0), Some(2.0));
        assert_eq!(w.len(), 3);
        assert_eq!(w.to_vec(), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn capacity_one() {
        let mut w = SlidingWindow::new(1);
        w.push(8.0);
        assert_eq!(w.push(9.0), Some(8.0));
        assert_eq!(w.to_vec(), vec![9.0]);
    }

    #[test]
    fn zero_capacity_raised_to_one() {
        let w = SlidingWindow::new(0);
        assert_eq!(w.capacity(), 1);
    }

    #[test]
    fn clear_resets_order() {
        let mut w = SlidingWindow::new(2);
        for v in [1.0, 2.0, 3.0] {
            w.push(v);
        }
        w.clear();
        assert!(w.is_empty());
        assert!(w.statistics().is_none());
        w.push(10.0);
        w.push(20.0);
        assert_eq!(w.to_vec(), vec![10.0, 20.0]);
    }

    #[test]
    fn statistics_over_current_contents() {
        let mut w = SlidingWindow::new(2);
        w.push(100.0);
        w.push(1.0);
        w.push(3.0);
        let stats = w.statistics().unwrap();
        assert!((stats.mean - 2.0).abs() < 1e-12);
        assert!((stats.std_dev - 1.0).abs() < 1e-12);
    }
}
