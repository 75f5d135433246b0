use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 60;

/// Fixed-capacity FIFO of the most recent readings of one metric.
#[derive(Debug, Clone)]
pub struct RollingHistory<T> {
    values: VecDeque<T>,
    capacity: usize,
}

impl<T: Clone> RollingHistory<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: T) {
        if self.capacity == 0 {
            return;
        }
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&T> {
        self.values.back()
    }

    /// Recorded values, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    /// Exactly `capacity` values, oldest first, with `filler` in front of the
    /// recorded ones until the buffer has filled up.
    pub fn padded(&self, filler: T) -> Vec<T> {
        let missing = self.capacity - self.values.len();
        let mut out = Vec::with_capacity(self.capacity);
        out.extend(std::iter::repeat_n(filler, missing));
        out.extend(self.values.iter().cloned());
        out
    }
}

impl<T: Clone + Default> RollingHistory<T> {
    /// Fixed-width chart view, padded with `T::default()`.
    pub fn snapshot(&self) -> Vec<T> {
        self.padded(T::default())
    }
}

impl<T: Clone> Default for RollingHistory<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
