use std::collections::VecDeque;

/// Rolling record of queue lengths, one sample per step. Feeds a chart of
/// propagation activity over time.
#[derive(Clone, Debug)]
pub struct QueueHistory {
    samples: VecDeque<usize>,
    capacity: usize,
}

impl QueueHistory {
    /// A capacity of 0 is treated as 1 so the latest sample is always kept.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a sample, evicting the oldest one when full.
    pub fn push(&mut self, queue_len: usize) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(queue_len);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<usize> {
        self.samples.back().copied()
    }

    /// Largest retained sample.
    pub fn peak(&self) -> Option<usize> {
        self.samples.iter().copied().max()
    }

    /// Samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.samples.iter().copied()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest() {
        let mut history = QueueHistory::new(3);
        for len in [5, 9, 2, 7] {
            history.push(len);
        }
        assert_eq!(history.iter().collect::<Vec<_>>(), vec![9, 2, 7]);
        assert_eq!(history.latest(), Some(7));
        assert_eq!(history.peak(), Some(9));
    }

    #[test]
    fn test_empty_history() {
        let history = QueueHistory::new(4);
        assert!(history.is_empty());
        assert_eq!(history.latest(), None);
        assert_eq!(history.peak(), None);
    }

    #[test]
    fn test_zero_capacity_keeps_latest() {
        let mut history = QueueHistory::new(0);
        history.push(1);
        history.push(2);
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.iter().collect::<Vec<_>>(), vec![2]);
    }
}
