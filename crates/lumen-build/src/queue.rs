//! FIFO work queue with batch operations.
//!
//! Backs the scheduler's "pull the next ready job" step. Two-stack
//! representation: pushes land on the back stack, pops drain the front
//! stack, and the back stack is reversed into the front only when the
//! front runs dry, giving amortised O(1) per item.
//!
//! Not thread-safe; the scheduler owns it from a single thread.

/// A FIFO queue of ready work items.
#[derive(Debug, Clone)]
pub struct Queue<T> {
    front: Vec<T>,
    back: Vec<T>,
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self {
            front: Vec::new(),
            back: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.front.len() + self.back.len()
    }

    pub fn is_empty(&self) -> bool {
        self.front.is_empty() && self.back.is_empty()
    }

    /// Append every element of `batch` in order.
    pub fn enqueue(&mut self, batch: impl IntoIterator<Item = T>) {
        self.back.extend(batch);
    }

    /// Remove and return up to `n` items in FIFO order.
    ///
    /// Returns exactly `min(n, len)` items; fewer than `n` only when the
    /// queue holds fewer.
    pub fn dequeue(&mut self, n: usize) -> Vec<T> {
        let mut out = Vec::with_capacity(n.min(self.len()));
        while out.len() < n {
            if self.front.is_empty() {
                if self.back.is_empty() {
                    break;
                }
                self.back.reverse();
                std::mem::swap(&mut self.front, &mut self.back);
            }
            // front is non-empty here
            if let Some(item) = self.front.pop() {
                out.push(item);
            }
        }
        out
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut q = Queue::new();
        q.enqueue(iter);
        q
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_queue() {
        let q: Queue<u32> = Queue::new();
        assert_eq!(q.len(), 0);
        assert!(q.is_empty());
    }

    #[test]
    fn dequeue_preserves_fifo_order() {
        let mut q: Queue<char> = ['a', 'b', 'c', 'd', 'e'].into_iter().collect();
        assert_eq!(q.dequeue(3), vec!['a', 'b', 'c']);
        assert_eq!(q.dequeue(3), vec!['d', 'e']);
        assert!(q.is_empty());
    }

    #[test]
    fn interleaved_enqueue_dequeue() {
        let mut q = Queue::new();
        q.enqueue([1, 2]);
        assert_eq!(q.dequeue(1), vec![1]);
        q.enqueue([3, 4]);
        assert_eq!(q.dequeue(10), vec![2, 3, 4]);
    }

    #[test]
    fn dequeue_zero_is_a_noop() {
        let mut q: Queue<u32> = [1, 2].into_iter().collect();
        assert_eq!(q.dequeue(0), Vec::<u32>::new());
        assert_eq!(q.len(), 2);
    }

    proptest! {
        /// The concatenation of all dequeue outputs is a prefix of the
        /// concatenation of all enqueue inputs.
        #[test]
        fn prop_fifo_prefix(
            batches in prop::collection::vec(prop::collection::vec(0u32..1000, 0..8), 0..12),
            pulls in prop::collection::vec(0usize..6, 0..16),
        ) {
            let mut q = Queue::new();
            let mut pushed = Vec::new();
            let mut popped = Vec::new();

            let mut batches = batches.into_iter();
            for n in pulls {
                if let Some(batch) = batches.next() {
                    pushed.extend(batch.iter().copied());
                    q.enqueue(batch);
                }
                popped.extend(q.dequeue(n));
            }
            for batch in batches {
                pushed.extend(batch.iter().copied());
                q.enqueue(batch);
            }
            popped.extend(q.dequeue(q.len()));

            prop_assert_eq!(&pushed[..popped.len()], &popped[..]);
        }

        /// Size bookkeeping: enqueue adds |batch|, dequeue removes |output|.
        #[test]
        fn prop_size_conservation(
            batch in prop::collection::vec(0u32..1000, 0..32),
            n in 0usize..40,
        ) {
            let mut q = Queue::new();
            q.enqueue(batch.iter().copied());
            prop_assert_eq!(q.len(), batch.len());

            let before = q.len();
            let out = q.dequeue(n);
            prop_assert_eq!(out.len(), n.min(before));
            prop_assert_eq!(before, out.len() + q.len());
        }

        /// A short dequeue drains the queue completely.
        #[test]
        fn prop_short_dequeue_empties(
            batch in prop::collection::vec(0u32..1000, 0..16),
        ) {
            let mut q = Queue::new();
            q.enqueue(batch.iter().copied());
            let out = q.dequeue(batch.len() + 1);
            prop_assert_eq!(out, batch);
            prop_assert!(q.is_empty());
        }
    }
}
