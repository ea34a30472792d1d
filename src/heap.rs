//! Binary min-heap keyed by a caller-supplied score function.
//!
//! The score function is consulted when an item is pushed and again when
//! it is explicitly [`rescore`](PriorityQueue::rescore)d, so scores may
//! live outside the queue (e.g. in a `Cell` table owned by the search)
//! and change between those calls. Equal scores pop in insertion order.

use std::collections::HashMap;
use std::hash::Hash;

struct Entry<T> {
    item: T,
    score: f64,
    /// Insertion sequence, the tie-breaker for equal scores
    seq: u64,
}

/// Min-heap with positional rescoring.
pub struct PriorityQueue<T, F> {
    entries: Vec<Entry<T>>,
    /// Heap position of every queued item
    positions: HashMap<T, usize>,
    score: F,
    next_seq: u64,
}

impl<T, F> PriorityQueue<T, F>
where
    T: Clone + Eq + Hash,
    F: Fn(&T) -> f64,
{
    pub fn new(score: F) -> Self {
        Self::with_capacity(0, score)
    }

    pub fn with_capacity(capacity: usize, score: F) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
            score,
            next_seq: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn is_not_empty(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.positions.contains_key(item)
    }

    /// The lowest-scored item without removing it
    pub fn peek(&self) -> Option<&T> {
        self.entries.first().map(|e| &e.item)
    }

    /// Insert `item`. Pushing an item that is already queued rescores it instead,
    /// so the queue never holds stale duplicates.
    pub fn push(&mut self, item: T) {
        if self.positions.contains_key(&item) {
            self.rescore(&item);
            return;
        }
        let score = (self.score)(&item);
        debug_assert!(score.is_finite(), "priority score must be finite");
        let pos = self.entries.len();
        self.positions.insert(item.clone(), pos);
        self.entries.push(Entry { item, score, seq: self.next_seq });
        self.next_seq += 1;
        self.sift_up(pos);
    }

    /// Remove and return the lowest-scored item, `None` when empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        self.swap(0, last);
        let entry = self.entries.pop()?;
        self.positions.remove(&entry.item);
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some(entry.item)
    }

    /// Re-read the score of a queued item and restore heap order.
    ///
    /// Calling this for an item that is not queued is a logic error: it
    /// asserts in debug builds and does nothing in release builds.
    pub fn rescore(&mut self, item: &T) {
        let Some(&pos) = self.positions.get(item) else {
            debug_assert!(false, "rescore called for an item that is not queued");
            return;
        };
        let score = (self.score)(item);
        debug_assert!(score.is_finite(), "priority score must be finite");
        self.entries[pos].score = score;
        let pos = self.sift_up(pos);
        self.sift_down(pos);
    }

    /// Drain the queue in priority order
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len());
        while let Some(item) = self.pop() {
            out.push(item);
        }
        out
    }

    fn less(&self, a: usize, b: usize) -> bool {
        let (ea, eb) = (&self.entries[a], &self.entries[b]);
        match ea.score.total_cmp(&eb.score) {
            std::cmp::Ordering::Less => true,
            std::cmp::Ordering::Greater => false,
            std::cmp::Ordering::Equal => ea.seq < eb.seq,
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.entries.swap(a, b);
        if let Some(p) = self.positions.get_mut(&self.entries[a].item) {
            *p = a;
        }
        if let Some(p) = self.positions.get_mut(&self.entries[b].item) {
            *p = b;
        }
    }

    /// Returns the final position of the moved entry
    fn sift_up(&mut self, mut pos: usize) -> usize {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.less(pos, parent) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
        pos
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut smallest = pos;
            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == pos {
                break;
            }
            self.swap(pos, smallest);
            pos = smallest;
        }
    }
}
