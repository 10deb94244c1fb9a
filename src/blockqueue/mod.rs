//! Provides the queue of image buckets the render threads work
//! through. The bucket sequence itself is computed once and never
//! changed after creation; workers claim the next bucket by advancing
//! a shared cursor inside a short critical section, which also checks
//! for cancellation.

// std
use std::sync::Mutex;
// lumen
use crate::core::parallel::{lock_or_recover, CancelFlag};

pub mod order;

use order::BucketOrder;

/// A claimed bucket: its position in the sequence and its bucket
/// grid coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub index: usize,
    pub bx: u32,
    pub by: u32,
}

/// The queue of buckets shared immutably between worker threads.
pub struct BucketQueue {
    /// Bucket grid coordinates in render order
    buckets: Vec<(u32, u32)>,
    /// Buckets across and down the image
    dimensions: (u32, u32),
    /// Index of the next bucket to hand out
    cursor: Mutex<usize>,
}

impl BucketQueue {
    /// Create a queue for an image of *width* by *height* pixels cut
    /// into buckets of *bucket_size*; border buckets may be smaller.
    pub fn new(width: u32, height: u32, bucket_size: u32, order: &BucketOrder) -> BucketQueue {
        let bucket_size: u32 = bucket_size.max(1);
        let nbw: u32 = (width + bucket_size - 1) / bucket_size;
        let nbh: u32 = (height + bucket_size - 1) / bucket_size;
        let buckets: Vec<(u32, u32)> = order.get_bucket_sequence(nbw, nbh);
        if buckets.is_empty() {
            log::warn!("bucket queue is empty for a {}x{} image", width, height);
        }
        BucketQueue {
            buckets,
            dimensions: (nbw, nbh),
            cursor: Mutex::new(0),
        }
    }
    /// Buckets across and down.
    pub fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }
    pub fn len(&self) -> usize {
        self.buckets.len()
    }
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
    /// Claim the next bucket, or `None` once the queue is exhausted or
    /// the render was cancelled.
    pub fn claim(&self, cancel: &CancelFlag) -> Option<Bucket> {
        let mut cursor = lock_or_recover(&self.cursor);
        if cancel.is_cancelled() || *cursor >= self.buckets.len() {
            return None;
        }
        let index: usize = *cursor;
        *cursor += 1;
        let (bx, by) = self.buckets[index];
        Some(Bucket { index, bx, by })
    }
    /// Number of buckets handed out so far.
    pub fn claimed(&self) -> usize {
        *lock_or_recover(&self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::order::BucketOrderType;
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn partial_buckets_on_the_border() {
        let queue = BucketQueue::new(100, 40, 32, &BucketOrder::new(BucketOrderType::Row, false));
        assert_eq!(queue.dimensions(), (4, 2));
        assert_eq!(queue.len(), 8);
    }

    #[test]
    fn every_bucket_is_claimed_exactly_once() {
        let queue = BucketQueue::new(640, 480, 16, &BucketOrder::new(BucketOrderType::Hilbert, false));
        let n = queue.len();
        let counts: Vec<AtomicUsize> = (0..n).map(|_| AtomicUsize::new(0)).collect();
        let cancel = CancelFlag::new();
        crossbeam::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|_| {
                    while let Some(bucket) = queue.claim(&cancel) {
                        counts[bucket.index].fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        })
        .unwrap();
        assert!(counts.iter().all(|c| c.load(Ordering::SeqCst) == 1));
        assert_eq!(queue.claimed(), n);
        assert!(queue.claim(&cancel).is_none());
    }

    #[test]
    fn cancellation_stops_claims() {
        let queue = BucketQueue::new(64, 64, 16, &BucketOrder::new(BucketOrderType::Spiral, false));
        let cancel = CancelFlag::new();
        assert!(queue.claim(&cancel).is_some());
        cancel.cancel();
        assert!(queue.claim(&cancel).is_none());
        assert_eq!(queue.claimed(), 1);
    }
}
