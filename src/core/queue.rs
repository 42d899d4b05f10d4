//! # Shared task queue.
//!
//! [`TaskQueue`] is a bounded multi-producer multi-consumer FIFO built on
//! [`async_channel`]. Its receiver is `Clone`, so every worker and the resolver
//! hold their own handle and no lock sits on the receive path.
//!
//! ## Rules
//! - Capacity equals the pool's parallelism factor.
//! - `push` waits while the queue is full (backpressure); nothing is dropped.
//! - The queue owns both channel ends, so it is never closed while any clone lives.
//! - Failed items are requeued at the back.

use async_channel::{Receiver, Sender, TrySendError};

use crate::error::PushError;

/// Bounded MPMC queue of pending items shared by all generations.
#[derive(Debug)]
pub struct TaskQueue<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T> Clone for TaskQueue<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rx: self.rx.clone(),
        }
    }
}

impl<T> TaskQueue<T> {
    /// Creates a queue holding at most `capacity` items (clamped to >= 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = async_channel::bounded(capacity.max(1));
        Self { tx, rx }
    }

    /// Enqueues an item, waiting while the queue is full.
    pub async fn push(&self, item: T) {
        // Both ends are held by `self`, so the channel cannot be closed here.
        let _ = self.tx.send(item).await;
    }

    /// Enqueues an item without waiting.
    pub fn try_push(&self, item: T) -> Result<(), PushError<T>> {
        self.tx.try_send(item).map_err(|e| match e {
            TrySendError::Full(item) | TrySendError::Closed(item) => PushError::Full(item),
        })
    }

    /// Waits for the next item.
    ///
    /// Callers race this against their cancellation tokens.
    pub async fn recv(&self) -> Option<T> {
        self.rx.recv().await.ok()
    }

    /// Number of items currently queued.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn fifo_with_requeue_at_back() {
        let q = TaskQueue::new(3);
        q.push(1).await;
        q.push(2).await;

        let first = q.recv().await.expect("item");
        q.push(first).await;

        assert_eq!(q.recv().await, Some(2));
        assert_eq!(q.recv().await, Some(1));
        assert!(q.is_empty());
    }

    #[tokio::test]
    async fn try_push_hands_item_back_when_full() {
        let q = TaskQueue::new(1);
        assert!(q.try_push("a").is_ok());

        let err = q.try_push("b").expect_err("queue is full");
        assert_eq!(err.into_inner(), "b");
        assert_eq!(q.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn push_waits_for_capacity() {
        let q = TaskQueue::new(1);
        q.push(1).await;

        let producer = q.clone();
        let blocked = tokio::spawn(async move { producer.push(2).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!blocked.is_finished());

        assert_eq!(q.recv().await, Some(1));
        blocked.await.expect("producer");
        assert_eq!(q.recv().await, Some(2));
    }
}
