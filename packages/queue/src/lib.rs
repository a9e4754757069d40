//! In-process FIFO job queue.
//!
//! The grading pipeline is deliberately single-process: jobs live in memory
//! and are lost on restart. Deduplication happens upstream in the submission
//! coordinator, before anything is enqueued; this layer is order-only.

use std::collections::VecDeque;

use tokio::sync::Mutex;

/// A FIFO queue shared between the enqueue endpoint and the worker loop.
///
/// All operations lock the backing deque, so concurrent producers are safe
/// under a multi-threaded runtime. Consumption is single-owner by
/// convention: exactly one worker loop drains the queue.
#[derive(Debug, Default)]
pub struct JobQueue<T> {
    inner: Mutex<VecDeque<T>>,
}

impl<T> JobQueue<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    /// Append a job to the tail.
    pub async fn enqueue(&self, job: T) {
        self.inner.lock().await.push_back(job);
    }

    /// Remove and return the head, or `None` when empty.
    pub async fn dequeue(&self) -> Option<T> {
        self.inner.lock().await.pop_front()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

impl<T: Clone> JobQueue<T> {
    /// Return a copy of the head without removing it, or `None` when empty.
    pub async fn peek(&self) -> Option<T> {
        self.inner.lock().await.front().cloned()
    }
}
