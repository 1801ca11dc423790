//! Dispatch queue between the reconciliation loop and the workers.

use std::collections::VecDeque;

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::tunnel::Target;

/// Unbounded FIFO with a suspending `pop`.
///
/// One producer, any number of consumers; each pushed target is handed to
/// exactly one `pop` unless `drain` removes it first.
#[derive(Debug, Default)]
pub struct DispatchQueue {
    items: Mutex<VecDeque<Target>>,
    available: Notify,
}

impl DispatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, target: Target) {
        self.items.lock().push_back(target);
        self.available.notify_one();
    }

    /// Push a batch, keeping its order.
    pub fn extend<I>(&self, targets: I) -> usize
    where
        I: IntoIterator<Item = Target>,
    {
        let mut pushed = 0;
        for target in targets {
            self.push(target);
            pushed += 1;
        }
        pushed
    }

    /// Take the oldest target, waiting while the queue is empty.
    pub async fn pop(&self) -> Target {
        loop {
            let notified = self.available.notified();
            {
                let mut items = self.items.lock();
                if let Some(target) = items.pop_front() {
                    // notify_one keeps a single permit; pass the wakeup on
                    // so an idle consumer picks up the remainder.
                    if !items.is_empty() {
                        self.available.notify_one();
                    }
                    return target;
                }
            }
            notified.await;
        }
    }

    pub fn try_pop(&self) -> Option<Target> {
        self.items.lock().pop_front()
    }

    /// Discard everything still queued, returning how many were dropped.
    pub fn drain(&self) -> usize {
        let mut items = self.items.lock();
        let dropped = items.len();
        items.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}
