//! Ephemeral notification queue
//!
//! Display-only queue fed by the same event stream as the article cache,
//! but fully decoupled from it: nothing here ever touches cached state.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::{interval, Instant};
use tokio_util::sync::CancellationToken;

use crate::types::ArticleEvent;

/// How long a notification stays visible
pub const NOTIFICATION_TTL: Duration = Duration::from_millis(5000);

/// One queued notification
#[derive(Clone, Debug)]
pub struct NotificationItem {
    pub event: ArticleEvent,
    pub inserted_at: Instant,
    pub expires_at: Instant,
}

/// TTL-bounded display queue, oldest first.
///
/// Bounded at [`NotificationQueue::DEFAULT_CAPACITY`] items; beyond the cap
/// the oldest entry is dropped, since under an event storm the stalest
/// notification is the least useful one on screen.
#[derive(Debug)]
pub struct NotificationQueue {
    items: VecDeque<NotificationItem>,
    ttl: Duration,
    capacity: usize,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationQueue {
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new() -> Self {
        Self::with_config(NOTIFICATION_TTL, Self::DEFAULT_CAPACITY)
    }

    pub fn with_config(ttl: Duration, capacity: usize) -> Self {
        Self {
            items: VecDeque::new(),
            ttl,
            capacity,
        }
    }

    /// Append a notification expiring one TTL from now
    pub fn push(&mut self, event: ArticleEvent) {
        let now = Instant::now();
        self.items.push_back(NotificationItem {
            event,
            inserted_at: now,
            expires_at: now + self.ttl,
        });

        while self.items.len() > self.capacity {
            self.items.pop_front();
        }
    }

    /// Drop items whose deadline has passed, oldest first.
    ///
    /// Insertion order and a fixed TTL mean the front of the queue always
    /// expires first.
    pub fn purge_expired(&mut self) {
        let now = Instant::now();
        while self
            .items
            .front()
            .is_some_and(|item| item.expires_at <= now)
        {
            self.items.pop_front();
        }
    }

    /// Queued notifications, oldest first
    pub fn items(&self) -> impl Iterator<Item = &NotificationItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Periodic expiry sweep, independent of event application.
///
/// Runs until the token is cancelled.
pub async fn run_expiry(
    queue: Arc<Mutex<NotificationQueue>>,
    every: Duration,
    shutdown: CancellationToken,
) {
    let mut timer = interval(every);
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = timer.tick() => queue.lock().purge_expired(),
        }
    }
}
