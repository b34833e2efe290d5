use std::collections::VecDeque;
use std::time::Duration;

pub type NotificationId = u64;

/// How long a notification stays visible unless dismissed.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);
/// Live notifications kept before the oldest is evicted.
pub const MAX_NOTIFICATIONS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub text: String,
    pub severity: Severity,
}

/// Result of [`NotificationQueue::enqueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enqueued {
    pub id: NotificationId,
    pub evicted: Option<NotificationId>,
}

/// Stacked toasts, oldest first. Identical texts are never coalesced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationQueue {
    next_id: NotificationId,
    capacity: usize,
    entries: VecDeque<Notification>,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::with_capacity(MAX_NOTIFICATIONS)
    }
}

impl NotificationQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            next_id: 1,
            capacity: capacity.max(1),
            entries: VecDeque::new(),
        }
    }

    pub fn enqueue(&mut self, text: impl Into<String>, severity: Severity) -> Enqueued {
        let id = self.next_id;
        self.next_id += 1;

        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front().map(|old| old.id)
        } else {
            None
        };

        self.entries.push_back(Notification {
            id,
            text: text.into(),
            severity,
        });
        Enqueued { id, evicted }
    }

    /// Removes the notification; returns false if it was already gone.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        match self.entries.iter().position(|n| n.id == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
