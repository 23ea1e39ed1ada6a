//! Transient error notifications.
//!
//! Notifications stack rather than replace each other. Each one is removed
//! by its own dismiss task, independently of the others. The stack is
//! capped; pushing past the cap supersedes the oldest notification.

use std::collections::VecDeque;
use std::time::Instant;

/// Identifies a notification for its dismiss task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(u64);

/// A visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub created_at: Instant,
}

/// The visible notification stack, oldest first.
#[derive(Debug)]
pub struct NotificationCenter {
    items: VecDeque<Notification>,
    next_id: u64,
    max_visible: usize,
}

impl NotificationCenter {
    /// Creates an empty stack holding at most `max_visible` notifications.
    pub fn new(max_visible: usize) -> Self {
        Self {
            items: VecDeque::new(),
            next_id: 1,
            max_visible: max_visible.max(1),
        }
    }

    /// Adds a notification.
    ///
    /// Returns the new notification's id and the ids of any notifications
    /// it superseded, so their dismiss tasks can be cancelled.
    pub fn push(
        &mut self,
        message: impl Into<String>,
        now: Instant,
    ) -> (NotificationId, Vec<NotificationId>) {
        let id = NotificationId(self.next_id);
        self.next_id += 1;
        self.items.push_back(Notification {
            id,
            message: message.into(),
            created_at: now,
        });

        let mut superseded = Vec::new();
        while self.items.len() > self.max_visible {
            if let Some(old) = self.items.pop_front() {
                superseded.push(old.id);
            }
        }
        (id, superseded)
    }

    /// Removes one notification. Returns false if it is already gone.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        match self.items.iter().position(|n| n.id == id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifications_stack() {
        let now = Instant::now();
        let mut center = NotificationCenter::new(5);
        let (first, _) = center.push("one", now);
        let (second, superseded) = center.push("two", now);

        assert!(superseded.is_empty());
        assert_eq!(center.len(), 2);

        // Dismissing one leaves the other alone
        assert!(center.dismiss(first));
        assert!(!center.dismiss(first));
        let remaining: Vec<NotificationId> = center.iter().map(|n| n.id).collect();
        assert_eq!(remaining, vec![second]);
    }

    #[test]
    fn test_oldest_is_superseded_past_cap() {
        let now = Instant::now();
        let mut center = NotificationCenter::new(2);
        let (a, _) = center.push("a", now);
        center.push("b", now);
        let (_, superseded) = center.push("c", now);

        assert_eq!(superseded, vec![a]);
        let messages: Vec<&str> = center.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["b", "c"]);
    }
}
