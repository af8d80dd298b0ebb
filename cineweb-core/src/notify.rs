use std::collections::VecDeque;

const DEFAULT_CAPACITY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub level: Level,
    pub message: String,
}

/// Non-blocking notifications (toasts).
///
/// The oldest notification is dropped when the queue is full.
#[derive(Debug, Clone)]
pub struct Notifications {
    next_id: u64,
    capacity: usize,
    items: VecDeque<Notification>,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl Notifications {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            next_id: 0,
            capacity,
            items: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, level: Level, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(Notification {
            id,
            level,
            message: message.into(),
        });
        id
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.push(Level::Info, message)
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(Level::Success, message)
    }

    pub fn warn(&mut self, message: impl Into<String>) -> u64 {
        self.push(Level::Warning, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(Level::Error, message)
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let len = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != len
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_oldest_when_full() {
        let mut n = Notifications::with_capacity(2);
        n.info("a");
        n.warn("b");
        n.error("c");
        let messages: Vec<_> = n.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["b", "c"]);
    }

    #[test]
    fn dismiss_by_id() {
        let mut n = Notifications::default();
        let a = n.success("a");
        let b = n.info("b");
        assert!(n.dismiss(a));
        assert!(!n.dismiss(a));
        assert_eq!(n.len(), 1);
        assert_eq!(n.iter().next().unwrap().id, b);
    }
}
