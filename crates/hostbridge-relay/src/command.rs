//! Out-of-band control commands from the host.
//!
//! The host can interleave control frames with regular traffic on the
//! same channel. A transport implementation parses them into [`Command`]
//! values and parks them in a [`CommandQueue`]; the worker polls the
//! queue at safe points (chunk boundaries) via
//! [`Transport::poll_command`](crate::Transport::poll_command).
//!
//! Polling is kind-filtered: a command of a different kind stays queued
//! untouched, so a late `StreamStop` that arrives after its stream
//! already ended remains observable to whoever asks for it next.

use std::collections::VecDeque;

/// Default maximum number of commands that can be queued.
const DEFAULT_CAPACITY: usize = 16;

/// A control command delivered by the host outside the request flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Stop an in-progress response stream. The worker acknowledges with
    /// an empty terminal frame so the host does not wait forever.
    StreamStop,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::StreamStop => CommandKind::StreamStop,
        }
    }
}

/// Selector used when polling the queue for a specific command type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    StreamStop,
}

/// Bounded FIFO of pending control commands.
///
/// When the queue is full, the oldest undelivered command is dropped to
/// make room; the host treats commands as advisory and a stale one is
/// worth less than the newest.
#[derive(Debug)]
pub struct CommandQueue {
    queue: VecDeque<Command>,
    capacity: usize,
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandQueue {
    /// Create an empty queue with the default capacity (16).
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty queue with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Enqueue a command, dropping the oldest one if the queue is full.
    pub fn push(&mut self, command: Command) {
        if self.queue.len() >= self.capacity {
            let dropped = self.queue.pop_front();
            tracing::warn!(
                dropped = ?dropped,
                queue_capacity = self.capacity,
                "command queue full, dropped oldest command"
            );
        }
        self.queue.push_back(command);
        tracing::debug!(command = ?command, queue_len = self.queue.len(), "command enqueued");
    }

    /// Remove and return the oldest command of the given kind.
    ///
    /// Commands of other kinds keep their place in the queue.
    pub fn take(&mut self, kind: CommandKind) -> Option<Command> {
        let idx = self.queue.iter().position(|c| c.kind() == kind)?;
        let command = self.queue.remove(idx)?;
        tracing::debug!(command = ?command, remaining = self.queue.len(), "command dequeued");
        Some(command)
    }

    /// Whether a command of the given kind is queued, without removing it.
    pub fn contains(&self, kind: CommandKind) -> bool {
        self.queue.iter().any(|c| c.kind() == kind)
    }

    /// Number of commands currently queued.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Construction ───────────────────────────────────────────────

    #[test]
    fn new_queue_is_empty() {
        let queue = CommandQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn custom_capacity() {
        let queue = CommandQueue::with_capacity(4);
        assert_eq!(queue.capacity, 4);
    }

    // ── Push and take ──────────────────────────────────────────────

    #[test]
    fn take_empty_returns_none() {
        let mut queue = CommandQueue::new();
        assert!(queue.take(CommandKind::StreamStop).is_none());
    }

    #[test]
    fn push_then_take() {
        let mut queue = CommandQueue::new();
        queue.push(Command::StreamStop);
        assert_eq!(queue.take(CommandKind::StreamStop), Some(Command::StreamStop));
        assert!(queue.is_empty());
    }

    #[test]
    fn take_drains_in_fifo_order() {
        let mut queue = CommandQueue::new();
        queue.push(Command::StreamStop);
        queue.push(Command::StreamStop);

        assert!(queue.take(CommandKind::StreamStop).is_some());
        assert_eq!(queue.len(), 1);
        assert!(queue.take(CommandKind::StreamStop).is_some());
        assert!(queue.take(CommandKind::StreamStop).is_none());
    }

    #[test]
    fn contains_does_not_consume() {
        let mut queue = CommandQueue::new();
        queue.push(Command::StreamStop);

        assert!(queue.contains(CommandKind::StreamStop));
        assert_eq!(queue.len(), 1);
    }

    // ── Queue bounding ─────────────────────────────────────────────

    #[test]
    fn queue_drops_oldest_when_full() {
        let mut queue = CommandQueue::with_capacity(2);
        queue.push(Command::StreamStop);
        queue.push(Command::StreamStop);
        queue.push(Command::StreamStop);

        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn overfill_with_default_capacity() {
        let mut queue = CommandQueue::new();
        for _ in 0..20 {
            queue.push(Command::StreamStop);
        }
        assert_eq!(queue.len(), 16);

        let mut count = 0;
        while queue.take(CommandKind::StreamStop).is_some() {
            count += 1;
        }
        assert_eq!(count, 16);
    }
}
