//! Cooperative, single-pending-task scheduler.
//!
//! Work that has to unfold over several host frames (paced text, animated HP
//! bars, prompts) is queued as a [`Task`]; the host calls [`EventQueue::tick`]
//! once per frame and at most one task is ever in progress.

use std::collections::VecDeque;

/// Well-known queue names.
pub const BATTLE_EVENT_QUEUE: &str = "battle-event-queue";
pub const MOVE_EVENT_QUEUE: &str = "move-event-queue";
pub const BATTLE_INTERACTION_EVENT_QUEUE: &str = "battle-interaction-event-queue";

/// A unit of queued work, driven by a host of type `H`.
pub trait Task<H> {
    /// Fired exactly once, when the task becomes current.
    fn on_start(&mut self, host: &mut H);

    /// Advances the task; returns `true` once it is finished.
    fn tick(&mut self, host: &mut H) -> bool;
}

#[derive(Debug)]
pub struct EventQueue<T> {
    pending: VecDeque<T>,
    current: Option<T>,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self {
            pending: VecDeque::new(),
            current: None,
        }
    }
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, task: T) {
        self.pending.push_back(task);
    }

    /// True when nothing is queued and nothing is in progress.
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.pending.is_empty()
    }

    /// Queued tasks plus the one in progress.
    pub fn len(&self) -> usize {
        self.pending.len() + usize::from(self.current.is_some())
    }

    /// Drops queued and current tasks without running the rest of their lifecycle.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.current = None;
    }

    /// Moves every task queued in `other` to the back of this queue. An
    /// in-progress task of `other` goes first, ahead of its pending ones.
    pub fn append(&mut self, other: EventQueue<T>) {
        let EventQueue { pending, current } = other;
        self.pending.extend(current);
        self.pending.extend(pending);
    }

    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    pub fn pending(&self) -> impl Iterator<Item = &T> {
        self.pending.iter()
    }

    /// Starts the next task if none is current, then ticks the current task.
    ///
    /// A task that finishes on its first tick is started and discarded within
    /// the same call.
    pub fn tick<H>(&mut self, host: &mut H)
    where
        T: Task<H>,
    {
        if self.current.is_none() {
            let Some(mut next) = self.pending.pop_front() else {
                return;
            };
            next.on_start(host);
            self.current = Some(next);
        }

        if let Some(current) = self.current.as_mut() {
            if current.tick(host) {
                self.current = None;
            }
        }
    }
}
