//! Typed deferred tasks advanced by simulated time.
//!
//! Every task carries the epoch it was scheduled in. Superseding a phase bumps
//! the epoch, which drops pending tasks and lets the world reject tokens that
//! became due earlier in the same tick.

use std::time::Duration;

/// Work the world defers until a delay elapsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeferredTask {
    /// Leave the intro for the title card.
    EnterTitle,
    /// Leave the drawing phase once the time's-up chime finished.
    EndDrawPhase,
    /// Unlock candidate selection after the lineup is revealed.
    ActivateSelection,
}

/// Handle identifying one scheduled execution of a task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TaskToken {
    task: DeferredTask,
    epoch: u64,
}

impl TaskToken {
    pub(crate) fn task(&self) -> DeferredTask {
        self.task
    }
}

#[derive(Clone, Copy, Debug)]
struct Pending {
    token: TaskToken,
    remaining: Duration,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Scheduler {
    pending: Vec<Pending>,
    epoch: u64,
}

impl Scheduler {
    /// Schedules `task` after `delay`, replacing an earlier schedule of the same task.
    pub(crate) fn schedule(&mut self, task: DeferredTask, delay: Duration) {
        self.cancel(task);
        self.pending.push(Pending {
            token: TaskToken {
                task,
                epoch: self.epoch,
            },
            remaining: delay,
        });
    }

    pub(crate) fn cancel(&mut self, task: DeferredTask) {
        self.pending.retain(|pending| pending.token.task != task);
    }

    pub(crate) fn is_scheduled(&self, task: DeferredTask) -> bool {
        self.pending.iter().any(|pending| pending.token.task == task)
    }

    /// Drops every pending task and invalidates tokens handed out so far.
    pub(crate) fn invalidate(&mut self) {
        self.pending.clear();
        self.epoch = self.epoch.wrapping_add(1);
    }

    pub(crate) fn is_current(&self, token: TaskToken) -> bool {
        token.epoch == self.epoch
    }

    /// Advances every pending task and returns the tokens that came due, in
    /// scheduling order.
    pub(crate) fn advance(&mut self, dt: Duration) -> Vec<TaskToken> {
        let mut due = Vec::new();
        self.pending.retain_mut(|pending| {
            pending.remaining = pending.remaining.saturating_sub(dt);
            if pending.remaining.is_zero() {
                due.push(pending.token);
                false
            } else {
                true
            }
        });
        due
    }
}
