//! Deferred work
//!
//! A manual stand-in for animation frames and timers. Work is queued as
//! data (`Task`) and handed back to the engine when it comes due, either
//! on `run_frame` or when `advance_time` moves the virtual clock past its
//! deadline.

use lumen_dom::NodeId;

use crate::Priority;

/// Work the engine performs later
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// Write `message` into a live region
    CommitAnnouncement {
        priority: Priority,
        message: String,
    },
    /// Empty a live region unless it has been reused since
    ClearAnnouncement { priority: Priority, generation: u64 },
    /// Remove the debug toast unless a newer message replaced it
    RemoveToast { generation: u64 },
    /// Speak the focused element if focus is still on `target`
    ReadFocus { target: NodeId },
}

#[derive(Debug)]
struct Timer {
    due_ms: u64,
    seq: u64,
    task: Task,
}

/// Frame and timer queues
#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    frames: Vec<(u32, Task)>,
    timers: Vec<Timer>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time in milliseconds
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Run `task` on the `frames`-th upcoming frame
    pub fn after_frames(&mut self, frames: u32, task: Task) {
        tracing::trace!(frames, ?task, "task scheduled");
        self.frames.push((frames.max(1), task));
    }

    /// Run `task` once `delay_ms` of virtual time has passed
    pub fn after_ms(&mut self, delay_ms: u64, task: Task) {
        tracing::trace!(delay_ms, ?task, "timer scheduled");
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Timer {
            due_ms: self.now_ms + delay_ms,
            seq,
            task,
        });
    }

    /// Advance one frame, returning tasks that became due in queue order
    pub fn run_frame(&mut self) -> Vec<Task> {
        let mut due = Vec::new();
        let mut waiting = Vec::with_capacity(self.frames.len());
        for (remaining, task) in self.frames.drain(..) {
            if remaining <= 1 {
                due.push(task);
            } else {
                waiting.push((remaining - 1, task));
            }
        }
        self.frames = waiting;
        due
    }

    /// Move the clock forward, returning expired timers by deadline
    pub fn advance_time(&mut self, ms: u64) -> Vec<Task> {
        self.now_ms += ms;
        let now = self.now_ms;
        let (mut expired, waiting): (Vec<Timer>, Vec<Timer>) =
            self.timers.drain(..).partition(|t| t.due_ms <= now);
        self.timers = waiting;
        expired.sort_by_key(|t| (t.due_ms, t.seq));
        expired.into_iter().map(|t| t.task).collect()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn is_idle(&self) -> bool {
        self.frames.is_empty() && self.timers.is_empty()
    }

    /// Drop every queued `ReadFocus`
    pub fn cancel_focus_reads(&mut self) {
        self.timers.retain(|t| !matches!(t.task, Task::ReadFocus { .. }));
    }
}
