//! # Task Queue
//!
//! Fire-and-forget delivery of named jobs with a payload. Producers never
//! block and never observe delivery failures; a dropped worker is logged and
//! the task is lost, which is the contract the endpoints rely on.

use tokio::sync::mpsc;

use crate::observability::Logger;

/// A named background job with its payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Confirmation mail after a conference is created
    SendConfirmationEmail {
        email: String,
        conference_info: String,
    },
    /// Recompute the featured-speaker string for a conference
    SetFeaturedSpeaker {
        conference_key: String,
        speaker: String,
    },
}

impl Task {
    /// Job name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Task::SendConfirmationEmail { .. } => "send_confirmation_email",
            Task::SetFeaturedSpeaker { .. } => "set_featured_speaker",
        }
    }
}

/// Producer handle for enqueuing tasks
#[derive(Debug, Clone)]
pub struct TaskQueue {
    tx: mpsc::UnboundedSender<Task>,
}

impl TaskQueue {
    /// Creates a queue and the receiver its worker will drain
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Task>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queue whose worker side is already gone; enqueued tasks are dropped.
    /// Useful in tests that do not exercise side effects.
    pub fn detached() -> Self {
        let (queue, _rx) = Self::new();
        queue
    }

    /// Enqueues a task. Never blocks, never fails the caller.
    pub fn enqueue(&self, task: Task) {
        let name = task.name();
        if self.tx.send(task).is_err() {
            Logger::warn("task_queue_closed", &[("task", name)]);
        }
    }
}
