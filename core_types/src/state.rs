//! Task lifecycle states

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a simulated task
///
/// Legal transitions:
///
/// ```text
/// New -> Ready -> Running -> Terminated
///          ^        |  |
///          +--------+  v
///          ^        Blocked
///          +-----------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    /// Created, arrival tick not reached yet
    New,
    /// In contention, waiting for the CPU
    Ready,
    /// Occupying the CPU
    Running,
    /// Waiting on an external event, out of contention
    Blocked,
    /// All work done
    Terminated,
}

impl TaskState {
    /// Returns true if `next` is a legal successor of this state
    pub fn can_transition_to(self, next: TaskState) -> bool {
        matches!(
            (self, next),
            (TaskState::New, TaskState::Ready)
                | (TaskState::Ready, TaskState::Running)
                | (TaskState::Running, TaskState::Ready)
                | (TaskState::Running, TaskState::Blocked)
                | (TaskState::Blocked, TaskState::Ready)
                | (TaskState::Running, TaskState::Terminated)
        )
    }

    /// Returns true if a task in this state may be picked by a scheduler
    pub fn is_eligible(self) -> bool {
        matches!(self, TaskState::Ready | TaskState::Running)
    }

    /// Returns true for the terminal state
    pub fn is_terminal(self) -> bool {
        self == TaskState::Terminated
    }

    /// Upper-case label used in reports and snapshots
    pub fn as_str(self) -> &'static str {
        match self {
            TaskState::New => "NEW",
            TaskState::Ready => "READY",
            TaskState::Running => "RUNNING",
            TaskState::Blocked => "BLOCKED",
            TaskState::Terminated => "TERMINATED",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
