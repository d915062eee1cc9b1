//! Read-only views for step-by-step frontends

use crate::task::Task;
use core_types::{Priority, TaskId, TaskState, Tick};
use serde::{Deserialize, Serialize};

/// Per-task detail shown between ticks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub id: TaskId,
    pub state: TaskState,
    pub priority: Priority,
    pub arrival: Tick,
    pub duration: Tick,
    pub remaining: Tick,
    pub elapsed: Tick,
    pub start_time: Option<Tick>,
    pub finish_time: Option<Tick>,
    pub preemptions: u64,
}

impl From<&Task> for TaskSnapshot {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().clone(),
            state: task.state(),
            priority: task.priority(),
            arrival: task.arrival(),
            duration: task.duration(),
            remaining: task.remaining(),
            elapsed: task.elapsed(),
            start_time: task.start_time(),
            finish_time: task.finish_time(),
            preemptions: task.preemptions(),
        }
    }
}

/// Simulator state between two ticks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    /// Next tick to be simulated
    pub tick: Tick,
    /// Task that ran last tick and still holds the CPU
    pub running: Option<TaskId>,
    /// READY tasks in contention, in enqueue order
    pub ready: Vec<TaskId>,
    /// Every roster task, in roster order
    pub tasks: Vec<TaskSnapshot>,
}

impl SimulationSnapshot {
    pub fn task(&self, id: &TaskId) -> Option<&TaskSnapshot> {
        self.tasks.iter().find(|task| &task.id == id)
    }
}
