//! Execution timeline: per-tick history and derived intervals

use core_types::{TaskId, Tick};
use serde::{Deserialize, Serialize};

/// One simulated tick of the execution history
///
/// `task == None` means the CPU was idle during `tick`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub tick: Tick,
    pub task: Option<TaskId>,
}

impl HistoryEntry {
    pub fn new(tick: Tick, task: Option<TaskId>) -> Self {
        Self { tick, task }
    }

    pub fn is_idle(&self) -> bool {
        self.task.is_none()
    }
}

/// Contiguous run of one task on the CPU, covering `[start, end)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionInterval {
    pub task: TaskId,
    pub start: Tick,
    pub end: Tick,
}

impl ExecutionInterval {
    pub fn len(&self) -> Tick {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// What happened during one tick
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TickRecord {
    /// Tick that was simulated
    pub tick: Tick,
    /// Tasks that arrived and entered contention
    pub admitted: Vec<TaskId>,
    /// Task moved off the CPU in favor of `selected`
    pub preempted: Option<TaskId>,
    /// Task that ran; `None` when idle
    pub selected: Option<TaskId>,
    /// Task that finished its last unit of work
    pub completed: Option<TaskId>,
}

impl TickRecord {
    /// History entry this tick contributed
    pub fn entry(&self) -> HistoryEntry {
        HistoryEntry::new(self.tick, self.selected.clone())
    }
}

/// Collapses a history into execution intervals, idle ticks excluded
///
/// Intervals come out in time order. Consecutive entries of the same task
/// merge only if their ticks are adjacent.
pub fn execution_intervals(history: &[HistoryEntry]) -> Vec<ExecutionInterval> {
    let mut intervals: Vec<ExecutionInterval> = Vec::new();

    for entry in history {
        let Some(task) = &entry.task else {
            continue;
        };
        match intervals.last_mut() {
            Some(last) if &last.task == task && last.end == entry.tick => last.end += 1,
            _ => intervals.push(ExecutionInterval {
                task: task.clone(),
                start: entry.tick,
                end: entry.tick + 1,
            }),
        }
    }

    intervals
}
