//! Performance metrics and run reports

use crate::scheduler::Policy;
use crate::task::Task;
use crate::timeline::HistoryEntry;
use core_types::{Priority, TaskId, TaskState, Tick};
use serde::{Deserialize, Serialize};

/// Per-task timing metrics, available once a task terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskMetrics {
    /// finish_time - arrival
    pub turnaround: Tick,
    /// turnaround - duration
    pub waiting: Tick,
    /// start_time - arrival
    pub response: Tick,
}

/// Averages over the finished tasks of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub finished: usize,
    pub avg_turnaround: f64,
    pub avg_waiting: f64,
    pub avg_response: f64,
}

impl MetricsSummary {
    /// Returns `None` when no task finished
    pub fn from_metrics<'a>(metrics: impl IntoIterator<Item = &'a TaskMetrics>) -> Option<Self> {
        let (mut finished, mut turnaround, mut waiting, mut response) = (0usize, 0u64, 0u64, 0u64);
        for m in metrics {
            finished += 1;
            turnaround += m.turnaround;
            waiting += m.waiting;
            response += m.response;
        }
        if finished == 0 {
            return None;
        }
        let n = finished as f64;
        Some(Self {
            finished,
            avg_turnaround: turnaround as f64 / n,
            avg_waiting: waiting as f64 / n,
            avg_response: response as f64 / n,
        })
    }
}

/// One row of the run report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskReport {
    pub id: TaskId,
    pub color: String,
    pub arrival: Tick,
    pub duration: Tick,
    pub priority: Priority,
    pub state: TaskState,
    pub start_time: Option<Tick>,
    pub finish_time: Option<Tick>,
    pub preemptions: u64,
    /// `None` for tasks that did not terminate
    pub metrics: Option<TaskMetrics>,
}

impl From<&Task> for TaskReport {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().clone(),
            color: task.color().to_string(),
            arrival: task.arrival(),
            duration: task.duration(),
            priority: task.priority(),
            state: task.state(),
            start_time: task.start_time(),
            finish_time: task.finish_time(),
            preemptions: task.preemptions(),
            metrics: task.metrics().ok(),
        }
    }
}

/// Everything a frontend needs after a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub policy: Policy,
    pub quantum: Option<u64>,
    /// Ticks simulated so far
    pub ticks: Tick,
    pub history: Vec<HistoryEntry>,
    pub tasks: Vec<TaskReport>,
    pub summary: Option<MetricsSummary>,
}

impl SimulationReport {
    /// Number of ticks in which the CPU had nothing to run
    pub fn idle_ticks(&self) -> usize {
        self.history.iter().filter(|entry| entry.is_idle()).count()
    }

    /// Total preemptions over all tasks
    pub fn total_preemptions(&self) -> u64 {
        self.tasks.iter().map(|task| task.preemptions).sum()
    }
}
