//! # Task Control Block
//!
//! A [`Task`] is the unit of schedulable work: static parameters from the
//! configuration, the lifecycle state machine, and the execution record
//! used for post-run analysis.
//!
//! Transitions are crate-private. Only the simulator drives a task through
//! its lifecycle; everything outside this crate gets read-only views.

use crate::error::TaskError;
use crate::metrics::TaskMetrics;
use core_types::{Priority, TaskId, TaskState, Tick};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Color used when the configuration leaves it empty
pub const DEFAULT_COLOR: &str = "#808080";

/// External event annotation carried over from the configuration
///
/// These are inert: the engine records them on the task but never acts on
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskEvent {
    /// I/O request at a relative execution time
    Io { at: Tick, duration: Tick },
    /// Mutex acquisition at a relative execution time
    MutexLock { mutex: String, at: Tick },
    /// Mutex release at a relative execution time
    MutexUnlock { mutex: String, at: Tick },
}

/// Entry of a task's execution history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExecutionEvent {
    /// Moved onto the CPU
    Dispatched { tick: Tick },
    /// Consumed one unit of work
    Executed { tick: Tick },
    /// Moved off the CPU in favor of another task
    Preempted { tick: Tick },
    /// Left contention on an external event
    Blocked { tick: Tick },
    /// Re-entered contention
    Unblocked { tick: Tick },
    /// Finished its last unit of work
    Finished { tick: Tick },
}

impl ExecutionEvent {
    /// Tick at which the event happened
    pub fn tick(&self) -> Tick {
        match *self {
            ExecutionEvent::Dispatched { tick }
            | ExecutionEvent::Executed { tick }
            | ExecutionEvent::Preempted { tick }
            | ExecutionEvent::Blocked { tick }
            | ExecutionEvent::Unblocked { tick }
            | ExecutionEvent::Finished { tick } => tick,
        }
    }
}

/// A simulated task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    color: String,
    arrival: Tick,
    duration: Tick,
    priority: Priority,
    events: Vec<TaskEvent>,

    state: TaskState,
    remaining: Tick,
    elapsed: Tick,
    start_time: Option<Tick>,
    finish_time: Option<Tick>,
    preemptions: u64,
    history: Vec<ExecutionEvent>,
    context: BTreeMap<String, String>,
}

impl Task {
    /// Creates a new task in state NEW
    ///
    /// Priority defaults to 0 and color to [`DEFAULT_COLOR`].
    pub fn new(id: impl Into<TaskId>, arrival: Tick, duration: Tick) -> Result<Self, TaskError> {
        let id = id.into();
        if id.is_empty() {
            return Err(TaskError::EmptyId);
        }
        if duration == 0 {
            return Err(TaskError::ZeroDuration(id));
        }

        Ok(Self {
            id,
            color: DEFAULT_COLOR.to_string(),
            arrival,
            duration,
            priority: 0,
            events: Vec::new(),
            state: TaskState::New,
            remaining: duration,
            elapsed: 0,
            start_time: None,
            finish_time: None,
            preemptions: 0,
            history: Vec::new(),
            context: BTreeMap::new(),
        })
    }

    /// Sets the priority (lower value = more urgent)
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the presentation color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Attaches configuration event annotations
    pub fn with_events(mut self, events: Vec<TaskEvent>) -> Self {
        self.events = events;
        self
    }

    /// Adds a free-form key/value annotation
    pub fn annotate(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.context.insert(key.into(), value.into());
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn arrival(&self) -> Tick {
        self.arrival
    }

    pub fn duration(&self) -> Tick {
        self.duration
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn events(&self) -> &[TaskEvent] {
        &self.events
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Units of work still needed
    pub fn remaining(&self) -> Tick {
        self.remaining
    }

    /// Units of work already consumed
    pub fn elapsed(&self) -> Tick {
        self.elapsed
    }

    /// Tick of the first dispatch, if any
    pub fn start_time(&self) -> Option<Tick> {
        self.start_time
    }

    /// Tick at which the last unit of work completed, if any
    pub fn finish_time(&self) -> Option<Tick> {
        self.finish_time
    }

    /// Number of times the task was moved off the CPU by another task
    pub fn preemptions(&self) -> u64 {
        self.preemptions
    }

    /// Cumulative CPU time consumed
    pub fn cpu_time(&self) -> Tick {
        self.elapsed
    }

    /// Append-only execution history
    pub fn history(&self) -> &[ExecutionEvent] {
        &self.history
    }

    /// Free-form annotations
    pub fn context(&self) -> &BTreeMap<String, String> {
        &self.context
    }

    pub fn is_terminated(&self) -> bool {
        self.state.is_terminal()
    }

    /// Derives turnaround, waiting and response times
    ///
    /// Fails until the task has terminated.
    pub fn metrics(&self) -> Result<TaskMetrics, TaskError> {
        match (self.state, self.start_time, self.finish_time) {
            (TaskState::Terminated, Some(start), Some(finish)) => {
                let turnaround = finish - self.arrival;
                Ok(TaskMetrics {
                    turnaround,
                    waiting: turnaround - self.duration,
                    response: start - self.arrival,
                })
            }
            _ => Err(TaskError::Incomplete {
                task: self.id.clone(),
                state: self.state,
            }),
        }
    }

    /// Puts the task back in state NEW with a fresh execution record
    ///
    /// Static parameters, event annotations and context are kept.
    pub(crate) fn reset(&mut self) {
        self.state = TaskState::New;
        self.remaining = self.duration;
        self.elapsed = 0;
        self.start_time = None;
        self.finish_time = None;
        self.preemptions = 0;
        self.history.clear();
    }

    /// NEW -> READY
    pub(crate) fn admit(&mut self) -> Result<(), TaskError> {
        self.transition(TaskState::New, TaskState::Ready)
    }

    /// READY -> RUNNING; records the start time on first dispatch
    pub(crate) fn dispatch(&mut self, now: Tick) -> Result<(), TaskError> {
        self.transition(TaskState::Ready, TaskState::Running)?;
        if self.start_time.is_none() {
            self.start_time = Some(now);
        }
        self.history.push(ExecutionEvent::Dispatched { tick: now });
        Ok(())
    }

    /// Consumes one unit of work
    ///
    /// Returns true if this unit was the last one, in which case the task
    /// is TERMINATED with `finish_time = now + 1`.
    pub(crate) fn execute(&mut self, now: Tick) -> Result<bool, TaskError> {
        if self.state != TaskState::Running {
            return Err(TaskError::InvalidTransition {
                task: self.id.clone(),
                from: self.state,
                to: TaskState::Running,
            });
        }

        self.remaining -= 1;
        self.elapsed += 1;
        self.history.push(ExecutionEvent::Executed { tick: now });

        if self.remaining == 0 {
            self.transition(TaskState::Running, TaskState::Terminated)?;
            self.finish_time = Some(now + 1);
            self.history.push(ExecutionEvent::Finished { tick: now + 1 });
            return Ok(true);
        }
        Ok(false)
    }

    /// RUNNING -> READY
    pub(crate) fn preempt(&mut self, now: Tick) -> Result<(), TaskError> {
        self.transition(TaskState::Running, TaskState::Ready)?;
        self.preemptions += 1;
        self.history.push(ExecutionEvent::Preempted { tick: now });
        Ok(())
    }

    /// RUNNING -> BLOCKED
    pub(crate) fn block(&mut self, now: Tick) -> Result<(), TaskError> {
        self.transition(TaskState::Running, TaskState::Blocked)?;
        self.history.push(ExecutionEvent::Blocked { tick: now });
        Ok(())
    }

    /// BLOCKED -> READY
    pub(crate) fn unblock(&mut self, now: Tick) -> Result<(), TaskError> {
        self.transition(TaskState::Blocked, TaskState::Ready)?;
        self.history.push(ExecutionEvent::Unblocked { tick: now });
        Ok(())
    }

    /// Moves `from -> to`, failing if the task is not in `from`
    fn transition(&mut self, from: TaskState, to: TaskState) -> Result<(), TaskError> {
        if self.state != from || !from.can_transition_to(to) {
            return Err(TaskError::InvalidTransition {
                task: self.id.clone(),
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}
