//! Engine error types

use core_types::{TaskId, TaskState};
use thiserror::Error;

/// Errors raised by a single task's state machine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Task identifiers must be non-empty
    #[error("Task id must not be empty")]
    EmptyId,

    /// A task needs at least one unit of work
    #[error("Task {0}: duration must be greater than zero")]
    ZeroDuration(TaskId),

    /// Requested transition is not an edge of the lifecycle
    #[error("Task {task}: invalid transition {from} -> {to}")]
    InvalidTransition {
        task: TaskId,
        from: TaskState,
        to: TaskState,
    },

    /// Metrics only exist once the task terminated
    #[error("Task {task} has not terminated (state {state}); metrics are unavailable")]
    Incomplete { task: TaskId, state: TaskState },
}

/// Errors raised by the scheduler and its factory
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// Policy name did not match any known policy
    #[error("Unsupported scheduling policy '{name}'. Valid policies: {valid}")]
    UnsupportedPolicy { name: String, valid: String },

    /// Quantum must be a positive number of ticks
    #[error("Invalid quantum {0}: must be greater than zero")]
    InvalidQuantum(u64),

    /// Task is already in the contention set
    #[error("Task {0} is already queued")]
    AlreadyQueued(TaskId),

    /// Task is not in the contention set
    #[error("Task {0} is not queued")]
    NotQueued(TaskId),
}

/// Errors raised by the simulator
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Two roster entries share an identifier
    #[error("Duplicate task id: {0}")]
    DuplicateTaskId(TaskId),

    /// No roster entry has this identifier
    #[error("Unknown task: {0}")]
    UnknownTask(TaskId),

    #[error(transparent)]
    Task(#[from] TaskError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}
