//! # Scheduling Kernel
//!
//! A deterministic, tick-driven CPU scheduling simulator.
//!
//! ## Purpose
//!
//! The kernel replays how a single CPU is shared between a fixed set of
//! tasks under a chosen policy:
//! - FIFO: first come, first served, never preempts
//! - SRTF: shortest remaining time first, preemptive
//! - PRIORITY: lowest priority value first, preemptive
//!
//! Time is discrete. One tick executes exactly one unit of work of one
//! task, or nothing.
//!
//! ## Philosophy
//!
//! **Same input, same history.**
//!
//! There is no wall clock, no randomness and no hidden iteration order.
//! Ties are always broken by run-queue insertion order, and the run
//! queue is filled in roster order.
//!
//! The engine never prints. Frontends read [`Simulator::snapshot`],
//! [`Simulator::report`] or register a [`TickObserver`].

pub mod clock;
pub mod error;
pub mod metrics;
pub mod observer;
pub mod roster;
pub mod scheduler;
pub mod simulator;
pub mod snapshot;
pub mod task;
pub mod test_utils;
pub mod timeline;

pub use clock::SimClock;
pub use error::{EngineError, SchedulerError, TaskError};
pub use metrics::{MetricsSummary, SimulationReport, TaskMetrics, TaskReport};
pub use observer::{StopHandle, TickObserver};
pub use roster::Roster;
pub use scheduler::{Policy, Scheduler, SchedulerFactory};
pub use simulator::{Simulator, Steps};
pub use snapshot::{SimulationSnapshot, TaskSnapshot};
pub use task::{ExecutionEvent, Task, TaskEvent, DEFAULT_COLOR};
pub use timeline::{execution_intervals, ExecutionInterval, HistoryEntry, TickRecord};

pub use core_types::{Priority, TaskId, TaskState, Tick};
