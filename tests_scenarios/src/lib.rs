//! Scenario Test Utilities
//!
//! Shared helpers for cross-crate scheduling tests.
//!
//! ## Test Philosophy
//!
//! - **Determinism**: the same configuration always yields the same history
//! - **Invariants over examples**: task bookkeeping holds after every tick,
//!   not only at the end
//! - **End to end**: configuration text, engine and renderer agree

use core_types::{TaskId, TaskState, Tick};
use sim_kernel::{HistoryEntry, Simulator, Task, TaskSnapshot, TickRecord};
use std::sync::Once;
use task_config::{ConfigError, SimulationConfig};

pub use sim_kernel::test_utils::{history_ids, history_string, simulator_for, tasks_from, TaskSpec};

static TRACING: Once = Once::new();

/// Routes engine tracing into the test harness output
///
/// Set `RUST_LOG=debug` to see per-tick events in failing tests.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Builds a loaded simulator from configuration text
pub fn simulator_from_config(text: &str) -> Result<Simulator, ConfigError> {
    SimulationConfig::from_text(text)?.build_simulator()
}

/// Per-tick bookkeeping checks, returned as a description of the first
/// violation
pub fn check_task_invariants(task: &Task) -> Result<(), String> {
    if task.remaining() + task.elapsed() != task.duration() {
        return Err(format!(
            "{}: remaining {} + elapsed {} != duration {}",
            task.id(),
            task.remaining(),
            task.elapsed(),
            task.duration()
        ));
    }
    if task.remaining() > task.duration() {
        return Err(format!("{}: remaining above duration", task.id()));
    }
    match task.state() {
        TaskState::New | TaskState::Ready if task.elapsed() == 0 && task.start_time().is_some() => {
            Err(format!("{}: started without executing", task.id()))
        }
        TaskState::Terminated if task.remaining() != 0 || task.finish_time().is_none() => {
            Err(format!("{}: terminated with work left", task.id()))
        }
        state if state != TaskState::Terminated && task.finish_time().is_some() => {
            Err(format!("{}: finish time set while {}", task.id(), state))
        }
        _ => Ok(()),
    }
}

const STATES: [TaskState; 5] = [
    TaskState::New,
    TaskState::Ready,
    TaskState::Running,
    TaskState::Blocked,
    TaskState::Terminated,
];

/// True if `to` can be reached from `from` through legal transitions
///
/// One tick may chain several of them (NEW -> READY -> RUNNING -> TERMINATED
/// for a one-unit task arriving now).
pub fn state_reachable(from: TaskState, to: TaskState) -> bool {
    let mut seen = vec![from];
    let mut frontier = vec![from];
    while let Some(state) = frontier.pop() {
        for next in STATES {
            if state.can_transition_to(next) && !seen.contains(&next) {
                seen.push(next);
                frontier.push(next);
            }
        }
    }
    seen.contains(&to)
}

/// Checks one task across a tick: legal state path, start and finish times
/// never rewritten once set
pub fn check_task_progress(before: &TaskSnapshot, after: &TaskSnapshot) -> Result<(), String> {
    if !state_reachable(before.state, after.state) {
        return Err(format!(
            "{}: illegal state change {} -> {}",
            after.id, before.state, after.state
        ));
    }
    if before.start_time.is_some() && before.start_time != after.start_time {
        return Err(format!(
            "{}: start time changed {:?} -> {:?}",
            after.id, before.start_time, after.start_time
        ));
    }
    if before.finish_time.is_some() && before.finish_time != after.finish_time {
        return Err(format!(
            "{}: finish time changed {:?} -> {:?}",
            after.id, before.finish_time, after.finish_time
        ));
    }
    Ok(())
}

/// Runs to completion, checking every task after every tick and against
/// its state before the tick
pub fn run_checked(
    simulator: &mut Simulator,
    max_ticks: Option<Tick>,
) -> Result<Vec<TickRecord>, String> {
    let mut records = Vec::new();
    let mut steps = simulator.steps(max_ticks);
    let mut previous = steps.simulator().snapshot();
    while let Some(record) = steps.next() {
        records.push(record.map_err(|e| e.to_string())?);
        for task in steps.simulator().roster() {
            check_task_invariants(task)?;
        }
        let current = steps.simulator().snapshot();
        for (before, after) in previous.tasks.iter().zip(&current.tasks) {
            check_task_progress(before, after)?;
        }
        previous = current;
    }
    Ok(records)
}

/// Ticks at which `task` held the CPU
pub fn ticks_of(history: &[HistoryEntry], task: &str) -> Vec<Tick> {
    history
        .iter()
        .filter(|entry| entry.task.as_ref().map(TaskId::as_str) == Some(task))
        .map(|entry| entry.tick)
        .collect()
}
