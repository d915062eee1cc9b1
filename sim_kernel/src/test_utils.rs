//! Test utilities
//!
//! Small builders shared by unit tests and the scenario crate.

use crate::error::EngineError;
use crate::scheduler::SchedulerFactory;
use crate::simulator::Simulator;
use crate::task::Task;
use crate::timeline::HistoryEntry;
use core_types::{Priority, Tick};

/// `(id, arrival, duration, priority)`
pub type TaskSpec<'a> = (&'a str, Tick, Tick, Priority);

/// Builds tasks from compact specs, in the given order
pub fn tasks_from(specs: &[TaskSpec<'_>]) -> Result<Vec<Task>, EngineError> {
    specs
        .iter()
        .map(|&(id, arrival, duration, priority)| {
            Ok(Task::new(id, arrival, duration)?.with_priority(priority))
        })
        .collect()
}

/// Creates a simulator for `policy` with the given tasks loaded
pub fn simulator_for(policy: &str, specs: &[TaskSpec<'_>]) -> Result<Simulator, EngineError> {
    let mut simulator = Simulator::new(SchedulerFactory::create(policy, None)?);
    simulator.load(tasks_from(specs)?)?;
    Ok(simulator)
}

/// Task identifiers of a history, `None` for idle ticks
pub fn history_ids(history: &[HistoryEntry]) -> Vec<Option<&str>> {
    history
        .iter()
        .map(|entry| entry.task.as_ref().map(|id| id.as_str()))
        .collect()
}

/// Task identifiers of a history, `"-"` for idle ticks
pub fn history_string(history: &[HistoryEntry]) -> String {
    history
        .iter()
        .map(|entry| entry.task.as_ref().map_or("-", |id| id.as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}
