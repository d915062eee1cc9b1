//! Scheduling Policies
//!
//! This module provides the dispatch policies for the simulator.
//!
//! ## Philosophy
//!
//! - **Mechanism vs policy**: the [`Scheduler`] owns the contention set; the
//!   [`Policy`] only decides which eligible entry wins.
//! - **Determinism first**: same roster + same ticks => same schedule. Every
//!   tie is broken by enqueue order.
//! - **Selection is pure**: [`Scheduler::select_next`] never changes task
//!   state. The simulator applies the consequences.
//!
//! ## Policies
//!
//! - **FIFO**: first eligible task in enqueue order. A running task stays
//!   the earliest eligible entry, so FIFO never preempts.
//! - **SRTF**: smallest remaining work. Re-evaluated every tick.
//! - **PRIORITY**: smallest priority value. Re-evaluated every tick.

use crate::error::SchedulerError;
use crate::roster::Roster;
use crate::task::Task;
use core_types::TaskId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

/// Dispatch policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Policy {
    /// First come, first served
    Fifo,
    /// Shortest remaining time first
    Srtf,
    /// Preemptive priority
    Priority,
}

impl Policy {
    /// Every supported policy, in display order
    pub const ALL: [Policy; 3] = [Policy::Fifo, Policy::Srtf, Policy::Priority];

    /// Canonical upper-case name
    pub fn name(self) -> &'static str {
        match self {
            Policy::Fifo => "FIFO",
            Policy::Srtf => "SRTF",
            Policy::Priority => "PRIORITY",
        }
    }

    /// Returns true if the policy may take the CPU away from a running task
    pub fn is_preemptive(self) -> bool {
        !matches!(self, Policy::Fifo)
    }

    /// Comma-separated list of valid names, for error messages
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|policy| policy.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn pick<'a>(self, mut eligible: impl Iterator<Item = &'a Task>) -> Option<&'a Task> {
        match self {
            Policy::Fifo => eligible.next(),
            // min_by_key keeps the first of equal keys: enqueue order breaks ties
            Policy::Srtf => eligible.min_by_key(|task| task.remaining()),
            Policy::Priority => eligible.min_by_key(|task| task.priority()),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = SchedulerError;

    /// Case-insensitive; surrounding whitespace is ignored
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let key = name.trim();
        Self::ALL
            .into_iter()
            .find(|policy| !key.is_empty() && policy.name().eq_ignore_ascii_case(key))
            .ok_or_else(|| SchedulerError::UnsupportedPolicy {
                name: name.to_string(),
                valid: Self::valid_names(),
            })
    }
}

/// Contention set in enqueue order
///
/// A VecDeque keeps the ordering deterministic. Entries are only removed
/// explicitly; selection never pops.
#[derive(Debug, Clone, Default)]
struct RunQueue {
    queue: VecDeque<TaskId>,
}

impl RunQueue {
    fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    fn enqueue(&mut self, task_id: TaskId) {
        self.queue.push_back(task_id);
    }

    fn contains(&self, task_id: &TaskId) -> bool {
        self.queue.contains(task_id)
    }

    fn remove(&mut self, task_id: &TaskId) -> bool {
        match self.queue.iter().position(|id| id == task_id) {
            Some(index) => self.queue.remove(index).is_some(),
            None => false,
        }
    }

    fn iter(&self) -> impl Iterator<Item = &TaskId> {
        self.queue.iter()
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn clear(&mut self) {
        self.queue.clear();
    }
}

/// Policy-driven scheduler
///
/// Holds the identifiers of tasks in contention. Task data lives in the
/// simulator's [`Roster`], which is passed in at selection time.
#[derive(Debug, Clone)]
pub struct Scheduler {
    policy: Policy,
    /// Time slice for round-robin style policies; unused by the built-in ones
    quantum: Option<u64>,
    run_queue: RunQueue,
}

impl Scheduler {
    /// Creates a scheduler without a quantum
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            quantum: None,
            run_queue: RunQueue::new(),
        }
    }

    /// Creates a scheduler with a quantum
    pub fn with_quantum(policy: Policy, quantum: u64) -> Result<Self, SchedulerError> {
        if quantum == 0 {
            return Err(SchedulerError::InvalidQuantum(quantum));
        }
        Ok(Self {
            quantum: Some(quantum),
            ..Self::new(policy)
        })
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn quantum(&self) -> Option<u64> {
        self.quantum
    }

    /// Adds a task to the contention set
    pub fn enqueue(&mut self, task_id: TaskId) -> Result<(), SchedulerError> {
        if self.run_queue.contains(&task_id) {
            return Err(SchedulerError::AlreadyQueued(task_id));
        }
        self.run_queue.enqueue(task_id);
        Ok(())
    }

    /// Removes a task from the contention set
    pub fn dequeue(&mut self, task_id: &TaskId) -> Result<(), SchedulerError> {
        if self.run_queue.remove(task_id) {
            Ok(())
        } else {
            Err(SchedulerError::NotQueued(task_id.clone()))
        }
    }

    /// Picks the task that should occupy the CPU this tick
    ///
    /// Only READY or RUNNING tasks are considered, whatever else is still
    /// queued. Returns `None` when nothing is eligible.
    pub fn select_next(&self, roster: &Roster) -> Option<TaskId> {
        let eligible = self
            .run_queue
            .iter()
            .filter_map(|task_id| roster.get(task_id))
            .filter(|task| task.state().is_eligible());

        self.policy.pick(eligible).map(|task| task.id().clone())
    }

    /// Returns true if the task is in the contention set
    pub fn contains(&self, task_id: &TaskId) -> bool {
        self.run_queue.contains(task_id)
    }

    /// Contention set in enqueue order
    pub fn queued(&self) -> impl Iterator<Item = &TaskId> {
        self.run_queue.iter()
    }

    pub fn len(&self) -> usize {
        self.run_queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.run_queue.is_empty()
    }

    /// Empties the contention set
    pub fn clear(&mut self) {
        self.run_queue.clear();
    }
}

/// Builds schedulers from configuration names
pub struct SchedulerFactory;

impl SchedulerFactory {
    /// Creates a scheduler for `name` (case-insensitive)
    ///
    /// # Errors
    ///
    /// [`SchedulerError::UnsupportedPolicy`] for unknown or empty names,
    /// [`SchedulerError::InvalidQuantum`] for a zero quantum.
    pub fn create(name: &str, quantum: Option<u64>) -> Result<Scheduler, SchedulerError> {
        let policy = name.parse::<Policy>()?;
        match quantum {
            Some(quantum) => Scheduler::with_quantum(policy, quantum),
            None => Ok(Scheduler::new(policy)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;
    use core_types::TaskState;

    fn roster(tasks: Vec<Task>) -> Roster {
        Roster::new(tasks).unwrap()
    }

    fn admitted(id: &str, duration: u64, priority: i64) -> Task {
        let mut task = Task::new(id, 0, duration).unwrap().with_priority(priority);
        task.admit().unwrap();
        task
    }

    fn id(name: &str) -> TaskId {
        TaskId::new(name)
    }

    #[test]
    fn test_scheduler_creation() {
        let scheduler = Scheduler::new(Policy::Fifo);
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.quantum(), None);
        assert_eq!(scheduler.select_next(&Roster::default()), None);
    }

    #[test]
    fn test_enqueue_dequeue() {
        let mut scheduler = Scheduler::new(Policy::Fifo);
        scheduler.enqueue(id("T1")).unwrap();
        scheduler.enqueue(id("T2")).unwrap();
        assert_eq!(scheduler.len(), 2);

        scheduler.dequeue(&id("T1")).unwrap();
        let queued: Vec<_> = scheduler.queued().cloned().collect();
        assert_eq!(queued, vec![id("T2")]);
    }

    #[test]
    fn test_double_enqueue_is_an_error() {
        let mut scheduler = Scheduler::new(Policy::Srtf);
        scheduler.enqueue(id("T1")).unwrap();
        assert_eq!(
            scheduler.enqueue(id("T1")),
            Err(SchedulerError::AlreadyQueued(id("T1")))
        );
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_dequeue_absent_is_an_error() {
        let mut scheduler = Scheduler::new(Policy::Fifo);
        assert_eq!(
            scheduler.dequeue(&id("T9")),
            Err(SchedulerError::NotQueued(id("T9")))
        );
    }

    #[test]
    fn test_fifo_picks_first_enqueued() {
        let tasks = roster(vec![admitted("A", 9, 5), admitted("B", 1, 0)]);
        let mut scheduler = Scheduler::new(Policy::Fifo);
        scheduler.enqueue(id("A")).unwrap();
        scheduler.enqueue(id("B")).unwrap();
        assert_eq!(scheduler.select_next(&tasks), Some(id("A")));
    }

    #[test]
    fn test_srtf_picks_smallest_remaining() {
        let tasks = roster(vec![admitted("A", 9, 0), admitted("B", 2, 0), admitted("C", 4, 0)]);
        let mut scheduler = Scheduler::new(Policy::Srtf);
        for name in ["A", "B", "C"] {
            scheduler.enqueue(id(name)).unwrap();
        }
        assert_eq!(scheduler.select_next(&tasks), Some(id("B")));
    }

    #[test]
    fn test_priority_picks_lowest_value() {
        let tasks = roster(vec![admitted("A", 1, 3), admitted("B", 1, -1), admitted("C", 1, 0)]);
        let mut scheduler = Scheduler::new(Policy::Priority);
        for name in ["A", "B", "C"] {
            scheduler.enqueue(id(name)).unwrap();
        }
        assert_eq!(scheduler.select_next(&tasks), Some(id("B")));
    }

    #[test]
    fn test_ties_broken_by_enqueue_order() {
        let tasks = roster(vec![admitted("A", 3, 1), admitted("B", 3, 1)]);
        for policy in Policy::ALL {
            let mut scheduler = Scheduler::new(policy);
            scheduler.enqueue(id("B")).unwrap();
            scheduler.enqueue(id("A")).unwrap();
            assert_eq!(scheduler.select_next(&tasks), Some(id("B")), "{policy}");
        }
    }

    #[test]
    fn test_ineligible_tasks_are_skipped() {
        let fresh = Task::new("NEW", 0, 1).unwrap();
        let ready = admitted("READY", 5, 9);
        let tasks = roster(vec![fresh, ready]);

        for policy in Policy::ALL {
            let mut scheduler = Scheduler::new(policy);
            scheduler.enqueue(id("NEW")).unwrap();
            scheduler.enqueue(id("READY")).unwrap();
            let picked = scheduler.select_next(&tasks).unwrap();
            assert_eq!(picked, id("READY"));
            assert!(tasks.get(&picked).unwrap().state().is_eligible());
        }
    }

    #[test]
    fn test_select_next_does_not_mutate() {
        let tasks = roster(vec![admitted("A", 2, 0)]);
        let mut scheduler = Scheduler::new(Policy::Srtf);
        scheduler.enqueue(id("A")).unwrap();
        scheduler.select_next(&tasks);
        scheduler.select_next(&tasks);
        assert_eq!(tasks.get(&id("A")).unwrap().state(), TaskState::Ready);
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let tasks = roster(vec![admitted("A", 2, 0)]);
        let mut scheduler = Scheduler::new(Policy::Fifo);
        scheduler.enqueue(id("GHOST")).unwrap();
        scheduler.enqueue(id("A")).unwrap();
        assert_eq!(scheduler.select_next(&tasks), Some(id("A")));
    }

    #[test]
    fn test_policy_parsing_is_case_insensitive() {
        assert_eq!("fifo".parse::<Policy>(), Ok(Policy::Fifo));
        assert_eq!("FIFO".parse::<Policy>(), Ok(Policy::Fifo));
        assert_eq!(" Srtf ".parse::<Policy>(), Ok(Policy::Srtf));
        assert_eq!("priority".parse::<Policy>(), Ok(Policy::Priority));
    }

    #[test]
    fn test_factory_rejects_unknown_policy() {
        let err = SchedulerFactory::create("RR", Some(2)).unwrap_err();
        assert_eq!(
            err,
            SchedulerError::UnsupportedPolicy {
                name: "RR".to_string(),
                valid: "FIFO, SRTF, PRIORITY".to_string(),
            }
        );
    }

    #[test]
    fn test_factory_rejects_empty_name() {
        assert!(matches!(
            SchedulerFactory::create("", None),
            Err(SchedulerError::UnsupportedPolicy { .. })
        ));
        assert!(matches!(
            SchedulerFactory::create("   ", None),
            Err(SchedulerError::UnsupportedPolicy { .. })
        ));
    }

    #[test]
    fn test_factory_stores_quantum() {
        let scheduler = SchedulerFactory::create("srtf", Some(3)).unwrap();
        assert_eq!(scheduler.policy(), Policy::Srtf);
        assert_eq!(scheduler.quantum(), Some(3));
    }

    #[test]
    fn test_factory_rejects_zero_quantum() {
        assert_eq!(
            SchedulerFactory::create("FIFO", Some(0)).unwrap_err(),
            SchedulerError::InvalidQuantum(0)
        );
    }

    #[test]
    fn test_preemptiveness() {
        assert!(!Policy::Fifo.is_preemptive());
        assert!(Policy::Srtf.is_preemptive());
        assert!(Policy::Priority.is_preemptive());
    }
}
