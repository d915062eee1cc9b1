//! # Simulation Engine
//!
//! The [`Simulator`] ties the clock, the roster and the scheduler together.
//!
//! ## Tick
//!
//! Every call to [`Simulator::tick`] performs, in order:
//!
//! 1. Admission of tasks whose arrival equals the current tick
//! 2. Selection by the scheduler
//! 3. Preemption of the previous task if it lost the CPU
//! 4. Dispatch and one unit of execution of the selected task, with
//!    termination and removal from the scheduler on its last unit
//! 5. A history entry (`None` when idle)
//! 6. Clock advance, then observer notification
//!
//! Ticks are whole: drivers ([`Simulator::run`], [`Simulator::steps`],
//! [`Simulator::run_until_stopped`]) only check limits and stop requests
//! between ticks. A tick that fails leaves the simulator untouched.
//!
//! ## Reloading
//!
//! [`Simulator::load`] leaves the clock where it is, but the first tick or
//! driver call after a load rewinds the clock and the history to tick 0.
//! Drivers also stop early when no task can ever run again (every pending
//! task BLOCKED, nothing left to arrive).

use crate::clock::SimClock;
use crate::error::{EngineError, SchedulerError};
use crate::metrics::{MetricsSummary, SimulationReport, TaskMetrics, TaskReport};
use crate::observer::{StopHandle, TickObserver};
use crate::roster::Roster;
use crate::scheduler::Scheduler;
use crate::snapshot::{SimulationSnapshot, TaskSnapshot};
use crate::task::Task;
use crate::timeline::{execution_intervals, ExecutionInterval, HistoryEntry, TickRecord};
use core_types::{TaskId, TaskState, Tick};
use tracing::{debug, info, info_span, trace, warn};

/// Tick-driven CPU scheduling simulator
pub struct Simulator {
    clock: SimClock,
    scheduler: Scheduler,
    roster: Roster,
    history: Vec<HistoryEntry>,
    /// Task that executed last tick and has not finished
    running: Option<TaskId>,
    /// Set by `load`, cleared by the rewind before the next tick
    reloaded: bool,
    observer: Option<Box<dyn TickObserver>>,
}

impl Simulator {
    /// Creates a simulator with an empty roster
    pub fn new(scheduler: Scheduler) -> Self {
        Self {
            clock: SimClock::new(),
            scheduler,
            roster: Roster::default(),
            history: Vec::new(),
            running: None,
            reloaded: false,
            observer: None,
        }
    }

    /// Installs a per-tick observer, replacing any previous one
    pub fn set_observer(&mut self, observer: impl TickObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Removes the observer
    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Replaces the roster
    ///
    /// Every task is put back in state NEW with a fresh execution record,
    /// and entries of the replaced roster leave the contention set. The
    /// clock keeps its value until the next tick, which starts over from
    /// tick 0. On duplicate identifiers the previous roster is kept.
    pub fn load(&mut self, tasks: Vec<Task>) -> Result<(), EngineError> {
        let mut roster = Roster::new(tasks)?;
        for task in roster.iter_mut() {
            task.reset();
        }
        debug!(tasks = roster.len(), "roster loaded");
        self.roster = roster;
        self.scheduler.clear();
        self.running = None;
        self.reloaded = true;
        Ok(())
    }

    /// Restarts the simulation from tick 0 with the current roster
    pub fn reset(&mut self) {
        self.reloaded = false;
        self.clock.reset();
        self.scheduler.clear();
        self.history.clear();
        self.running = None;
        for task in self.roster.iter_mut() {
            task.reset();
        }
    }

    /// Moves every NEW task arriving now to READY and enqueues it
    ///
    /// Admission follows roster order. Returns the admitted identifiers.
    pub fn admit_arrivals(&mut self) -> Result<Vec<TaskId>, EngineError> {
        let now = self.clock.current();
        let arriving: Vec<TaskId> = self
            .roster
            .iter()
            .filter(|task| task.state() == TaskState::New && task.arrival() == now)
            .map(|task| task.id().clone())
            .collect();

        if let Some(queued) = arriving.iter().find(|id| self.scheduler.contains(id)) {
            return Err(SchedulerError::AlreadyQueued(queued.clone()).into());
        }

        for id in &arriving {
            self.task_mut(id)?.admit()?;
            self.scheduler.enqueue(id.clone())?;
            debug!(tick = now, task = %id, "task admitted");
        }

        Ok(arriving)
    }

    /// Simulates exactly one tick
    pub fn tick(&mut self) -> Result<TickRecord, EngineError> {
        self.rewind_if_reloaded();
        let now = self.clock.current();
        let admitted = self.admit_arrivals()?;
        let selected = self.scheduler.select_next(&self.roster);

        let mut preempted = None;
        if let Some(previous) = self.running.take() {
            if selected.as_ref() != Some(&previous) {
                let task = self.task_mut(&previous)?;
                if !task.is_terminated() {
                    task.preempt(now)?;
                    debug!(tick = now, task = %previous, by = ?selected, "task preempted");
                    preempted = Some(previous);
                }
            }
        }

        let mut completed = None;
        if let Some(id) = &selected {
            let finished = {
                let task = self.task_mut(id)?;
                if task.state() == TaskState::Ready {
                    task.dispatch(now)?;
                }
                task.execute(now)?
            };

            if finished {
                self.scheduler.dequeue(id)?;
                debug!(tick = now, task = %id, "task terminated");
                completed = Some(id.clone());
            } else {
                self.running = Some(id.clone());
            }
        }

        self.history.push(HistoryEntry::new(now, selected.clone()));
        self.clock.advance();

        let record = TickRecord {
            tick: now,
            admitted,
            preempted,
            selected,
            completed,
        };
        if let Some(observer) = self.observer.as_mut() {
            observer.on_tick(&record);
        }
        Ok(record)
    }

    /// Returns true while some task has not terminated
    pub fn has_pending(&self) -> bool {
        self.roster.iter().any(|task| !task.is_terminated())
    }

    /// Returns true while some task is in contention or still to arrive
    ///
    /// False when every pending task is BLOCKED: further ticks would only
    /// record idle time until [`Simulator::unblock`] is called.
    pub fn can_progress(&self) -> bool {
        let now = self.clock.current();
        self.roster.iter().any(|task| match task.state() {
            TaskState::New => self.reloaded || task.arrival() >= now,
            state => state.is_eligible(),
        })
    }

    /// Runs until every task terminated or the tick ceiling is reached
    ///
    /// `verbose` raises per-tick events from TRACE to DEBUG.
    pub fn run(
        &mut self,
        max_ticks: Option<Tick>,
        verbose: bool,
    ) -> Result<&[HistoryEntry], EngineError> {
        self.drive(max_ticks, verbose, None)?;
        Ok(&self.history)
    }

    /// Like [`Simulator::run`], but also stops when `stop` is raised
    ///
    /// A stop request is honored before the next tick starts, so history
    /// and task states always reflect whole ticks.
    pub fn run_until_stopped(
        &mut self,
        max_ticks: Option<Tick>,
        stop: &StopHandle,
    ) -> Result<&[HistoryEntry], EngineError> {
        self.drive(max_ticks, false, Some(stop))?;
        Ok(&self.history)
    }

    /// Suspendable run: yields control back after every tick
    pub fn steps(&mut self, max_ticks: Option<Tick>) -> Steps<'_> {
        self.rewind_if_reloaded();
        Steps {
            simulator: self,
            max_ticks,
            failed: false,
        }
    }

    /// Blocks the running task until [`Simulator::unblock`]
    ///
    /// The task leaves the contention set. Only the task currently holding
    /// the CPU can block.
    pub fn block(&mut self, id: &TaskId) -> Result<(), EngineError> {
        let now = self.clock.current();
        self.task_mut(id)?.block(now)?;
        self.scheduler.dequeue(id)?;
        if self.running.as_ref() == Some(id) {
            self.running = None;
        }
        debug!(tick = now, task = %id, "task blocked");
        Ok(())
    }

    /// Returns a blocked task to contention, at the back of the queue
    pub fn unblock(&mut self, id: &TaskId) -> Result<(), EngineError> {
        let now = self.clock.current();
        self.task_mut(id)?.unblock(now)?;
        self.scheduler.enqueue(id.clone())?;
        debug!(tick = now, task = %id, "task unblocked");
        Ok(())
    }

    /// Metrics of a terminated task
    pub fn metrics(&self, id: &TaskId) -> Result<TaskMetrics, EngineError> {
        let task = self
            .roster
            .get(id)
            .ok_or_else(|| EngineError::UnknownTask(id.clone()))?;
        Ok(task.metrics()?)
    }

    /// Execution intervals for Gantt-style rendering
    pub fn intervals(&self) -> Vec<ExecutionInterval> {
        execution_intervals(&self.history)
    }

    /// Read-only view of the state between ticks
    pub fn snapshot(&self) -> SimulationSnapshot {
        let ready = self
            .scheduler
            .queued()
            .filter(|id| {
                self.roster
                    .get(id)
                    .is_some_and(|task| task.state() == TaskState::Ready)
            })
            .cloned()
            .collect();

        SimulationSnapshot {
            tick: self.clock.current(),
            running: self.running.clone(),
            ready,
            tasks: self.roster.iter().map(TaskSnapshot::from).collect(),
        }
    }

    /// Run report with per-task metrics and averages
    pub fn report(&self) -> SimulationReport {
        let tasks: Vec<TaskReport> = self.roster.iter().map(TaskReport::from).collect();
        let summary = MetricsSummary::from_metrics(tasks.iter().filter_map(|t| t.metrics.as_ref()));

        SimulationReport {
            policy: self.scheduler.policy(),
            quantum: self.scheduler.quantum(),
            ticks: self.clock.current(),
            history: self.history.clone(),
            tasks,
            summary,
        }
    }

    pub fn current_tick(&self) -> Tick {
        self.clock.current()
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.roster.get(id)
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Task holding the CPU since the last tick
    pub fn running(&self) -> Option<&TaskId> {
        self.running.as_ref()
    }

    fn task_mut(&mut self, id: &TaskId) -> Result<&mut Task, EngineError> {
        self.roster
            .get_mut(id)
            .ok_or_else(|| EngineError::UnknownTask(id.clone()))
    }

    /// Starts a freshly loaded roster over from tick 0
    fn rewind_if_reloaded(&mut self) {
        if !self.reloaded {
            return;
        }
        self.reloaded = false;
        if self.clock.current() > 0 || !self.history.is_empty() {
            debug!(from = self.clock.current(), "clock rewound for reloaded roster");
            self.clock.reset();
            self.history.clear();
        }
    }

    fn within_limit(&self, max_ticks: Option<Tick>) -> bool {
        max_ticks.map_or(true, |limit| self.clock.current() < limit)
    }

    fn drive(
        &mut self,
        max_ticks: Option<Tick>,
        verbose: bool,
        stop: Option<&StopHandle>,
    ) -> Result<(), EngineError> {
        self.rewind_if_reloaded();
        let span = info_span!(
            "run",
            policy = %self.scheduler.policy(),
            tasks = self.roster.len(),
            max_ticks = ?max_ticks,
        );
        let _enter = span.enter();

        while self.has_pending() && self.can_progress() && self.within_limit(max_ticks) {
            if stop.is_some_and(StopHandle::is_stopped) {
                info!(tick = self.clock.current(), "run stopped on request");
                return Ok(());
            }

            let record = self.tick()?;
            if verbose {
                debug!(tick = record.tick, task = ?record.selected, "tick");
            } else {
                trace!(tick = record.tick, task = ?record.selected, "tick");
            }
        }

        if self.has_pending() && !self.can_progress() {
            warn!(tick = self.clock.current(), "every pending task is blocked");
        } else if self.has_pending() {
            info!(tick = self.clock.current(), "tick ceiling reached with pending tasks");
        } else {
            info!(tick = self.clock.current(), "all tasks terminated");
        }
        Ok(())
    }
}

/// Iterator over single ticks, see [`Simulator::steps`]
///
/// Between two calls to `next`, [`Steps::simulator`] gives read access to
/// the engine. After an error the iterator is exhausted.
pub struct Steps<'a> {
    simulator: &'a mut Simulator,
    max_ticks: Option<Tick>,
    failed: bool,
}

impl Steps<'_> {
    pub fn simulator(&self) -> &Simulator {
        self.simulator
    }
}

impl Iterator for Steps<'_> {
    type Item = Result<TickRecord, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed
            || !self.simulator.has_pending()
            || !self.simulator.can_progress()
            || !self.simulator.within_limit(self.max_ticks)
        {
            return None;
        }
        let result = self.simulator.tick();
        self.failed = result.is_err();
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{Policy, SchedulerFactory};
    use crate::test_utils::{history_ids, simulator_for};
    use std::sync::{Arc, Mutex};

    fn id(name: &str) -> TaskId {
        TaskId::new(name)
    }

    #[test]
    fn test_fifo_runs_to_completion_in_order() {
        let mut sim = simulator_for("FIFO", &[("T1", 0, 5, 0), ("T2", 2, 3, 0)]).unwrap();
        let history = sim.run(None, false).unwrap();
        assert_eq!(
            history_ids(history),
            vec![
                Some("T1"),
                Some("T1"),
                Some("T1"),
                Some("T1"),
                Some("T1"),
                Some("T2"),
                Some("T2"),
                Some("T2")
            ]
        );

        let t1 = sim.metrics(&id("T1")).unwrap();
        assert_eq!((t1.turnaround, t1.waiting), (5, 0));
        let t2 = sim.metrics(&id("T2")).unwrap();
        assert_eq!((t2.turnaround, t2.waiting), (6, 3));
    }

    #[test]
    fn test_srtf_preempts_longer_task() {
        let mut sim = simulator_for("SRTF", &[("T1", 0, 8, 0), ("T2", 1, 4, 0)]).unwrap();

        sim.tick().unwrap();
        let record = sim.tick().unwrap();
        assert_eq!(record.preempted, Some(id("T1")));
        assert_eq!(record.selected, Some(id("T2")));
        assert_eq!(sim.task(&id("T1")).unwrap().state(), TaskState::Ready);
        assert_eq!(sim.task(&id("T1")).unwrap().preemptions(), 1);

        sim.run(None, false).unwrap();
        let ids = history_ids(sim.history());
        assert_eq!(&ids[1..5], &[Some("T2"); 4]);
        assert_eq!(ids[5], Some("T1"));
        assert_eq!(ids.len(), 12);
    }

    #[test]
    fn test_priority_picks_urgent_task_first() {
        let mut sim = simulator_for("PRIORITY", &[("T1", 0, 5, 1), ("T2", 0, 3, 0)]).unwrap();
        sim.run(None, false).unwrap();
        let ids = history_ids(sim.history());
        assert_eq!(&ids[..3], &[Some("T2"); 3]);
        assert_eq!(&ids[3..], &[Some("T1"); 5]);
    }

    #[test]
    fn test_idle_ticks_are_recorded() {
        let mut sim = simulator_for("FIFO", &[("T1", 3, 2, 0)]).unwrap();
        sim.run(None, false).unwrap();
        assert_eq!(
            history_ids(sim.history()),
            vec![None, None, None, Some("T1"), Some("T1")]
        );
        assert_eq!(sim.metrics(&id("T1")).unwrap().response, 0);
    }

    #[test]
    fn test_max_ticks_stops_deterministically() {
        let mut sim = simulator_for("FIFO", &[("T1", 0, 10, 0)]).unwrap();
        let history = sim.run(Some(4), false).unwrap();
        assert_eq!(history.len(), 4);
        assert!(sim.has_pending());
        assert_eq!(sim.task(&id("T1")).unwrap().remaining(), 6);
    }

    #[test]
    fn test_run_resumes_after_ceiling() {
        let mut sim = simulator_for("FIFO", &[("T1", 0, 3, 0)]).unwrap();
        sim.run(Some(1), false).unwrap();
        sim.run(None, false).unwrap();
        assert_eq!(sim.history().len(), 3);
        assert!(!sim.has_pending());
    }

    #[test]
    fn test_load_rejects_duplicates_and_keeps_roster() {
        let mut sim = simulator_for("FIFO", &[("T1", 0, 1, 0)]).unwrap();
        let result = sim.load(vec![
            Task::new("A", 0, 1).unwrap(),
            Task::new("A", 1, 1).unwrap(),
        ]);
        assert_eq!(result, Err(EngineError::DuplicateTaskId(id("A"))));
        assert!(sim.task(&id("T1")).is_some());
    }

    #[test]
    fn test_load_forces_new_state() {
        let mut sim = simulator_for("FIFO", &[("T1", 0, 1, 0)]).unwrap();
        sim.run(None, false).unwrap();
        let finished = sim.task(&id("T1")).unwrap().clone();
        assert!(finished.is_terminated());

        sim.load(vec![finished]).unwrap();
        let task = sim.task(&id("T1")).unwrap();
        assert_eq!(task.state(), TaskState::New);
        assert_eq!(task.remaining(), 1);
        assert_eq!(sim.current_tick(), 1);
    }

    #[test]
    fn test_reload_after_run_starts_over() {
        let mut sim = simulator_for("FIFO", &[("T1", 0, 2, 0)]).unwrap();
        sim.run(None, false).unwrap();

        sim.load(vec![Task::new("T1", 0, 2).unwrap()]).unwrap();
        let history = sim.run(None, false).unwrap();
        assert_eq!(history_ids(history), vec![Some("T1"), Some("T1")]);
        assert!(!sim.has_pending());
        assert_eq!(sim.current_tick(), 2);
        assert_eq!(sim.metrics(&id("T1")).unwrap().turnaround, 2);
    }

    #[test]
    fn test_reload_after_ceiling_ticks_cleanly() {
        let mut sim = simulator_for("FIFO", &[("T1", 0, 5, 0)]).unwrap();
        sim.run(Some(2), false).unwrap();

        sim.load(vec![Task::new("T1", 2, 5).unwrap()]).unwrap();
        assert!(!sim.scheduler().contains(&id("T1")));

        let record = sim.tick().unwrap();
        assert_eq!(record.tick, 0);
        assert_eq!(record.selected, None);
        assert_eq!(sim.history().len(), 1);
        assert_eq!(sim.task(&id("T1")).unwrap().state(), TaskState::New);

        sim.run(None, false).unwrap();
        assert_eq!(sim.history().len(), 7);
        assert_eq!(sim.task(&id("T1")).unwrap().start_time(), Some(2));
    }

    #[test]
    fn test_reload_rewinds_before_ceiling_check() {
        let mut sim = simulator_for("FIFO", &[("T1", 0, 3, 0)]).unwrap();
        sim.run(Some(3), false).unwrap();
        sim.load(vec![Task::new("T1", 0, 3).unwrap()]).unwrap();
        assert_eq!(sim.steps(Some(3)).count(), 3);
        assert!(!sim.has_pending());
    }

    #[test]
    fn test_failed_admission_leaves_task_untouched() {
        let mut scheduler = SchedulerFactory::create("FIFO", None).unwrap();
        scheduler.enqueue(id("T1")).unwrap();
        let mut sim = Simulator::new(scheduler);
        sim.roster = Roster::new(vec![Task::new("T1", 0, 1).unwrap()]).unwrap();

        assert_eq!(
            sim.tick(),
            Err(EngineError::Scheduler(SchedulerError::AlreadyQueued(id("T1"))))
        );
        assert_eq!(sim.task(&id("T1")).unwrap().state(), TaskState::New);
        assert!(sim.history().is_empty());
        assert_eq!(sim.current_tick(), 0);
    }

    #[test]
    fn test_run_stops_when_every_task_blocked() {
        let mut sim = simulator_for("FIFO", &[("T1", 0, 3, 0), ("T2", 5, 1, 0)]).unwrap();
        sim.tick().unwrap();
        sim.block(&id("T1")).unwrap();

        sim.run(None, false).unwrap();
        assert_eq!(
            history_ids(sim.history()),
            vec![Some("T1"), None, None, None, None, Some("T2")]
        );
        assert!(sim.has_pending());
        assert!(!sim.can_progress());
        assert_eq!(sim.steps(None).count(), 0);

        sim.unblock(&id("T1")).unwrap();
        assert!(sim.can_progress());
        sim.run(None, false).unwrap();
        assert!(!sim.has_pending());
        assert_eq!(sim.history().len(), 8);
    }

    #[test]
    fn test_reset_replays_identically() {
        let mut sim = simulator_for("SRTF", &[("T1", 0, 4, 0), ("T2", 1, 1, 0)]).unwrap();
        let first = sim.run(None, false).unwrap().to_vec();
        sim.reset();
        assert_eq!(sim.current_tick(), 0);
        let second = sim.run(None, false).unwrap().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn test_admission_follows_roster_order() {
        let mut sim = simulator_for("FIFO", &[("B", 0, 1, 0), ("A", 0, 1, 0)]).unwrap();
        let record = sim.tick().unwrap();
        assert_eq!(record.admitted, vec![id("B"), id("A")]);
        assert_eq!(record.selected, Some(id("B")));
    }

    #[test]
    fn test_completion_removes_from_scheduler() {
        let mut sim = simulator_for("FIFO", &[("T1", 0, 1, 0)]).unwrap();
        let record = sim.tick().unwrap();
        assert_eq!(record.completed, Some(id("T1")));
        assert!(!sim.scheduler().contains(&id("T1")));
        assert_eq!(sim.running(), None);
        assert_eq!(sim.task(&id("T1")).unwrap().finish_time(), Some(1));
    }

    #[test]
    fn test_metrics_before_termination_fail() {
        let mut sim = simulator_for("FIFO", &[("T1", 0, 3, 0)]).unwrap();
        sim.tick().unwrap();
        assert!(matches!(
            sim.metrics(&id("T1")),
            Err(EngineError::Task(crate::error::TaskError::Incomplete { .. }))
        ));
        assert_eq!(
            sim.metrics(&id("NOPE")),
            Err(EngineError::UnknownTask(id("NOPE")))
        );
    }

    #[test]
    fn test_snapshot_is_stable_between_ticks() {
        let mut sim = simulator_for("SRTF", &[("T1", 0, 3, 0), ("T2", 0, 5, 0)]).unwrap();
        sim.tick().unwrap();
        let first = sim.snapshot();
        let second = sim.snapshot();
        assert_eq!(first, second);
        assert_eq!(first.tick, 1);
        assert_eq!(first.running, Some(id("T1")));
        assert_eq!(first.ready, vec![id("T2")]);
        assert_eq!(first.task(&id("T1")).unwrap().remaining, 2);
    }

    #[test]
    fn test_steps_yield_one_tick_at_a_time() {
        let mut sim = simulator_for("FIFO", &[("T1", 1, 2, 0)]).unwrap();
        let mut steps = sim.steps(None);
        let mut ticks = Vec::new();
        while let Some(record) = steps.next() {
            let record = record.unwrap();
            assert_eq!(steps.simulator().current_tick(), record.tick + 1);
            ticks.push(record.tick);
        }
        assert_eq!(ticks, vec![0, 1, 2]);
        assert!(!sim.has_pending());
    }

    #[test]
    fn test_steps_respect_ceiling() {
        let mut sim = simulator_for("FIFO", &[("T1", 0, 9, 0)]).unwrap();
        assert_eq!(sim.steps(Some(3)).count(), 3);
    }

    #[test]
    fn test_observer_sees_every_tick() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut sim = simulator_for("FIFO", &[("T1", 1, 1, 0)]).unwrap();
        sim.set_observer(move |record: &TickRecord| {
            sink.lock().unwrap().push(record.entry());
        });
        sim.run(None, false).unwrap();
        assert_eq!(*seen.lock().unwrap(), sim.history().to_vec());
    }

    #[test]
    fn test_stop_request_leaves_whole_ticks() {
        let stop = StopHandle::new();
        let trigger = stop.clone();
        let mut sim = simulator_for("FIFO", &[("T1", 0, 10, 0)]).unwrap();
        sim.set_observer(move |record: &TickRecord| {
            if record.tick == 2 {
                trigger.stop();
            }
        });

        let history = sim.run_until_stopped(None, &stop).unwrap();
        assert_eq!(history.len(), 3);
        let task = sim.task(&id("T1")).unwrap();
        assert_eq!(task.elapsed(), 3);
        assert_eq!(sim.current_tick(), 3);
    }

    #[test]
    fn test_block_and_unblock_running_task() {
        let mut sim = simulator_for("FIFO", &[("T1", 0, 3, 0), ("T2", 0, 2, 0)]).unwrap();
        sim.tick().unwrap();
        sim.block(&id("T1")).unwrap();
        assert_eq!(sim.task(&id("T1")).unwrap().state(), TaskState::Blocked);
        assert_eq!(sim.running(), None);

        let record = sim.tick().unwrap();
        assert_eq!(record.selected, Some(id("T2")));
        assert_eq!(record.preempted, None);

        sim.unblock(&id("T1")).unwrap();
        sim.run(None, false).unwrap();
        assert_eq!(
            history_ids(sim.history()),
            vec![Some("T1"), Some("T2"), Some("T2"), Some("T1"), Some("T1")]
        );
    }

    #[test]
    fn test_block_requires_running_task() {
        let mut sim = simulator_for("FIFO", &[("T1", 5, 3, 0)]).unwrap();
        assert!(matches!(
            sim.block(&id("T1")),
            Err(EngineError::Task(crate::error::TaskError::InvalidTransition { .. }))
        ));
    }

    #[test]
    fn test_report_contents() {
        let mut sim = simulator_for("FIFO", &[("T1", 0, 2, 0), ("T2", 10, 1, 0)]).unwrap();
        sim.run(Some(3), false).unwrap();
        let report = sim.report();
        assert_eq!(report.policy, Policy::Fifo);
        assert_eq!(report.ticks, 3);
        assert_eq!(report.idle_ticks(), 1);
        assert!(report.tasks[0].metrics.is_some());
        assert!(report.tasks[1].metrics.is_none());
        assert_eq!(report.summary.unwrap().finished, 1);
    }

    #[test]
    fn test_intervals_from_history() {
        let mut sim = simulator_for("SRTF", &[("T1", 0, 3, 0), ("T2", 1, 1, 0)]).unwrap();
        sim.run(None, false).unwrap();
        let intervals = sim.intervals();
        let spans: Vec<_> = intervals
            .iter()
            .map(|i| (i.task.as_str(), i.start, i.end))
            .collect();
        assert_eq!(spans, vec![("T1", 0, 1), ("T2", 1, 2), ("T1", 2, 4)]);
    }

    #[test]
    fn test_report_serializes() {
        let mut sim = simulator_for("SRTF", &[("T1", 0, 1, 0)]).unwrap();
        sim.run(None, false).unwrap();
        let json = serde_json::to_value(sim.report()).unwrap();
        assert_eq!(json["policy"], "SRTF");
        assert_eq!(json["history"][0]["task"], "T1");
        assert_eq!(json["tasks"][0]["state"], "TERMINATED");
        assert_eq!(json["tasks"][0]["metrics"]["turnaround"], 1);
    }

    #[test]
    fn test_empty_roster_has_nothing_pending() {
        let mut sim = Simulator::new(SchedulerFactory::create("FIFO", None).unwrap());
        assert!(!sim.has_pending());
        assert!(sim.run(None, false).unwrap().is_empty());
    }
}
