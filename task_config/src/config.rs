//! Parsed configuration and its conversions

use crate::error::ConfigError;
use crate::parser;
use core_types::{Priority, TaskId, Tick};
use serde::{Deserialize, Serialize};
use sim_kernel::{Policy, Scheduler, SchedulerFactory, Simulator, Task, TaskError, TaskEvent};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Non-fatal finding, e.g. a defaulted field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// One task line after validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEntry {
    /// Source line, 1-based
    pub line: usize,
    pub id: TaskId,
    pub color: String,
    pub arrival: Tick,
    pub duration: Tick,
    pub priority: Priority,
    pub events: Vec<TaskEvent>,
}

impl TaskEntry {
    /// Builds the engine task
    pub fn to_task(&self) -> Result<Task, TaskError> {
        let mut task = Task::new(self.id.clone(), self.arrival, self.duration)?
            .with_priority(self.priority)
            .with_color(self.color.clone())
            .with_events(self.events.clone());
        task.annotate("line", self.line.to_string());
        Ok(task)
    }
}

/// A loaded simulation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub algorithm: Policy,
    pub quantum: u64,
    /// Tasks in file order
    pub tasks: Vec<TaskEntry>,
    pub warnings: Vec<ConfigWarning>,
}

impl SimulationConfig {
    /// Parses configuration text
    pub fn from_text(text: &str) -> Result<Self, ConfigError> {
        parser::parse(text)
    }

    /// Reads and parses a configuration file
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_text(&text)
    }

    /// Builds the scheduler for the configured algorithm and quantum
    pub fn build_scheduler(&self) -> Result<Scheduler, ConfigError> {
        Ok(SchedulerFactory::create(
            self.algorithm.name(),
            Some(self.quantum),
        )?)
    }

    /// Engine tasks, in file order
    pub fn to_tasks(&self) -> Result<Vec<Task>, ConfigError> {
        self.tasks
            .iter()
            .map(|entry| entry.to_task().map_err(ConfigError::from))
            .collect()
    }

    pub fn into_tasks(self) -> Result<Vec<Task>, ConfigError> {
        self.to_tasks()
    }

    /// Simulator with the configured scheduler and every task loaded
    pub fn build_simulator(&self) -> Result<Simulator, ConfigError> {
        let mut simulator = Simulator::new(self.build_scheduler()?);
        simulator.load(self.to_tasks()?)?;
        Ok(simulator)
    }

    pub fn summary(&self) -> ConfigSummary {
        let mut priorities = BTreeMap::new();
        for entry in &self.tasks {
            *priorities.entry(entry.priority).or_insert(0) += 1;
        }

        ConfigSummary {
            algorithm: self.algorithm,
            quantum: self.quantum,
            task_count: self.tasks.len(),
            total_duration: self.tasks.iter().map(|t| t.duration).sum(),
            min_arrival: self.tasks.iter().map(|t| t.arrival).min(),
            max_arrival: self.tasks.iter().map(|t| t.arrival).max(),
            priorities,
            task_ids: self.tasks.iter().map(|t| t.id.clone()).collect(),
            warnings: self.warnings.len(),
        }
    }
}

impl FromStr for SimulationConfig {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::from_text(text)
    }
}

/// Overview of a configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub algorithm: Policy,
    pub quantum: u64,
    pub task_count: usize,
    /// Sum of all task durations, a lower bound on the run length
    pub total_duration: Tick,
    pub min_arrival: Option<Tick>,
    pub max_arrival: Option<Tick>,
    /// Number of tasks per priority value
    pub priorities: BTreeMap<Priority, usize>,
    pub task_ids: Vec<TaskId>,
    pub warnings: usize,
}

impl fmt::Display for ConfigSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Algorithm: {} (quantum {})", self.algorithm, self.quantum)?;
        writeln!(
            f,
            "Tasks: {} (total duration {})",
            self.task_count, self.total_duration
        )?;
        if let (Some(min), Some(max)) = (self.min_arrival, self.max_arrival) {
            writeln!(f, "Arrivals: {min}..={max}")?;
        }
        let priorities: Vec<String> = self
            .priorities
            .iter()
            .map(|(priority, count)| format!("{priority}: {count}"))
            .collect();
        write!(f, "Priorities: {}", priorities.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::TaskState;

    const SAMPLE: &str = "PRIORITY;2\nT1;#FF0000;0;5;2;IO(1,1)\nT2;#00FF00;3;2;0\nT3;;1;4;2\n";

    #[test]
    fn test_into_tasks_keeps_order_and_fields() {
        let config: SimulationConfig = SAMPLE.parse().unwrap();
        let tasks = config.into_tasks().unwrap();

        let ids: Vec<&str> = tasks.iter().map(|t| t.id().as_str()).collect();
        assert_eq!(ids, vec!["T1", "T2", "T3"]);
        assert_eq!(tasks[0].color(), "#FF0000");
        assert_eq!(tasks[0].events().len(), 1);
        assert_eq!(tasks[0].context().get("line").map(String::as_str), Some("2"));
        assert_eq!(tasks[1].arrival(), 3);
        assert_eq!(tasks[2].priority(), 2);
        assert!(tasks.iter().all(|t| t.state() == TaskState::New));
    }

    #[test]
    fn test_build_scheduler() {
        let config = SimulationConfig::from_text(SAMPLE).unwrap();
        let scheduler = config.build_scheduler().unwrap();
        assert_eq!(scheduler.policy(), Policy::Priority);
        assert_eq!(scheduler.quantum(), Some(2));
    }

    #[test]
    fn test_build_simulator_loads_tasks() {
        let simulator = SimulationConfig::from_text(SAMPLE)
            .unwrap()
            .build_simulator()
            .unwrap();
        assert_eq!(simulator.roster().len(), 3);
        assert_eq!(simulator.scheduler().policy(), Policy::Priority);
        assert_eq!(simulator.current_tick(), 0);
    }

    #[test]
    fn test_summary() {
        let summary = SimulationConfig::from_text(SAMPLE).unwrap().summary();
        assert_eq!(summary.task_count, 3);
        assert_eq!(summary.total_duration, 11);
        assert_eq!(summary.min_arrival, Some(0));
        assert_eq!(summary.max_arrival, Some(3));
        assert_eq!(summary.priorities.get(&2), Some(&2));
        assert_eq!(summary.priorities.get(&0), Some(&1));
        assert_eq!(summary.warnings, 0);
    }

    #[test]
    fn test_summary_display() {
        let text = SimulationConfig::from_text(SAMPLE).unwrap().summary().to_string();
        assert!(text.starts_with("Algorithm: PRIORITY (quantum 2)"));
        assert!(text.contains("Arrivals: 0..=3"));
        assert!(text.ends_with("Priorities: 0: 1, 2: 2"));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fifo.txt");
        std::fs::write(&path, "FIFO;1\nT1;#fff;0;2;0\n").unwrap();

        let config = SimulationConfig::load_file(&path).unwrap();
        assert_eq!(config.algorithm, Policy::Fifo);
        assert_eq!(config.tasks.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        match SimulationConfig::load_file(&path) {
            Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
