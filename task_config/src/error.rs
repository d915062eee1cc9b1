//! Configuration errors

use core_types::TaskId;
use sim_kernel::{EngineError, SchedulerError, TaskError};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Problem found on one line of a configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    /// 1-based line number in the source text
    pub line: usize,
    pub message: String,
}

impl LineError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration contains no valid lines")]
    Empty,

    #[error("Invalid header at {0}")]
    Header(LineError),

    #[error("Errors found while parsing tasks:{}", format_lines(.0))]
    Tasks(Vec<LineError>),

    #[error("No valid task found in configuration")]
    NoTasks,

    #[error("Duplicate task ID: {0}")]
    DuplicateTask(TaskId),

    #[error(transparent)]
    Task(#[from] TaskError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

fn format_lines(errors: &[LineError]) -> String {
    errors.iter().map(|e| format!("\n  - {e}")).collect()
}
