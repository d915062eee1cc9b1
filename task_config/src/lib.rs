//! # Task Configuration
//!
//! Loads simulation setups from a line-based text format.
//!
//! ## Format
//!
//! ```text
//! # comment
//! ALGORITHM;QUANTUM
//! id;color;arrival;duration;priority;events
//! ```
//!
//! - `ALGORITHM`: `FIFO`, `SRTF` or `PRIORITY` (case-insensitive)
//! - `QUANTUM`: positive integer, defaults to 1
//! - `color`: `#RGB` or `#RRGGBB`, defaults to `#808080`
//! - `priority`: integer, defaults to 0 (lower is more urgent)
//! - `events`: `IO(time,duration)`, `ML(mutex,time)`, `MU(mutex,time)`
//!   separated by `;`
//!
//! ## Example
//!
//! ```
//! use task_config::SimulationConfig;
//!
//! let config = SimulationConfig::from_text("SRTF;1\nT1;#FF0000;0;5;1\nT2;#00FF00;2;3;1").unwrap();
//! assert_eq!(config.tasks.len(), 2);
//! ```
//!
//! ## Philosophy
//!
//! - **Report everything at once**: task line errors are collected and
//!   returned together, with line numbers.
//! - **Defaults are loud**: every defaulted field produces a warning.

pub mod config;
pub mod error;
mod parser;

pub use config::{ConfigSummary, ConfigWarning, SimulationConfig, TaskEntry};
pub use error::{ConfigError, LineError};
pub use parser::{DEFAULT_PRIORITY, DEFAULT_QUANTUM};
