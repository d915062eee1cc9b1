//! # schedsim Host
//!
//! Command-line host for the scheduling simulator.
//!
//! ## Philosophy
//!
//! - **Host owns I/O**: the engine never prints
//! - **Output is report rendering**: text tables, a Gantt chart or JSON
//! - **Deterministic mode is first-class**: every session can be replayed
//!   from a configuration and a command script
//!
//! ## Responsibilities
//!
//! The host:
//! - Loads a task configuration and builds the simulator
//! - Runs to completion, or step by step under user commands
//! - Prints metrics and a Gantt chart, optionally writes SVG
//!
//! ## Non-Responsibilities
//!
//! The host does NOT:
//! - Make scheduling decisions
//! - Emit ANSI escape codes

pub mod commands;
pub mod report;
pub mod runtime;

pub use commands::{StepCommand, StepCommandError, StepCommandParser};
pub use runtime::{HostMode, HostRuntime, HostRuntimeConfig, HostRuntimeError};
