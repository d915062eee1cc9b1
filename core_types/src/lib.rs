//! # Core Types
//!
//! The shared vocabulary of the scheduling simulator.
//!
//! ## Philosophy
//!
//! - **One name per concept**: every crate talks about tasks, ticks and
//!   states through these types.
//! - **Type safety first**: task identifiers cannot be confused with colors
//!   or other free-form strings.
//!
//! ## Key Types
//!
//! - [`TaskId`]: Stable identifier for a simulated task
//! - [`TaskState`]: Lifecycle state of a task
//! - [`Tick`]: One discrete unit of simulated time
//! - [`Priority`]: Task priority (lower value = more urgent)

pub mod ids;
pub mod state;

pub use ids::TaskId;
pub use state::TaskState;

/// One discrete unit of simulated time.
pub type Tick = u64;

/// Task priority. Lower numeric values are more urgent.
pub type Priority = i64;
