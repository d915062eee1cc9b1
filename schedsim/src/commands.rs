//! # Step Commands
//!
//! The command surface of step mode, read one line at a time.
//!
//! ## Command Set
//!
//! - `step [n]`, `s [n]` or an empty line: simulate `n` ticks (default 1)
//! - `run`: simulate until every task terminated
//! - `status`: clock, running task and ready set
//! - `ready`: ready set in queue order
//! - `tasks`: every task with its state
//! - `task <id>`: detail of one task
//! - `help`: this list
//! - `quit`: stop and print the report
//!
//! ## Philosophy
//!
//! - Commands only inspect or advance the simulation
//! - A bad command never ends the session

use core_types::TaskId;
use thiserror::Error;

/// Step command error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StepCommandError {
    #[error("Invalid tick count: {0}")]
    InvalidCount(String),

    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("Unknown command: {0} (type 'help' for the list)")]
    UnknownCommand(String),
}

/// Step mode commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepCommand {
    /// Simulate this many ticks
    Step(u64),
    /// Simulate to completion
    Run,
    Status,
    Ready,
    Tasks,
    Task(TaskId),
    Help,
    Quit,
}

/// Step command parser
pub struct StepCommandParser;

impl StepCommandParser {
    /// Parses one input line
    pub fn parse(input: &str) -> Result<StepCommand, StepCommandError> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let Some(first) = parts.first() else {
            return Ok(StepCommand::Step(1));
        };
        let cmd = first.to_lowercase();
        let args = &parts[1..];

        match cmd.as_str() {
            "step" | "s" | "next" => Self::parse_step(args),
            "run" | "r" | "continue" => Self::no_args(StepCommand::Run, args),
            "status" => Self::no_args(StepCommand::Status, args),
            "ready" => Self::no_args(StepCommand::Ready, args),
            "tasks" | "list" => Self::no_args(StepCommand::Tasks, args),
            "task" => Self::parse_task(args),
            "help" | "h" | "?" => Self::no_args(StepCommand::Help, args),
            "quit" | "q" | "exit" => Self::no_args(StepCommand::Quit, args),
            _ => Err(StepCommandError::UnknownCommand(cmd)),
        }
    }

    fn parse_step(args: &[&str]) -> Result<StepCommand, StepCommandError> {
        match args {
            [] => Ok(StepCommand::Step(1)),
            [count] => match count.parse::<u64>() {
                Ok(n) if n > 0 => Ok(StepCommand::Step(n)),
                _ => Err(StepCommandError::InvalidCount(count.to_string())),
            },
            [_, extra, ..] => Err(StepCommandError::UnexpectedArgument(extra.to_string())),
        }
    }

    fn parse_task(args: &[&str]) -> Result<StepCommand, StepCommandError> {
        match args {
            [] => Err(StepCommandError::MissingArgument("task ID".to_string())),
            [id] => Ok(StepCommand::Task(TaskId::new(*id))),
            [_, extra, ..] => Err(StepCommandError::UnexpectedArgument(extra.to_string())),
        }
    }

    fn no_args(command: StepCommand, args: &[&str]) -> Result<StepCommand, StepCommandError> {
        match args.first() {
            None => Ok(command),
            Some(extra) => Err(StepCommandError::UnexpectedArgument(extra.to_string())),
        }
    }

    /// Help text listing every command
    pub fn help() -> &'static str {
        "Commands:\n\
         \x20 step [n], s [n], <enter>  Simulate n ticks (default 1)\n\
         \x20 run                       Simulate until all tasks finish\n\
         \x20 status                    Show clock, running task and ready set\n\
         \x20 ready                     Show the ready set\n\
         \x20 tasks                     List every task\n\
         \x20 task <id>                 Show one task\n\
         \x20 help                      Show this help\n\
         \x20 quit                      Stop and print the report\n"
    }
}
