//! # Host Runtime
//!
//! Drives one simulation from a configuration file to a printed report.

use crate::commands::{StepCommand, StepCommandParser};
use crate::report;
use core_types::Tick;
use gantt_render::{GanttChart, RenderError};
use sim_kernel::{EngineError, Simulator};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use task_config::{ConfigError, SimulationConfig};
use thiserror::Error;
use tracing::{debug, info};

/// Host runtime error types
#[derive(Debug, Error)]
pub enum HostRuntimeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Simulation error: {0}")]
    Engine(#[from] EngineError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Host mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostMode {
    /// Run to completion, then report
    #[default]
    Full,
    /// Interactive, commands between ticks
    Step,
}

/// Host runtime configuration
#[derive(Debug, Clone, Default)]
pub struct HostRuntimeConfig {
    /// Task configuration file
    pub config_path: PathBuf,
    pub mode: HostMode,
    /// Tick ceiling (None = run until every task finished)
    pub max_ticks: Option<Tick>,
    /// Where to write the SVG Gantt chart
    pub svg: Option<PathBuf>,
    /// Emit the report as JSON instead of text
    pub json: bool,
    /// Per-tick debug logging
    pub verbose: bool,
}

/// Host runtime
pub struct HostRuntime {
    config: HostRuntimeConfig,
    simulator: Simulator,
    warnings: Vec<String>,
}

impl HostRuntime {
    /// Loads the configuration file and prepares the simulator
    pub fn new(config: HostRuntimeConfig) -> Result<Self, HostRuntimeError> {
        let sim_config = SimulationConfig::load_file(&config.config_path)?;
        Self::with_simulation(config, sim_config)
    }

    /// Prepares the simulator from an already parsed configuration
    pub fn with_simulation(
        config: HostRuntimeConfig,
        sim_config: SimulationConfig,
    ) -> Result<Self, HostRuntimeError> {
        let warnings = sim_config.warnings.iter().map(ToString::to_string).collect();
        let simulator = sim_config.build_simulator()?;

        info!(
            policy = %simulator.scheduler().policy(),
            tasks = simulator.roster().len(),
            mode = ?config.mode,
            "host runtime ready"
        );

        Ok(Self {
            config,
            simulator,
            warnings,
        })
    }

    /// Runs the configured mode, then prints the report
    ///
    /// `input` is only read in step mode. With `json` set, `out` receives
    /// the JSON report alone and the step transcript goes to stderr.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        out: &mut W,
    ) -> Result<(), HostRuntimeError> {
        if !self.config.json {
            self.print_header(out)?;
        }

        match self.config.mode {
            HostMode::Full => {
                self.simulator
                    .run(self.config.max_ticks, self.config.verbose)?;
            }
            HostMode::Step if self.config.json => {
                let mut console = io::stderr().lock();
                self.run_interactive(input, &mut console)?;
            }
            HostMode::Step => self.run_interactive(input, out)?,
        }

        self.finish(out)
    }

    fn print_header<W: Write>(&self, out: &mut W) -> Result<(), HostRuntimeError> {
        if !self.warnings.is_empty() {
            writeln!(out, "Configuration warnings:")?;
            for warning in &self.warnings {
                writeln!(out, "  - {warning}")?;
            }
        }
        let scheduler = self.simulator.scheduler();
        writeln!(
            out,
            "Loaded {} tasks, policy {}",
            self.simulator.roster().len(),
            scheduler.policy()
        )?;
        Ok(())
    }

    fn run_interactive<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        out: &mut W,
    ) -> Result<(), HostRuntimeError> {
        writeln!(out, "Step mode. Type 'help' for commands.")?;

        while !self.is_done() {
            write!(out, "[t={}] > ", self.simulator.current_tick())?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                debug!("input closed");
                writeln!(out)?;
                break;
            }

            match StepCommandParser::parse(&line) {
                Ok(command) => {
                    if !self.execute_command(command, out)? {
                        break;
                    }
                }
                Err(e) => writeln!(out, "Error: {e}")?,
            }
        }

        if self.is_done() {
            writeln!(out, "Simulation complete at tick {}.", self.simulator.current_tick())?;
        }
        Ok(())
    }

    /// Executes one step command
    ///
    /// Returns false when the session should end.
    pub fn execute_command<W: Write>(
        &mut self,
        command: StepCommand,
        out: &mut W,
    ) -> Result<bool, HostRuntimeError> {
        debug!(?command, "step command");
        match command {
            StepCommand::Step(count) => {
                let max_ticks = self.config.max_ticks;
                for record in self.simulator.steps(max_ticks).take(count as usize) {
                    writeln!(out, "{}", report::describe_tick(&record?))?;
                }
            }
            StepCommand::Run => {
                let start = self.simulator.current_tick();
                self.simulator
                    .run(self.config.max_ticks, self.config.verbose)?;
                writeln!(
                    out,
                    "Ran {} ticks.",
                    self.simulator.current_tick() - start
                )?;
            }
            StepCommand::Status => {
                write!(out, "{}", report::render_status(&self.simulator.snapshot()))?
            }
            StepCommand::Ready => {
                write!(out, "{}", report::render_ready(&self.simulator.snapshot()))?
            }
            StepCommand::Tasks => {
                write!(out, "{}", report::render_tasks(&self.simulator.snapshot()))?
            }
            StepCommand::Task(id) => {
                let snapshot = self.simulator.snapshot();
                match snapshot.task(&id) {
                    Some(task) => write!(out, "{}", report::render_task(task))?,
                    None => writeln!(out, "Unknown task: {id}")?,
                }
            }
            StepCommand::Help => write!(out, "{}", StepCommandParser::help())?,
            StepCommand::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn finish<W: Write>(&mut self, out: &mut W) -> Result<(), HostRuntimeError> {
        let report = self.simulator.report();

        if let Some(path) = &self.config.svg {
            GanttChart::from_report(&report).write_svg(path)?;
            info!(path = %path.display(), "svg written");
        }

        if self.config.json {
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        } else {
            writeln!(out)?;
            write!(out, "{}", report::render_report(&report))?;
            if let Some(path) = &self.config.svg {
                writeln!(out, "Gantt chart written to {}", path.display())?;
            }
        }
        out.flush()?;
        Ok(())
    }

    fn is_done(&self) -> bool {
        let limit_reached = self
            .config
            .max_ticks
            .is_some_and(|limit| self.simulator.current_tick() >= limit);
        !self.simulator.has_pending() || !self.simulator.can_progress() || limit_reached
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    pub fn config(&self) -> &HostRuntimeConfig {
        &self.config
    }
}
