//! # Gantt Renderer
//!
//! Turns an execution history into a Gantt chart, as text or SVG.
//!
//! ## Philosophy
//!
//! - **Rendering is a host concern**: the engine records history, this
//!   crate only presents it
//! - **Charts are values**: a [`GanttChart`] is built once and rendered
//!   as many times as needed
//! - **Renderer is dumb and replaceable**: no scheduling logic here
//!
//! ## Layout
//!
//! One row per task that ran, sorted by task identifier. Idle ticks leave
//! gaps. The chart width is the end of the last interval.

mod svg;
mod text;

use core_types::{TaskId, Tick};
use sim_kernel::{execution_intervals, HistoryEntry, SimulationReport, Task, DEFAULT_COLOR};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Cannot write chart to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Half-open tick range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Tick,
    pub end: Tick,
}

impl Span {
    pub fn len(&self) -> Tick {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, tick: Tick) -> bool {
        self.start <= tick && tick < self.end
    }
}

/// All execution spans of one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GanttRow {
    pub task: TaskId,
    pub color: String,
    /// Spans in time order
    pub spans: Vec<Span>,
}

impl GanttRow {
    pub fn is_running_at(&self, tick: Tick) -> bool {
        self.spans.iter().any(|span| span.contains(tick))
    }

    /// Ticks spent on the CPU
    pub fn busy_ticks(&self) -> Tick {
        self.spans.iter().map(Span::len).sum()
    }
}

/// Gantt chart of one run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GanttChart {
    rows: Vec<GanttRow>,
    width: Tick,
}

impl GanttChart {
    /// Builds a chart from a history; colors come from `tasks`
    ///
    /// Tasks missing from `tasks` are drawn in [`DEFAULT_COLOR`].
    pub fn from_history(history: &[HistoryEntry], tasks: &[Task]) -> Self {
        let colors: BTreeMap<&TaskId, &str> =
            tasks.iter().map(|task| (task.id(), task.color())).collect();
        Self::build(history, |id| colors.get(id).map(|c| c.to_string()))
    }

    /// Builds a chart from a finished run report
    pub fn from_report(report: &SimulationReport) -> Self {
        let colors: BTreeMap<&TaskId, &str> = report
            .tasks
            .iter()
            .map(|task| (&task.id, task.color.as_str()))
            .collect();
        Self::build(&report.history, |id| colors.get(id).map(|c| c.to_string()))
    }

    fn build(history: &[HistoryEntry], color_of: impl Fn(&TaskId) -> Option<String>) -> Self {
        let mut rows: BTreeMap<TaskId, GanttRow> = BTreeMap::new();
        let mut width = 0;

        for interval in execution_intervals(history) {
            width = width.max(interval.end);
            let row = rows.entry(interval.task.clone()).or_insert_with(|| GanttRow {
                color: color_of(&interval.task).unwrap_or_else(|| DEFAULT_COLOR.to_string()),
                task: interval.task.clone(),
                spans: Vec::new(),
            });
            row.spans.push(Span {
                start: interval.start,
                end: interval.end,
            });
        }

        debug!(rows = rows.len(), width, "gantt chart built");
        Self {
            rows: rows.into_values().collect(),
            width,
        }
    }

    pub fn rows(&self) -> &[GanttRow] {
        &self.rows
    }

    pub fn row(&self, task: &TaskId) -> Option<&GanttRow> {
        self.rows.iter().find(|row| &row.task == task)
    }

    /// Number of ticks covered
    pub fn width(&self) -> Tick {
        self.width
    }

    /// Number of task rows
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders the chart as plain text
    pub fn render_text(&self) -> String {
        text::render(self)
    }

    /// Renders the chart as a standalone SVG document
    pub fn render_svg(&self) -> String {
        svg::render(self)
    }

    /// Writes the SVG document to `path`
    pub fn write_svg(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        std::fs::write(path, self.render_svg()).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "gantt chart written");
        Ok(())
    }
}
