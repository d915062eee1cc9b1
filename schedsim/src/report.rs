//! Text rendering of reports, snapshots and ticks

use core_types::TaskId;
use gantt_render::GanttChart;
use sim_kernel::{SimulationReport, SimulationSnapshot, TaskSnapshot, TickRecord};
use std::fmt::Write;

const MIN_ID_WIDTH: usize = 5;
const VALUE_WIDTH: usize = 10;

fn id_width<'a>(ids: impl Iterator<Item = &'a TaskId>) -> usize {
    ids.map(|id| id.as_str().chars().count())
        .max()
        .unwrap_or(0)
        .max(MIN_ID_WIDTH)
}

fn join_ids(ids: &[TaskId]) -> String {
    if ids.is_empty() {
        return "(none)".to_string();
    }
    ids.iter().map(TaskId::as_str).collect::<Vec<_>>().join(", ")
}

/// Per-task metrics table with averages over finished tasks
pub fn metrics_table(report: &SimulationReport) -> String {
    let w = id_width(report.tasks.iter().map(|t| &t.id));
    let rule = "-".repeat(w + 3 * (VALUE_WIDTH + 3));
    let mut out = String::new();

    if report.tasks.is_empty() {
        return "No task was loaded.\n".to_string();
    }

    let _ = writeln!(
        out,
        "{:<w$} | {:<v$} | {:<v$} | {:<v$}",
        "ID",
        "Turnaround",
        "Waiting",
        "Response",
        v = VALUE_WIDTH
    );
    let _ = writeln!(out, "{rule}");
    for task in &report.tasks {
        match task.metrics {
            Some(m) => {
                let _ = writeln!(
                    out,
                    "{:<w$} | {:<v$} | {:<v$} | {:<v$}",
                    task.id.as_str(),
                    m.turnaround,
                    m.waiting,
                    m.response,
                    v = VALUE_WIDTH
                );
            }
            None => {
                let _ = writeln!(out, "{:<w$} | N/A (not finished)", task.id.as_str());
            }
        }
    }
    let _ = writeln!(out, "{rule}");
    match &report.summary {
        Some(s) => {
            let _ = writeln!(
                out,
                "{:<w$} | {:<v$.2} | {:<v$.2} | {:<v$.2}",
                "AVG",
                s.avg_turnaround,
                s.avg_waiting,
                s.avg_response,
                v = VALUE_WIDTH
            );
        }
        None => {
            let _ = writeln!(out, "{:<w$} | N/A (no task finished)", "AVG");
        }
    }
    out
}

/// Full text report: run summary, metrics table and Gantt chart
pub fn render_report(report: &SimulationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Simulation Results ===");
    match report.quantum {
        Some(q) => {
            let _ = writeln!(out, "Policy: {} (quantum {q})", report.policy);
        }
        None => {
            let _ = writeln!(out, "Policy: {}", report.policy);
        }
    }
    let _ = writeln!(out, "Total ticks: {}", report.ticks);
    let _ = writeln!(out, "Idle ticks: {}", report.idle_ticks());
    let _ = writeln!(out, "Preemptions: {}", report.total_preemptions());
    let _ = writeln!(out);
    let _ = writeln!(out, "--- Task Metrics ---");
    out.push_str(&metrics_table(report));
    let _ = writeln!(out);
    let _ = writeln!(out, "--- Gantt Chart ---");
    out.push_str(&GanttChart::from_report(report).render_text());
    out
}

/// One-line description of a simulated tick
pub fn describe_tick(record: &TickRecord) -> String {
    let mut line = format!("[tick {}] ", record.tick);
    match &record.selected {
        Some(id) => {
            let _ = write!(line, "running {id}");
        }
        None => line.push_str("idle"),
    }
    if !record.admitted.is_empty() {
        let _ = write!(line, " | admitted {}", join_ids(&record.admitted));
    }
    if let Some(id) = &record.preempted {
        let _ = write!(line, " | preempted {id}");
    }
    if let Some(id) = &record.completed {
        let _ = write!(line, " | finished {id}");
    }
    line
}

pub fn render_status(snapshot: &SimulationSnapshot) -> String {
    let pending = snapshot
        .tasks
        .iter()
        .filter(|task| !task.state.is_terminal())
        .count();
    let running = snapshot
        .running
        .as_ref()
        .map_or("(idle)", |id| id.as_str());

    format!(
        "Tick: {}\nRunning: {}\nReady: {}\nPending: {} of {} tasks\n",
        snapshot.tick,
        running,
        join_ids(&snapshot.ready),
        pending,
        snapshot.tasks.len()
    )
}

pub fn render_ready(snapshot: &SimulationSnapshot) -> String {
    format!("Ready: {}\n", join_ids(&snapshot.ready))
}

/// Table of every task, roster order
pub fn render_tasks(snapshot: &SimulationSnapshot) -> String {
    let w = id_width(snapshot.tasks.iter().map(|t| &t.id));
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<w$} | {:<10} | {:>7} | {:>8} | {:>9} | {:>8}",
        "ID", "State", "Arrival", "Duration", "Remaining", "Priority"
    );
    for task in &snapshot.tasks {
        let _ = writeln!(
            out,
            "{:<w$} | {:<10} | {:>7} | {:>8} | {:>9} | {:>8}",
            task.id.as_str(),
            task.state.as_str(),
            task.arrival,
            task.duration,
            task.remaining,
            task.priority
        );
    }
    out
}

/// Detail of one task
pub fn render_task(task: &TaskSnapshot) -> String {
    let tick = |t: Option<u64>| t.map_or("-".to_string(), |t| t.to_string());
    let mut out = String::new();
    let _ = writeln!(out, "Task {}", task.id);
    let _ = writeln!(out, "  State:       {}", task.state);
    let _ = writeln!(out, "  Priority:    {}", task.priority);
    let _ = writeln!(out, "  Arrival:     {}", task.arrival);
    let _ = writeln!(
        out,
        "  Progress:    {}/{} ({} remaining)",
        task.elapsed, task.duration, task.remaining
    );
    let _ = writeln!(out, "  Started:     {}", tick(task.start_time));
    let _ = writeln!(out, "  Finished:    {}", tick(task.finish_time));
    let _ = writeln!(out, "  Preemptions: {}", task.preemptions);
    out
}
