//! Line parser for the configuration format

use crate::config::{ConfigWarning, SimulationConfig, TaskEntry};
use crate::error::{ConfigError, LineError};
use core_types::{Priority, TaskId, Tick};
use sim_kernel::{Policy, TaskEvent, DEFAULT_COLOR};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Quantum used when the header omits it
pub const DEFAULT_QUANTUM: u64 = 1;

/// Priority used when a task line omits it
pub const DEFAULT_PRIORITY: Priority = 0;

/// Older configuration files name the priority policy this way
const PRIORITY_ALIAS: &str = "PRIORIDADE";

const TASK_FORMAT: &str = "expected id;color;arrival;duration;priority;events";

/// Parses a whole configuration text
pub(crate) fn parse(text: &str) -> Result<SimulationConfig, ConfigError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

    let mut parser = Parser::default();

    let (header_line, header) = lines.next().ok_or(ConfigError::Empty)?;
    let (algorithm, quantum) = parser.header(header, header_line)?;

    let mut errors = Vec::new();
    for (number, line) in lines {
        match parser.task_line(line, number) {
            Ok(entry) => parser.tasks.push(entry),
            Err(err) => errors.push(err),
        }
    }

    if !errors.is_empty() {
        return Err(ConfigError::Tasks(errors));
    }
    if parser.tasks.is_empty() {
        return Err(ConfigError::NoTasks);
    }

    let mut seen = HashSet::new();
    for entry in &parser.tasks {
        if !seen.insert(&entry.id) {
            return Err(ConfigError::DuplicateTask(entry.id.clone()));
        }
    }

    debug!(
        policy = %algorithm,
        quantum,
        tasks = parser.tasks.len(),
        warnings = parser.warnings.len(),
        "configuration parsed"
    );

    Ok(SimulationConfig {
        algorithm,
        quantum,
        tasks: parser.tasks,
        warnings: parser.warnings,
    })
}

#[derive(Default)]
struct Parser {
    tasks: Vec<TaskEntry>,
    warnings: Vec<ConfigWarning>,
}

impl Parser {
    fn warn(&mut self, line: usize, message: String) {
        warn!(line, "{}", message);
        self.warnings.push(ConfigWarning { line, message });
    }

    /// `ALGORITHM;QUANTUM`
    fn header(&mut self, header: &str, line: usize) -> Result<(Policy, u64), ConfigError> {
        let mut parts = header.split(';').map(str::trim);

        let name = parts.next().unwrap_or_default();
        if name.is_empty() {
            return Err(ConfigError::Header(LineError::new(
                line,
                "algorithm not specified",
            )));
        }
        let name = if name.eq_ignore_ascii_case(PRIORITY_ALIAS) {
            Policy::Priority.name()
        } else {
            name
        };
        let algorithm: Policy = name
            .parse()
            .map_err(|e: sim_kernel::SchedulerError| {
                ConfigError::Header(LineError::new(line, e.to_string()))
            })?;

        let quantum = match parts.next().filter(|q| !q.is_empty()) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(q) if q > 0 => q,
                _ => {
                    return Err(ConfigError::Header(LineError::new(
                        line,
                        format!("invalid quantum '{raw}': must be a positive integer"),
                    )))
                }
            },
            None => {
                self.warn(
                    line,
                    format!("quantum not specified, using default {DEFAULT_QUANTUM}"),
                );
                DEFAULT_QUANTUM
            }
        };

        Ok((algorithm, quantum))
    }

    /// `id;color;arrival;duration;priority;events`
    fn task_line(&mut self, text: &str, line: usize) -> Result<TaskEntry, LineError> {
        let mut fields: Vec<&str> = text.splitn(6, ';').map(str::trim).collect();
        if fields.last().is_some_and(|f| f.is_empty()) {
            fields.pop();
        }
        if fields.len() < 4 {
            return Err(LineError::new(line, TASK_FORMAT));
        }

        let id = fields[0];
        if id.is_empty() {
            return Err(LineError::new(line, "task ID must not be empty"));
        }

        let arrival = parse_int(fields[2], "arrival", line)?;
        if arrival < 0 {
            return Err(LineError::new(
                line,
                format!("arrival of task '{id}' must not be negative"),
            ));
        }

        let duration = parse_int(fields[3], "duration", line)?;
        if duration <= 0 {
            return Err(LineError::new(
                line,
                format!("duration of task '{id}' must be greater than zero"),
            ));
        }

        let priority = match fields.get(4).filter(|p| !p.is_empty()) {
            Some(raw) => parse_int(raw, "priority", line)?,
            None => {
                self.warn(
                    line,
                    format!(
                        "priority not specified for task '{id}', using default {DEFAULT_PRIORITY}"
                    ),
                );
                DEFAULT_PRIORITY
            }
        };

        let color = match fields[1] {
            "" => DEFAULT_COLOR.to_string(),
            color => {
                if !is_hex_color(color) {
                    self.warn(
                        line,
                        format!("color '{color}' of task '{id}' is not #RGB or #RRGGBB"),
                    );
                }
                color.to_string()
            }
        };

        let events = match fields.get(5) {
            Some(raw) => self.events(raw, id, line),
            None => Vec::new(),
        };

        Ok(TaskEntry {
            line,
            id: TaskId::new(id),
            color,
            arrival: arrival as Tick,
            duration: duration as Tick,
            priority,
            events,
        })
    }

    /// Event list; malformed entries are skipped with a warning
    fn events(&mut self, raw: &str, task: &str, line: usize) -> Vec<TaskEvent> {
        let mut events = Vec::new();

        for item in split_top_level(raw) {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            match parse_event(item) {
                Ok(event) => events.push(event),
                Err(reason) => self.warn(
                    line,
                    format!("event '{item}' of task '{task}' ignored: {reason}"),
                ),
            }
        }

        events
    }
}

fn parse_int(raw: &str, field: &str, line: usize) -> Result<i64, LineError> {
    raw.parse::<i64>()
        .map_err(|_| LineError::new(line, format!("invalid {field} '{raw}': not an integer")))
}

fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Splits on `;` outside parentheses
fn split_top_level(raw: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (index, c) in raw.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => {
                items.push(&raw[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    items.push(&raw[start..]);
    items
}

fn parse_event(item: &str) -> Result<TaskEvent, String> {
    let (kind, rest) = item
        .split_once('(')
        .ok_or_else(|| "unrecognized format".to_string())?;
    let args = rest
        .strip_suffix(')')
        .ok_or_else(|| "missing closing parenthesis".to_string())?;
    let args: Vec<&str> = args.split(',').map(str::trim).collect();
    if args.len() != 2 {
        return Err(format!("expected 2 arguments, found {}", args.len()));
    }

    match kind.trim().to_ascii_uppercase().as_str() {
        "IO" | "E/S" => Ok(TaskEvent::Io {
            at: event_time(args[0])?,
            duration: event_time(args[1])?,
        }),
        "ML" => Ok(TaskEvent::MutexLock {
            mutex: mutex_name(args[0])?,
            at: event_time(args[1])?,
        }),
        "MU" => Ok(TaskEvent::MutexUnlock {
            mutex: mutex_name(args[0])?,
            at: event_time(args[1])?,
        }),
        other => Err(format!("unknown event kind '{other}'")),
    }
}

fn event_time(raw: &str) -> Result<Tick, String> {
    let value: i64 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not an integer"))?;
    if value < 0 {
        return Err(format!("negative value {value}"));
    }
    Ok(value as Tick)
}

fn mutex_name(raw: &str) -> Result<String, String> {
    if raw.is_empty() {
        return Err("mutex name is empty".to_string());
    }
    Ok(raw.to_string())
}
