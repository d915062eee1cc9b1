//! Task roster owned by the simulator

use crate::error::EngineError;
use crate::task::Task;
use core_types::TaskId;
use std::collections::HashMap;

/// Ordered set of tasks with unique identifiers
///
/// Roster order is the configuration order; it decides admission order for
/// tasks arriving on the same tick.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    tasks: Vec<Task>,
    index: HashMap<TaskId, usize>,
}

impl Roster {
    /// Builds a roster, rejecting duplicate identifiers
    pub fn new(tasks: Vec<Task>) -> Result<Self, EngineError> {
        let mut index = HashMap::with_capacity(tasks.len());
        for (slot, task) in tasks.iter().enumerate() {
            if index.insert(task.id().clone(), slot).is_some() {
                return Err(EngineError::DuplicateTaskId(task.id().clone()));
            }
        }
        Ok(Self { tasks, index })
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.index.get(id).map(|&slot| &self.tasks[slot])
    }

    pub(crate) fn get_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        match self.index.get(id) {
            Some(&slot) => Some(&mut self.tasks[slot]),
            None => None,
        }
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Task> {
        self.tasks.iter_mut()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
