//! Task and Catalog domain types
//!
//! A Task is a named unit of simulated work lasting a whole number of time
//! units. The Catalog is the fixed, ordered set of tasks known at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

/// Errors building a catalog
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Task name must not be empty")]
    EmptyName,

    #[error("Task '{0}' must have a positive duration")]
    ZeroDuration(String),

    #[error("Duplicate task name: {0}")]
    DuplicateName(String),
}

/// A named task with a fixed duration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,

    /// Duration in time units (seconds at the default tick)
    pub duration: u32,
}

impl Task {
    pub fn new(name: impl Into<String>, duration: u32) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

/// Ordered list of tasks, unique by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    tasks: Vec<Task>,
}

impl Catalog {
    /// Build a catalog, rejecting blank names, zero durations and duplicates
    pub fn new(tasks: Vec<Task>) -> Result<Self, CatalogError> {
        debug!(count = tasks.len(), "Catalog::new: called");
        let mut seen = HashSet::new();
        for task in &tasks {
            if task.name.trim().is_empty() {
                return Err(CatalogError::EmptyName);
            }
            if task.duration == 0 {
                return Err(CatalogError::ZeroDuration(task.name.clone()));
            }
            if !seen.insert(task.name.as_str()) {
                return Err(CatalogError::DuplicateName(task.name.clone()));
            }
        }
        Ok(Self { tasks })
    }

    /// Look up a task by name
    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.name == name)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            tasks: default_tasks(),
        }
    }
}

/// Reading, Eating and Homework
pub fn default_tasks() -> Vec<Task> {
    vec![Task::new("Reading", 5), Task::new("Eating", 3), Task::new("Homework", 6)]
}
