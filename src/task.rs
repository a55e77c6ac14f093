//! Task data structure.
//!
//! A task is a dated to-do item that may point at a [`Class`](crate::class::Class)
//! by id. That pointer is weak: the class can be deleted while tasks still
//! reference it, and readers treat such a task as unassigned.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::class::ClassId;

/// Opaque identity of a [`Task`]. Freshly random, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        TaskId(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        TaskId::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(TaskId)
    }
}

/// A dated work item, optionally filed under a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, alias = "assignedClassID")]
    pub assigned_class_id: Option<ClassId>,
}

impl Task {
    pub fn new(title: impl Into<String>, due_date: NaiveDate, assigned_class_id: Option<ClassId>) -> Self {
        Task {
            id: TaskId::new(),
            title: title.into(),
            due_date,
            is_completed: false,
            assigned_class_id,
        }
    }
}
