//! Entity store: the in-memory class and task collections and their slots.
//!
//! The collections held by [`Database`] are the single source of truth for the
//! running process. The slots mirror them: they are read once when the store is
//! opened and overwritten in full after every mutation. Loading never fails
//! (a missing or corrupt slot reads as empty) and saving never fails (a failed
//! write is logged and skipped).

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::class::{Class, ClassId};
use crate::error::ValidationError;
use crate::fields::{SortKey, SortPreference};
use crate::slots::{self, SlotStore};
use crate::task::{Task, TaskId};

/// Read and decode a slot, or `None` when it is missing or unreadable.
fn load_slot<S, T>(slots: &S, key: &str) -> Option<T>
where
    S: SlotStore + ?Sized,
    T: DeserializeOwned,
{
    let raw = match slots.read_slot(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(slot = key, "error reading slot, using default: {e}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(slot = key, "corrupt slot, using default: {e}");
            None
        }
    }
}

/// Encode and write a slot. Failures are logged, never returned.
fn save_slot<S, T>(slots: &mut S, key: &str, value: &T)
where
    S: SlotStore + ?Sized,
    T: Serialize + ?Sized,
{
    let data = match serde_json::to_string_pretty(value) {
        Ok(data) => data,
        Err(e) => {
            error!(slot = key, "cannot serialise slot, write skipped: {e}");
            return;
        }
    };
    match slots.write_slot(key, &data) {
        Ok(()) => debug!(slot = key, bytes = data.len(), "slot written"),
        Err(e) => error!(slot = key, "failed to write slot: {e}"),
    }
}

/// Classes stored in the `classes` slot; empty when absent or corrupt.
pub fn load_classes<S: SlotStore + ?Sized>(slots: &S) -> Vec<Class> {
    load_slot(slots, slots::CLASSES).unwrap_or_default()
}

/// Overwrite the `classes` slot with `classes`.
pub fn save_classes<S: SlotStore + ?Sized>(slots: &mut S, classes: &[Class]) {
    save_slot(slots, slots::CLASSES, classes);
}

/// Tasks stored in the `tasks` slot; empty when absent or corrupt.
pub fn load_tasks<S: SlotStore + ?Sized>(slots: &S) -> Vec<Task> {
    load_slot(slots, slots::TASKS).unwrap_or_default()
}

/// Overwrite the `tasks` slot with `tasks`.
pub fn save_tasks<S: SlotStore + ?Sized>(slots: &mut S, tasks: &[Task]) {
    save_slot(slots, slots::TASKS, tasks);
}

/// Stored sort preference, defaulting each half independently.
pub fn load_sort_preference<S: SlotStore + ?Sized>(slots: &S) -> SortPreference {
    let default = SortPreference::default();
    let key = load_slot::<_, String>(slots, slots::SORT_BY)
        .and_then(|token| match token.parse::<SortKey>() {
            Ok(key) => Some(key),
            Err(e) => {
                warn!("{e}, using {}", default.key);
                None
            }
        })
        .unwrap_or(default.key);
    let ascending = load_slot(slots, slots::SORT_ASCENDING).unwrap_or(default.ascending);
    SortPreference { key, ascending }
}

pub fn save_sort_preference<S: SlotStore + ?Sized>(slots: &mut S, pref: SortPreference) {
    save_slot(slots, slots::SORT_BY, pref.key.token());
    save_slot(slots, slots::SORT_ASCENDING, &pref.ascending);
}

/// In-memory collections backed by a [`SlotStore`].
#[derive(Debug)]
pub struct Database<S> {
    slots: S,
    classes: Vec<Class>,
    tasks: Vec<Task>,
}

impl<S: SlotStore> Database<S> {
    /// Load both collections from `slots`.
    pub fn open(slots: S) -> Self {
        let classes = load_classes(&slots);
        let tasks = load_tasks(&slots);
        debug!(classes = classes.len(), tasks = tasks.len(), "store opened");
        Database { slots, classes, tasks }
    }

    pub fn slots(&self) -> &S {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut S {
        &mut self.slots
    }

    pub fn into_slots(self) -> S {
        self.slots
    }

    /// Classes in insertion order.
    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    /// Tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn class(&self, id: ClassId) -> Option<&Class> {
        self.classes.iter().find(|c| c.id == id)
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Class a task points at, `None` when unassigned or dangling.
    pub fn class_for(&self, task: &Task) -> Option<&Class> {
        task.assigned_class_id.and_then(|id| self.class(id))
    }

    /// Tasks whose class reference names `class_id`.
    pub fn tasks_assigned_to(&self, class_id: ClassId) -> impl Iterator<Item = &Task> {
        self.tasks
            .iter()
            .filter(move |t| t.assigned_class_id == Some(class_id))
    }

    pub(crate) fn classes_mut(&mut self) -> &mut Vec<Class> {
        &mut self.classes
    }

    pub(crate) fn tasks_mut(&mut self) -> &mut Vec<Task> {
        &mut self.tasks
    }

    pub(crate) fn persist_classes(&mut self) {
        save_classes(&mut self.slots, &self.classes);
    }

    pub(crate) fn persist_tasks(&mut self) {
        save_tasks(&mut self.slots, &self.tasks);
    }

    /// Resolve a task by full id, unique id prefix, or case-insensitive title.
    pub fn resolve_task(&self, identifier: &str) -> Result<TaskId, ValidationError> {
        resolve(
            "task",
            identifier,
            self.tasks.iter().map(|t| (t.id.to_string(), t.title.as_str(), t.id)),
        )
    }

    /// Resolve a class by full id, unique id prefix, or case-insensitive name.
    pub fn resolve_class(&self, identifier: &str) -> Result<ClassId, ValidationError> {
        resolve(
            "class",
            identifier,
            self.classes.iter().map(|c| (c.id.to_string(), c.name.as_str(), c.id)),
        )
    }
}

fn resolve<'a, I, Id>(kind: &'static str, identifier: &str, entries: I) -> Result<Id, ValidationError>
where
    I: Iterator<Item = (String, &'a str, Id)> + Clone,
    Id: Copy,
{
    let needle = identifier.trim().to_lowercase();
    let unknown = || ValidationError::UnknownIdentifier {
        kind,
        input: identifier.to_string(),
    };
    if needle.is_empty() {
        return Err(unknown());
    }

    if let Some((_, _, id)) = entries.clone().find(|(key, _, _)| *key == needle) {
        return Ok(id);
    }

    let mut matches: Vec<(String, &str, Id)> = entries
        .clone()
        .filter(|(_, label, _)| label.to_lowercase() == needle)
        .collect();
    if matches.is_empty() {
        matches = entries.filter(|(key, _, _)| key.starts_with(&needle)).collect();
    }

    match matches.len() {
        0 => Err(unknown()),
        1 => Ok(matches[0].2),
        _ => Err(ValidationError::AmbiguousIdentifier {
            kind,
            input: identifier.to_string(),
            candidates: matches
                .iter()
                .map(|(key, label, _)| format!("  {key}  {label}"))
                .collect::<Vec<_>>()
                .join("\n"),
        }),
    }
}
