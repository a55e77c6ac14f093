//! Deterministic task ordering.

use std::cmp::Ordering;

use crate::fields::{SortKey, SortPreference};
use crate::task::Task;

fn compare(a: &Task, b: &Task, key: SortKey) -> Ordering {
    match key {
        SortKey::Title => a.title.cmp(&b.title),
        SortKey::DueDate => a.due_date.cmp(&b.due_date),
    }
}

/// Order `tasks` by `key`. Equal keys keep their input order in both directions.
pub fn sort_tasks<'a, I>(tasks: I, key: SortKey, ascending: bool) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut sorted: Vec<&Task> = tasks.into_iter().collect();
    // `sort_by` is stable; flipping the operands (not reversing the output) keeps ties in order.
    if ascending {
        sorted.sort_by(|a, b| compare(a, b, key));
    } else {
        sorted.sort_by(|a, b| compare(b, a, key));
    }
    sorted
}

/// [`sort_tasks`] with a stored preference.
pub fn sort_by_preference<'a, I>(tasks: I, pref: SortPreference) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    sort_tasks(tasks, pref.key, pref.ascending)
}
