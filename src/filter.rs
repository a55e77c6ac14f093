//! Read-time projections over the task collection.
//!
//! Nothing here mutates the store. Every call recomputes from the current
//! in-memory collections.

use crate::class::Class;
use crate::color::Rgba;
use crate::db::Database;
use crate::fields::SortPreference;
use crate::slots::SlotStore;
use crate::sort::sort_by_preference;
use crate::task::Task;

/// Drop completed tasks unless `show_completed` is set. Order is preserved.
pub fn filter_visible<'a, I>(tasks: I, show_completed: bool) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks
        .into_iter()
        .filter(|t| show_completed || !t.is_completed)
        .collect()
}

/// A task ready for display, with its class resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskRow<'a> {
    pub task: &'a Task,
    /// `None` for unassigned tasks and for tasks whose class no longer exists.
    pub class: Option<&'a Class>,
    pub color: Rgba,
}

impl TaskRow<'_> {
    /// Set when the task names a class id that is not in the store.
    pub fn is_dangling(&self) -> bool {
        self.class.is_none() && self.task.assigned_class_id.is_some()
    }
}

/// Sort by `pref`, then apply the visibility filter, then resolve classes.
pub fn visible_rows<'a, S: SlotStore>(
    db: &'a Database<S>,
    pref: SortPreference,
    show_completed: bool,
) -> Vec<TaskRow<'a>> {
    let sorted = sort_by_preference(db.tasks(), pref);
    filter_visible(sorted, show_completed)
        .into_iter()
        .map(|task| {
            let class = db.class_for(task);
            TaskRow {
                task,
                class,
                color: class.map_or(Rgba::UNASSIGNED, |c| c.color),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::ClassId;
    use crate::db::{save_classes, save_tasks};
    use crate::fields::SortKey;
    use crate::slots::MemorySlots;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    #[test]
    fn hides_completed_only_when_asked() {
        let mut done = Task::new("done", date(1), None);
        done.is_completed = true;
        let open = Task::new("open", date(2), None);
        let tasks = vec![done, open];

        let hidden = filter_visible(&tasks, false);
        assert_eq!(hidden.len(), 1);
        assert_eq!(hidden[0].title, "open");
        assert_eq!(filter_visible(&tasks, true).len(), 2);
        assert!(tasks[0].is_completed);
    }

    #[test]
    fn rows_are_sorted_filtered_and_colored() {
        let mut slots = MemorySlots::new();
        let art = Class::new("Art", Rgba::new(1.0, 0.0, 0.0, 1.0));
        let mut done = Task::new("C", date(1), Some(art.id));
        done.is_completed = true;
        let orphan = Task::new("B", date(3), Some(ClassId::new()));
        let filed = Task::new("A", date(2), Some(art.id));
        save_classes(&mut slots, std::slice::from_ref(&art));
        save_tasks(&mut slots, &[done, orphan, filed]);
        let db = Database::open(slots);

        let pref = SortPreference {
            key: SortKey::Title,
            ascending: true,
        };
        let rows = visible_rows(&db, pref, false);
        let titles: Vec<&str> = rows.iter().map(|r| r.task.title.as_str()).collect();
        assert_eq!(titles, ["A", "B"]);
        assert_eq!(rows[0].color, art.color);
        assert!(!rows[0].is_dangling());
        assert_eq!(rows[1].color, Rgba::UNASSIGNED);
        assert!(rows[1].is_dangling());

        let rows = visible_rows(&db, SortPreference::default(), true);
        let titles: Vec<&str> = rows.iter().map(|r| r.task.title.as_str()).collect();
        assert_eq!(titles, ["C", "A", "B"]);
    }
}
