//! End-to-end workflows against on-disk slots: mutate, drop everything,
//! reopen from the data directory, and check what came back.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tempfile::TempDir;

use classtrack::class::ClassId;
use classtrack::color::Rgba;
use classtrack::crud::{ClassDraft, Controller, TaskDraft};
use classtrack::db::{load_classes, load_tasks, save_tasks, Database};
use classtrack::fields::SortKey;
use classtrack::filter::filter_visible;
use classtrack::slots::{self, FileSlots, MemorySlots, SlotStore};
use classtrack::sort::sort_tasks;
use classtrack::task::Task;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn open(dir: &TempDir) -> Controller<FileSlots> {
    Controller::open(FileSlots::open(dir.path()).unwrap())
}

#[test]
fn class_and_task_survive_reload() {
    let dir = TempDir::new().unwrap();
    let mut ct = open(&dir);
    let math = ct
        .add_class(ClassDraft {
            name: "Math".into(),
            color: Rgba::new(0.0, 0.0, 1.0, 1.0),
        })
        .unwrap();
    let hw = ct
        .add_task(TaskDraft {
            title: "HW1".into(),
            due_date: ymd(2024, 12, 1),
            assigned_class_id: Some(math),
        })
        .unwrap();
    let before_classes = ct.db().classes().to_vec();
    let before_tasks = ct.db().tasks().to_vec();
    drop(ct);

    let ct = open(&dir);
    assert_eq!(ct.db().classes(), before_classes.as_slice());
    assert_eq!(ct.db().tasks(), before_tasks.as_slice());
    let task = ct.db().task(hw).unwrap();
    assert_eq!(task.title, "HW1");
    assert_eq!(task.due_date, ymd(2024, 12, 1));
    assert_eq!(task.assigned_class_id, Some(math));
    assert!(ct.db().class(math).unwrap().color.approx_eq(&Rgba::BLUE));
}

#[test]
fn sort_examples() {
    let tasks = vec![
        Task::new("B", ymd(2024, 1, 2), None),
        Task::new("A", ymd(2024, 1, 1), None),
    ];
    let titles = |key, asc| -> Vec<String> {
        sort_tasks(&tasks, key, asc)
            .into_iter()
            .map(|t| t.title.clone())
            .collect()
    };
    assert_eq!(titles(SortKey::Title, true), ["A", "B"]);
    assert_eq!(titles(SortKey::DueDate, true), ["A", "B"]);
    assert_eq!(titles(SortKey::DueDate, false), ["B", "A"]);
}

#[test]
fn completed_task_hidden_after_reload() {
    let dir = TempDir::new().unwrap();
    let mut ct = open(&dir);
    let done = ct
        .add_task(TaskDraft {
            title: "Lab report".into(),
            due_date: ymd(2024, 3, 1),
            assigned_class_id: None,
        })
        .unwrap();
    ct.add_task(TaskDraft {
        title: "Reading".into(),
        due_date: ymd(2024, 3, 2),
        assigned_class_id: None,
    })
    .unwrap();
    ct.set_task_completed(done, true).unwrap();
    drop(ct);

    let ct = open(&dir);
    let tasks = ct.db().tasks();
    assert!(filter_visible(tasks, false).iter().all(|t| t.id != done));
    assert!(filter_visible(tasks, true).iter().any(|t| t.id == done));
    assert_eq!(filter_visible(tasks, true).len(), 2);
}

#[test]
fn edit_changes_only_the_title() {
    let dir = TempDir::new().unwrap();
    let mut ct = open(&dir);
    let id = ct
        .add_task(TaskDraft {
            title: "Essay draft".into(),
            due_date: ymd(2024, 4, 10),
            assigned_class_id: None,
        })
        .unwrap();

    ct.select_task(id).unwrap().title = "Essay final".into();
    ct.commit_task().unwrap();
    drop(ct);

    let stored = load_tasks(&FileSlots::open(dir.path()).unwrap());
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, id);
    assert_eq!(stored[0].title, "Essay final");
    assert_eq!(stored[0].due_date, ymd(2024, 4, 10));
    assert!(!stored[0].is_completed);
}

#[test]
fn deleting_a_class_keeps_referencing_tasks() {
    let dir = TempDir::new().unwrap();
    let mut ct = open(&dir);
    let bio = ct
        .add_class(ClassDraft {
            name: "Biology".into(),
            color: Rgba::new(0.0, 0.8, 0.0, 1.0),
        })
        .unwrap();
    let t = ct
        .add_task(TaskDraft {
            title: "Cell diagram".into(),
            due_date: ymd(2024, 5, 5),
            assigned_class_id: Some(bio),
        })
        .unwrap();
    ct.delete_class(bio).unwrap();
    drop(ct);

    let ct = open(&dir);
    assert!(ct.db().classes().is_empty());
    let task = ct.db().task(t).unwrap();
    assert_eq!(task.assigned_class_id, Some(bio));
    let rows = ct.visible_rows();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].class.is_none());
    assert_eq!(rows[0].color, Rgba::UNASSIGNED);
}

#[test]
fn corrupt_files_open_as_empty() {
    let dir = TempDir::new().unwrap();
    let mut raw = FileSlots::open(dir.path()).unwrap();
    raw.write_slot(slots::TASKS, "[{\"id\": 12}]").unwrap();
    raw.write_slot(slots::CLASSES, "garbage").unwrap();

    let mut ct = open(&dir);
    assert!(ct.db().tasks().is_empty());
    assert!(ct.db().classes().is_empty());
    assert_eq!(ct.sort_preference().key, SortKey::DueDate);
    assert!(ct.sort_preference().ascending);

    ct.add_class(ClassDraft {
        name: "Art".into(),
        color: Rgba::BLUE,
    })
    .unwrap();
    assert_eq!(load_classes(ct.db().slots()).len(), 1);
}

#[test]
fn legacy_class_key_is_read() {
    let dir = TempDir::new().unwrap();
    let class = ClassId::new();
    let mut raw = FileSlots::open(dir.path()).unwrap();
    raw.write_slot(
        slots::TASKS,
        &format!(
            r#"[{{"id":"6f1c2a47-9a43-4c1e-8f55-0f2a4f7f3b21","title":"Quiz","dueDate":"2024-06-01","isCompleted":true,"assignedClassID":"{class}"}}]"#
        ),
    )
    .unwrap();

    let db = Database::open(raw);
    assert_eq!(db.tasks().len(), 1);
    assert_eq!(db.tasks()[0].assigned_class_id, Some(class));
    assert!(db.tasks()[0].is_completed);
}

fn arb_task() -> impl Strategy<Value = Task> {
    (".{0,12}", 0i64..3650, any::<bool>(), any::<bool>()).prop_map(|(title, offset, done, filed)| {
        let mut task = Task::new(
            title,
            ymd(2020, 1, 1) + chrono::Duration::days(offset),
            filed.then(ClassId::new),
        );
        task.is_completed = done;
        task
    })
}

proptest! {
    #[test]
    fn tasks_round_trip_through_slots(tasks in prop::collection::vec(arb_task(), 0..16)) {
        let mut slots = MemorySlots::new();
        save_tasks(&mut slots, &tasks);
        prop_assert_eq!(load_tasks(&slots), tasks);
    }
}
