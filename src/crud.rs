//! Add / edit / delete workflows for tasks and classes.
//!
//! Each entity type has its own staging area. A workflow moves through
//!
//! ```text
//! Idle -> Composing(draft) -> commit            -> Idle
//! Idle -> Editing { id, draft } -> commit|delete -> Idle
//! ```
//!
//! The draft is a detached copy of the entity's editable fields; the entity
//! itself is touched only when the workflow commits, and it is located by id,
//! never by position. Every committed mutation is written to the slots before
//! the call returns.
//!
//! Mutating methods take `&mut self`, so two mutations can never overlap.

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use crate::class::{Class, ClassId};
use crate::color::{self, Rgba};
use crate::db::{save_sort_preference, Database};
use crate::error::{CrudError, ValidationError};
use crate::fields::{SortKey, SortPreference};
use crate::filter::{visible_rows, TaskRow};
use crate::slots::SlotStore;
use crate::task::{Task, TaskId};

/// Editable fields of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub due_date: NaiveDate,
    pub assigned_class_id: Option<ClassId>,
}

impl TaskDraft {
    /// Blank input: no title, due `today`, no class.
    pub fn new(today: NaiveDate) -> Self {
        TaskDraft {
            title: String::new(),
            due_date: today,
            assigned_class_id: None,
        }
    }
}

/// Editable fields of a class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDraft {
    pub name: String,
    pub color: Rgba,
}

impl Default for ClassDraft {
    fn default() -> Self {
        ClassDraft {
            name: String::new(),
            color: Rgba::DEFAULT_CLASS,
        }
    }
}

/// Staging area of one entity type.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage<Id, D> {
    Idle,
    Composing(D),
    Editing { id: Id, draft: D },
}

impl<Id, D> Stage<Id, D> {
    pub fn draft(&self) -> Option<&D> {
        match self {
            Stage::Idle => None,
            Stage::Composing(draft) | Stage::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut D> {
        match self {
            Stage::Idle => None,
            Stage::Composing(draft) | Stage::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Stage::Idle)
    }
}

/// What the staged workflows need to know about an entity type.
trait Entity: Sized {
    type Id: Copy + PartialEq;
    type Draft;
    const KIND: &'static str;

    fn id(&self) -> Self::Id;
    fn to_draft(&self) -> Self::Draft;
    /// Build a new entity with a fresh id.
    fn from_draft(draft: Self::Draft) -> Self;
    /// Overwrite editable fields; identity is untouched.
    fn apply(&mut self, draft: Self::Draft);
    /// Normalised copy of `draft`, or why it cannot be committed.
    fn validated(draft: &Self::Draft) -> Result<Self::Draft, ValidationError>;
    fn not_found(id: Self::Id) -> CrudError;
}

impl Entity for Task {
    type Id = TaskId;
    type Draft = TaskDraft;
    const KIND: &'static str = "task";

    fn id(&self) -> TaskId {
        self.id
    }

    fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            due_date: self.due_date,
            assigned_class_id: self.assigned_class_id,
        }
    }

    fn from_draft(draft: TaskDraft) -> Self {
        Task::new(draft.title, draft.due_date, draft.assigned_class_id)
    }

    fn apply(&mut self, draft: TaskDraft) {
        self.title = draft.title;
        self.due_date = draft.due_date;
        self.assigned_class_id = draft.assigned_class_id;
    }

    fn validated(draft: &TaskDraft) -> Result<TaskDraft, ValidationError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(TaskDraft {
            title: title.to_string(),
            ..draft.clone()
        })
    }

    fn not_found(id: TaskId) -> CrudError {
        CrudError::TaskNotFound(id)
    }
}

impl Entity for Class {
    type Id = ClassId;
    type Draft = ClassDraft;
    const KIND: &'static str = "class";

    fn id(&self) -> ClassId {
        self.id
    }

    fn to_draft(&self) -> ClassDraft {
        ClassDraft {
            name: self.name.clone(),
            color: self.color,
        }
    }

    fn from_draft(draft: ClassDraft) -> Self {
        Class::new(draft.name, draft.color)
    }

    fn apply(&mut self, draft: ClassDraft) {
        self.name = draft.name;
        self.color = draft.color;
    }

    fn validated(draft: &ClassDraft) -> Result<ClassDraft, ValidationError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        // Reject what the stored form would refuse to read back.
        let color = color::decode(color::encode(draft.color))
            .map_err(|e| ValidationError::UnstorableColor(e.to_string()))?;
        Ok(ClassDraft {
            name: name.to_string(),
            color,
        })
    }

    fn not_found(id: ClassId) -> CrudError {
        CrudError::ClassNotFound(id)
    }
}

fn select<E: Entity>(
    items: &[E],
    stage: &mut Stage<E::Id, E::Draft>,
    id: E::Id,
) -> Result<(), CrudError> {
    let entity = items.iter().find(|e| e.id() == id).ok_or_else(|| E::not_found(id))?;
    *stage = Stage::Editing {
        id,
        draft: entity.to_draft(),
    };
    Ok(())
}

/// Apply the staged draft. On a validation failure the stage is left as it was.
fn commit<E: Entity>(items: &mut Vec<E>, stage: &mut Stage<E::Id, E::Draft>) -> Result<E::Id, CrudError> {
    match std::mem::replace(stage, Stage::Idle) {
        Stage::Idle => Err(CrudError::NothingStaged(E::KIND)),
        Stage::Composing(draft) => match E::validated(&draft) {
            Ok(clean) => {
                let entity = E::from_draft(clean);
                let id = entity.id();
                items.push(entity);
                Ok(id)
            }
            Err(e) => {
                *stage = Stage::Composing(draft);
                Err(e.into())
            }
        },
        Stage::Editing { id, draft } => match E::validated(&draft) {
            Ok(clean) => {
                let entity = items
                    .iter_mut()
                    .find(|e| e.id() == id)
                    .ok_or_else(|| E::not_found(id))?;
                entity.apply(clean);
                Ok(id)
            }
            Err(e) => {
                *stage = Stage::Editing { id, draft };
                Err(e.into())
            }
        },
    }
}

fn staged_id<Id: Copy, D>(stage: &Stage<Id, D>, kind: &'static str) -> Result<Id, CrudError> {
    match stage {
        Stage::Editing { id, .. } => Ok(*id),
        Stage::Composing(_) => Err(CrudError::WrongStage(kind)),
        Stage::Idle => Err(CrudError::NothingStaged(kind)),
    }
}

/// Remove by identity, keeping the order of the rest, and clear the stage.
fn remove<E: Entity>(items: &mut Vec<E>, stage: &mut Stage<E::Id, E::Draft>, id: E::Id) -> Result<E, CrudError> {
    let pos = items.iter().position(|e| e.id() == id).ok_or_else(|| E::not_found(id))?;
    *stage = Stage::Idle;
    Ok(items.remove(pos))
}

/// Result of deleting a class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDeletion {
    pub class: Class,
    /// Tasks that still name the deleted class. They are kept as they are and
    /// read as unassigned from now on.
    pub dangling: Vec<TaskId>,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// The single mutation entry point for tasks, classes and view preferences.
#[derive(Debug)]
pub struct Controller<S> {
    db: Database<S>,
    sort: SortPreference,
    show_completed: bool,
    task_stage: Stage<TaskId, TaskDraft>,
    class_stage: Stage<ClassId, ClassDraft>,
    today: fn() -> NaiveDate,
}

impl<S: SlotStore> Controller<S> {
    /// Load collections and sort preference from `slots`.
    pub fn open(slots: S) -> Self {
        let db = Database::open(slots);
        let sort = crate::db::load_sort_preference(db.slots());
        Controller {
            db,
            sort,
            show_completed: true,
            task_stage: Stage::Idle,
            class_stage: Stage::Idle,
            today: local_today,
        }
    }

    /// Replace the clock used for the default due date of new tasks.
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn db(&self) -> &Database<S> {
        &self.db
    }

    pub fn into_db(self) -> Database<S> {
        self.db
    }

    // ---- tasks ----

    pub fn task_stage(&self) -> &Stage<TaskId, TaskDraft> {
        &self.task_stage
    }

    /// Start composing a new task with blank fields.
    pub fn begin_task(&mut self) -> &mut TaskDraft {
        self.task_stage = Stage::Composing(TaskDraft::new((self.today)()));
        match &mut self.task_stage {
            Stage::Composing(draft) => draft,
            _ => unreachable!("stage was just set to Composing"),
        }
    }

    /// Copy an existing task into the staging area.
    pub fn select_task(&mut self, id: TaskId) -> Result<&mut TaskDraft, CrudError> {
        select(self.db.tasks(), &mut self.task_stage, id)?;
        self.task_stage
            .draft_mut()
            .ok_or(CrudError::NothingStaged(Task::KIND))
    }

    pub fn task_draft_mut(&mut self) -> Option<&mut TaskDraft> {
        self.task_stage.draft_mut()
    }

    /// Commit the staged task (new or edited) and persist.
    pub fn commit_task(&mut self) -> Result<TaskId, CrudError> {
        let editing = matches!(self.task_stage, Stage::Editing { .. });
        let id = commit(self.db.tasks_mut(), &mut self.task_stage)?;
        self.db.persist_tasks();
        info!(%id, "{} task", if editing { "updated" } else { "added" });
        Ok(id)
    }

    /// Discard the staging area.
    pub fn cancel_task(&mut self) {
        self.task_stage = Stage::Idle;
    }

    /// Delete the task currently being edited and persist.
    pub fn delete_selected_task(&mut self) -> Result<Task, CrudError> {
        let id = staged_id(&self.task_stage, Task::KIND)?;
        self.delete_task(id)
    }

    /// Delete a task by id and persist. Clears the task staging area.
    pub fn delete_task(&mut self, id: TaskId) -> Result<Task, CrudError> {
        let task = remove(self.db.tasks_mut(), &mut self.task_stage, id)?;
        self.db.persist_tasks();
        info!(%id, "deleted task");
        Ok(task)
    }

    /// Compose and commit in one step.
    pub fn add_task(&mut self, draft: TaskDraft) -> Result<TaskId, CrudError> {
        *self.begin_task() = draft;
        self.commit_task()
    }

    /// Select, let `edit` change the draft, then commit.
    pub fn edit_task(&mut self, id: TaskId, edit: impl FnOnce(&mut TaskDraft)) -> Result<(), CrudError> {
        edit(self.select_task(id)?);
        self.commit_task().map(|_| ())
    }

    /// Mark a task done or not done and persist.
    pub fn set_task_completed(&mut self, id: TaskId, completed: bool) -> Result<(), CrudError> {
        let task = self
            .db
            .tasks_mut()
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(CrudError::TaskNotFound(id))?;
        task.is_completed = completed;
        self.db.persist_tasks();
        info!(%id, completed, "task completion changed");
        Ok(())
    }

    // ---- classes ----

    pub fn class_stage(&self) -> &Stage<ClassId, ClassDraft> {
        &self.class_stage
    }

    /// Start composing a new class with blank name and the default color.
    pub fn begin_class(&mut self) -> &mut ClassDraft {
        self.class_stage = Stage::Composing(ClassDraft::default());
        match &mut self.class_stage {
            Stage::Composing(draft) => draft,
            _ => unreachable!("stage was just set to Composing"),
        }
    }

    /// Copy an existing class into the staging area.
    pub fn select_class(&mut self, id: ClassId) -> Result<&mut ClassDraft, CrudError> {
        select(self.db.classes(), &mut self.class_stage, id)?;
        self.class_stage
            .draft_mut()
            .ok_or(CrudError::NothingStaged(Class::KIND))
    }

    pub fn class_draft_mut(&mut self) -> Option<&mut ClassDraft> {
        self.class_stage.draft_mut()
    }

    /// Commit the staged class (new or edited) and persist.
    pub fn commit_class(&mut self) -> Result<ClassId, CrudError> {
        let id = commit(self.db.classes_mut(), &mut self.class_stage)?;
        self.db.persist_classes();
        info!(%id, "saved class");
        Ok(id)
    }

    pub fn cancel_class(&mut self) {
        self.class_stage = Stage::Idle;
    }

    /// Delete the class currently being edited and persist.
    pub fn delete_selected_class(&mut self) -> Result<ClassDeletion, CrudError> {
        let id = staged_id(&self.class_stage, Class::KIND)?;
        self.delete_class(id)
    }

    /// Delete a class by id and persist. Tasks pointing at it are left untouched.
    pub fn delete_class(&mut self, id: ClassId) -> Result<ClassDeletion, CrudError> {
        let class = remove(self.db.classes_mut(), &mut self.class_stage, id)?;
        self.db.persist_classes();
        let dangling: Vec<TaskId> = self.db.tasks_assigned_to(id).map(|t| t.id).collect();
        if dangling.is_empty() {
            info!(%id, "deleted class");
        } else {
            warn!(%id, tasks = dangling.len(), "deleted class is still referenced by tasks");
        }
        Ok(ClassDeletion { class, dangling })
    }

    pub fn add_class(&mut self, draft: ClassDraft) -> Result<ClassId, CrudError> {
        *self.begin_class() = draft;
        self.commit_class()
    }

    pub fn edit_class(&mut self, id: ClassId, edit: impl FnOnce(&mut ClassDraft)) -> Result<(), CrudError> {
        edit(self.select_class(id)?);
        self.commit_class().map(|_| ())
    }

    // ---- view preferences ----

    pub fn sort_preference(&self) -> SortPreference {
        self.sort
    }

    /// Change and persist the sort preference.
    pub fn set_sort(&mut self, pref: SortPreference) {
        self.sort = pref;
        save_sort_preference(self.db.slots_mut(), pref);
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.set_sort(SortPreference { key, ..self.sort });
    }

    pub fn toggle_sort_direction(&mut self) {
        self.set_sort(SortPreference {
            ascending: !self.sort.ascending,
            ..self.sort
        });
    }

    pub fn show_completed(&self) -> bool {
        self.show_completed
    }

    /// Session-only; not persisted.
    pub fn set_show_completed(&mut self, show: bool) {
        self.show_completed = show;
    }

    pub fn toggle_show_completed(&mut self) {
        self.show_completed = !self.show_completed;
    }

    /// The list a view displays: sorted, filtered, classes resolved.
    pub fn visible_rows(&self) -> Vec<TaskRow<'_>> {
        visible_rows(&self.db, self.sort, self.show_completed)
    }
}
