//! # classtrack
//!
//! A personal tracker for classes and the tasks filed under them.
//!
//! - **Classes** are labelled, colored categories.
//! - **Tasks** have a title, a due date, a completion flag and an optional
//!   class. The class link is by id only and may outlive the class.
//!
//! The crate is the data layer any front end drives: the entity model
//! ([`task`], [`class`], [`color`]), key-value persistence ([`slots`], [`db`]),
//! ordering and visibility projections ([`sort`], [`filter`]) and the
//! add/edit/delete workflows ([`crud`]). The `ct` binary is a thin CLI on top.
//!
//! ```no_run
//! use classtrack::crud::{ClassDraft, Controller};
//! use classtrack::color::Rgba;
//! use classtrack::slots::FileSlots;
//!
//! let mut ct = Controller::open(FileSlots::open("/tmp/classtrack")?);
//! let math = ct.add_class(ClassDraft { name: "Math".into(), color: Rgba::BLUE })?;
//! let draft = ct.begin_task();
//! draft.title = "HW1".into();
//! draft.assigned_class_id = Some(math);
//! ct.commit_task()?;
//! for row in ct.visible_rows() {
//!     println!("{} {}", row.task.due_date, row.task.title);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod class;
pub mod color;
pub mod crud;
pub mod dates;
pub mod db;
pub mod error;
pub mod fields;
pub mod filter;
pub mod slots;
pub mod sort;
pub mod task;
