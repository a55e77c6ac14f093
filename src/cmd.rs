//! Subcommands of the `ct` binary and their handlers.
//!
//! Every handler works through the [`Controller`]: resolve the identifier the
//! user typed, stage the change, commit, then print what happened.

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use clap_complete::{generate, Shell};

use classtrack::class::ClassId;
use classtrack::color::{color_names, Rgba};
use classtrack::crud::{ClassDraft, Controller, TaskDraft};
use classtrack::dates::{format_due_relative, parse_due};
use classtrack::error::CrudError;
use classtrack::fields::{SortKey, SortPreference};
use classtrack::filter::TaskRow;
use classtrack::slots::SlotStore;

#[derive(Subcommand)]
pub enum Commands {
    /// Add, list, edit and delete tasks.
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Add, list, edit and delete classes.
    Class {
        #[command(subcommand)]
        action: ClassAction,
    },

    /// Set how task lists are ordered. Remembered between runs.
    Sort {
        /// Sort key: title | due-date.
        #[arg(value_enum)]
        key: SortKey,
        /// Newest / last first instead.
        #[arg(long)]
        descending: bool,
    },

    /// Open and completed task counts per class.
    Summary,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "fri", "next mon" or "in Nd".
        #[arg(long, default_value = "today")]
        due: String,
        /// Class id or name.
        #[arg(long)]
        class: Option<String>,
    },

    /// List tasks in the saved sort order.
    List {
        /// Leave completed tasks out.
        #[arg(long)]
        hide_completed: bool,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Change the title, due date or class of a task.
    Edit {
        /// Task id, id prefix or title.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        due: Option<String>,
        /// Class id or name.
        #[arg(long, conflicts_with = "no_class")]
        class: Option<String>,
        /// Remove the class assignment.
        #[arg(long)]
        no_class: bool,
    },

    /// Mark a task done.
    Complete {
        /// Task id, id prefix or title.
        id: String,
    },

    /// Mark a task not done.
    Reopen {
        /// Task id, id prefix or title.
        id: String,
    },

    /// Delete a task.
    Delete {
        /// Task id, id prefix or title.
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ClassAction {
    /// Add a new class.
    Add {
        name: String,
        /// #RRGGBB, #RRGGBBAA or a color name.
        #[arg(long, default_value = "blue")]
        color: String,
    },

    /// List classes.
    List,

    /// Rename or recolor a class.
    Edit {
        /// Class id, id prefix or name.
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a class. Tasks filed under it become unassigned.
    Delete {
        /// Class id, id prefix or name.
        id: String,
    },
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// First block of a UUID, enough to type back as a prefix.
fn short_id(id: impl ToString) -> String {
    id.to_string().chars().take(8).collect()
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

fn resolve_class<S: SlotStore>(ct: &Controller<S>, input: &str) -> Result<ClassId, CrudError> {
    Ok(ct.db().resolve_class(input)?)
}

/// Print task rows as a table.
pub fn print_rows(rows: &[TaskRow<'_>]) {
    println!(
        "{:<9} {:<4} {:<10} {:<10} {:<16} {}",
        "ID", "Done", "Due", "When", "Class", "Title"
    );
    let today = today();
    for row in rows {
        let class = match (row.class, row.is_dangling()) {
            (Some(c), _) => format!("{} {}", c.color, truncate(&c.name, 8)),
            (None, true) => "(deleted)".to_string(),
            (None, false) => "-".to_string(),
        };
        println!(
            "{:<9} {:<4} {:<10} {:<10} {:<16} {}",
            short_id(row.task.id),
            if row.task.is_completed { "[x]" } else { "[ ]" },
            row.task.due_date,
            format_due_relative(row.task.due_date, today),
            class,
            row.task.title
        );
    }
}

pub fn cmd_task<S: SlotStore>(ct: &mut Controller<S>, action: TaskAction) -> Result<(), CrudError> {
    match action {
        TaskAction::Add { title, due, class } => {
            let due_date = parse_due(&due, today())?;
            let assigned_class_id = match class.as_deref() {
                Some(c) => Some(resolve_class(ct, c)?),
                None => None,
            };
            let id = ct.add_task(TaskDraft {
                title,
                due_date,
                assigned_class_id,
            })?;
            println!("Added task {}", short_id(id));
        }

        TaskAction::List { hide_completed, limit } => {
            ct.set_show_completed(!hide_completed);
            let mut rows = ct.visible_rows();
            if let Some(n) = limit {
                rows.truncate(n);
            }
            print_rows(&rows);
        }

        TaskAction::Edit { id, title, due, class, no_class } => {
            let id = ct.db().resolve_task(&id)?;
            let due_date = due.as_deref().map(|d| parse_due(d, today())).transpose()?;
            let class_id = match class.as_deref() {
                Some(c) => Some(resolve_class(ct, c)?),
                None => None,
            };
            let draft = ct.select_task(id)?;
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(due_date) = due_date {
                draft.due_date = due_date;
            }
            if no_class {
                draft.assigned_class_id = None;
            } else if class_id.is_some() {
                draft.assigned_class_id = class_id;
            }
            ct.commit_task()?;
            println!("Updated {}", short_id(id));
        }

        TaskAction::Complete { id } => {
            let id = ct.db().resolve_task(&id)?;
            ct.set_task_completed(id, true)?;
            println!("Marked done.");
        }

        TaskAction::Reopen { id } => {
            let id = ct.db().resolve_task(&id)?;
            ct.set_task_completed(id, false)?;
            println!("Reopened {}", short_id(id));
        }

        TaskAction::Delete { id } => {
            let id = ct.db().resolve_task(&id)?;
            let task = ct.delete_task(id)?;
            println!("Deleted '{}'.", task.title);
        }
    }
    Ok(())
}

fn parse_color(input: &str) -> Result<Rgba, CrudError> {
    input.parse::<Rgba>().map_err(|e| {
        eprintln!("Known colors: {}", color_names().collect::<Vec<_>>().join(", "));
        e.into()
    })
}

pub fn cmd_class<S: SlotStore>(ct: &mut Controller<S>, action: ClassAction) -> Result<(), CrudError> {
    match action {
        ClassAction::Add { name, color } => {
            let color = parse_color(&color)?;
            let id = ct.add_class(ClassDraft { name, color })?;
            println!("Added class {}", short_id(id));
        }

        ClassAction::List => {
            println!("{:<9} {:<10} {}", "ID", "Color", "Name");
            for class in ct.db().classes() {
                println!("{:<9} {:<10} {}", short_id(class.id), class.color, class.name);
            }
        }

        ClassAction::Edit { id, name, color } => {
            let id = resolve_class(ct, &id)?;
            let color = color.as_deref().map(parse_color).transpose()?;
            let draft = ct.select_class(id)?;
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(color) = color {
                draft.color = color;
            }
            ct.commit_class()?;
            println!("Updated {}", short_id(id));
        }

        ClassAction::Delete { id } => {
            let id = resolve_class(ct, &id)?;
            let deletion = ct.delete_class(id)?;
            println!("Deleted class '{}'.", deletion.class.name);
            if !deletion.dangling.is_empty() {
                println!(
                    "{} task(s) were filed under it and are now unassigned.",
                    deletion.dangling.len()
                );
            }
        }
    }
    Ok(())
}

pub fn cmd_sort<S: SlotStore>(ct: &mut Controller<S>, key: SortKey, descending: bool) {
    ct.set_sort(SortPreference {
        key,
        ascending: !descending,
    });
    println!(
        "Sorting by {} ({}).",
        key,
        if descending { "descending" } else { "ascending" }
    );
}

/// Per-class open/done counts. Unassigned and orphaned tasks share one row.
pub fn cmd_summary<S: SlotStore>(ct: &Controller<S>) {
    let db = ct.db();
    let count = |open: bool, id: Option<ClassId>| {
        db.tasks()
            .iter()
            .filter(|t| t.is_completed != open)
            .filter(|t| match id {
                Some(id) => t.assigned_class_id == Some(id),
                None => db.class_for(t).is_none(),
            })
            .count()
    };

    println!("{:<16} {:>5} {:>5}", "Class", "Open", "Done");
    for class in db.classes() {
        println!(
            "{:<16} {:>5} {:>5}",
            truncate(&class.name, 16),
            count(true, Some(class.id)),
            count(false, Some(class.id))
        );
    }
    println!("{:<16} {:>5} {:>5}", "(no class)", count(true, None), count(false, None));
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("Mathematics", 16), "Mathematics");
        assert_eq!(truncate("Mathematics", 5), "Math…");
        assert_eq!(truncate("", 3), "");
    }

    #[test]
    fn short_id_is_first_block() {
        let id = ClassId::new();
        let short = short_id(id);
        assert_eq!(short.len(), 8);
        assert!(id.to_string().starts_with(&short));
    }
}
