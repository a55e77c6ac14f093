//! Error types shared across the store, the codec and the CRUD controller.
//!
//! Persistence failures never reach a caller: the store recovers from a
//! [`CorruptDataError`] locally and only logs failed writes. Everything a user
//! can get wrong surfaces as a [`ValidationError`], wrapped by [`CrudError`]
//! at the controller boundary.

use crate::class::ClassId;
use crate::task::TaskId;

/// A stored value could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum CorruptDataError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("color component `{field}` is not a finite value in [0, 1]: {value}")]
    ColorComponent { field: &'static str, value: f64 },
    #[error("unknown sort key token: {0:?}")]
    SortKeyToken(String),
}

/// User input rejected before anything is mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("task title cannot be empty")]
    EmptyTitle,
    #[error("class name cannot be empty")]
    EmptyName,
    #[error("no {kind} matches '{input}'")]
    UnknownIdentifier { kind: &'static str, input: String },
    #[error("'{input}' matches several {kind}s:\n{candidates}\nPlease use the id instead.")]
    AmbiguousIdentifier {
        kind: &'static str,
        input: String,
        candidates: String,
    },
    #[error("cannot understand due date '{0}'")]
    Date(String),
    #[error("cannot understand color '{0}' (use #RRGGBB, #RRGGBBAA or a color name)")]
    Color(String),
    #[error("class color cannot be stored: {0}")]
    UnstorableColor(String),
}

/// Failure of a controller operation. Nothing was persisted when one is returned.
#[derive(Debug, thiserror::Error)]
pub enum CrudError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    #[error("class not found: {0}")]
    ClassNotFound(ClassId),
    #[error("no {0} is being composed or edited")]
    NothingStaged(&'static str),
    #[error("{0} staging area holds a different workflow")]
    WrongStage(&'static str),
}
