//! Class entity: a named, colored category that tasks can point at.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::{self, Rgba};

/// Opaque identity of a [`Class`]. Freshly random, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(Uuid);

impl ClassId {
    pub fn new() -> Self {
        ClassId(Uuid::new_v4())
    }
}

impl Default for ClassId {
    fn default() -> Self {
        ClassId::new()
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ClassId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(ClassId)
    }
}

/// A user-defined category with a display color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub id: ClassId,
    pub name: String,
    #[serde(default, deserialize_with = "color::deserialize_or_default")]
    pub color: Rgba,
}

impl Class {
    pub fn new(name: impl Into<String>, color: Rgba) -> Self {
        Class {
            id: ClassId::new(),
            name: name.into(),
            color,
        }
    }
}
