//! Enumerations shared between the CLI and the store.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::CorruptDataError;

/// Field a task list can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Case-sensitive lexicographic order of titles.
    Title,
    /// Chronological order of due dates.
    #[default]
    DueDate,
}

impl SortKey {
    /// Token stored in the `sortByKey` slot.
    pub fn token(self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::DueDate => "dueDate",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for SortKey {
    type Err = CorruptDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(SortKey::Title),
            "dueDate" => Ok(SortKey::DueDate),
            other => Err(CorruptDataError::SortKeyToken(other.to_string())),
        }
    }
}

/// Persisted choice of sort key and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortPreference {
    pub key: SortKey,
    pub ascending: bool,
}

impl Default for SortPreference {
    fn default() -> Self {
        SortPreference {
            key: SortKey::DueDate,
            ascending: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_round_trip() {
        for key in [SortKey::Title, SortKey::DueDate] {
            assert_eq!(key.token().parse::<SortKey>().unwrap(), key);
        }
        assert!("priority".parse::<SortKey>().is_err());
    }

    #[test]
    fn default_is_due_date_ascending() {
        let pref = SortPreference::default();
        assert_eq!(pref.key, SortKey::DueDate);
        assert!(pref.ascending);
    }
}
