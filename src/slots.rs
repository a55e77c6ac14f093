//! Key-value persistence slots.
//!
//! A slot is a named durable value. [`FileSlots`] keeps one JSON file per slot
//! in a data directory and replaces it atomically on every write;
//! [`MemorySlots`] keeps them in a map for tests and embedding.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Slot holding the serialized class collection.
pub const CLASSES: &str = "classes";
/// Slot holding the serialized task collection.
pub const TASKS: &str = "tasks";
/// Slot holding the sort key token.
pub const SORT_BY: &str = "sortByKey";
/// Slot holding the ascending flag.
pub const SORT_ASCENDING: &str = "sortOrderAscendingKey";

/// Durable string storage addressed by slot name.
pub trait SlotStore {
    /// Read a slot, `Ok(None)` when it has never been written.
    fn read_slot(&self, key: &str) -> io::Result<Option<String>>;

    /// Replace the whole content of a slot.
    fn write_slot(&mut self, key: &str, contents: &str) -> io::Result<()>;
}

/// Slots stored as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileSlots {
    dir: PathBuf,
}

impl FileSlots {
    /// Use `dir` as the slot directory, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(FileSlots { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SlotStore for FileSlots {
    fn read_slot(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write_slot(&mut self, key: &str, contents: &str) -> io::Result<()> {
        // Temp file + rename keeps the previous content intact on a failed write.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let written = File::create(&tmp).and_then(|mut f| {
            f.write_all(contents.as_bytes())?;
            f.sync_all()?;
            fs::rename(&tmp, &path)
        });
        if written.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        written
    }
}

/// Slots held in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemorySlots {
    slots: HashMap<String, String>,
}

impl MemorySlots {
    pub fn new() -> Self {
        MemorySlots::default()
    }
}

impl SlotStore for MemorySlots {
    fn read_slot(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn write_slot(&mut self, key: &str, contents: &str) -> io::Result<()> {
        self.slots.insert(key.to_string(), contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_slot_write_then_read() {
        let dir = TempDir::new().unwrap();
        let mut slots = FileSlots::open(dir.path()).unwrap();
        slots.write_slot(TASKS, "[1]").unwrap();
        slots.write_slot(TASKS, "[2]").unwrap();
        assert_eq!(slots.read_slot(TASKS).unwrap().as_deref(), Some("[2]"));
        assert!(slots.path_for(TASKS).exists());
        assert!(!slots.path_for(TASKS).with_extension("json.tmp").exists());
    }

    #[test]
    fn failed_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let mut slots = FileSlots::open(dir.path()).unwrap();
        // A directory where the slot file should go makes the rename fail.
        fs::create_dir(slots.path_for(TASKS)).unwrap();
        fs::write(slots.path_for(TASKS).join("keep"), "x").unwrap();

        assert!(slots.write_slot(TASKS, "[1]").is_err());
        assert!(!slots.path_for(TASKS).with_extension("json.tmp").exists());
        assert!(slots.path_for(TASKS).is_dir());
    }

    #[test]
    fn missing_slot_reads_none() {
        let dir = TempDir::new().unwrap();
        let slots = FileSlots::open(dir.path().join("nested")).unwrap();
        assert!(slots.read_slot(CLASSES).unwrap().is_none());
        assert!(slots.dir().is_dir());
    }

    #[test]
    fn memory_slots_overwrite() {
        let mut slots = MemorySlots::new();
        assert!(slots.read_slot(SORT_BY).unwrap().is_none());
        slots.write_slot(SORT_BY, "\"title\"").unwrap();
        slots.write_slot(SORT_BY, "\"dueDate\"").unwrap();
        assert_eq!(slots.read_slot(SORT_BY).unwrap().as_deref(), Some("\"dueDate\""));
    }
}
