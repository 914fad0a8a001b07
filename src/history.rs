//! Recently written output files, most recent first.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::output::write_atomic;

/// Bounded most-recent-first list persisted as a JSON array of paths.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentFiles {
    path: PathBuf,
    limit: usize,
    entries: Vec<PathBuf>,
}

impl RecentFiles {
    pub fn new(path: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            path: path.into(),
            limit,
            entries: Vec::new(),
        }
    }

    /// Load the list at `path`. A missing file gives an empty list; an
    /// unreadable or malformed one is logged and also gives an empty list.
    pub fn load(path: impl Into<PathBuf>, limit: usize) -> Self {
        let mut recent = Self::new(path, limit);
        if !recent.path.exists() {
            return recent;
        }

        let parsed = fs::read_to_string(&recent.path)
            .map_err(|e| e.to_string())
            .and_then(|data| serde_json::from_str::<Vec<PathBuf>>(&data).map_err(|e| e.to_string()));

        match parsed {
            Ok(mut entries) => {
                entries.truncate(limit);
                recent.entries = entries;
            }
            Err(e) => log::warn!("could not load recent files from {}: {}", recent.path.display(), e),
        }
        recent
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Move `file` to the front, dropping any older copy and anything past
    /// the limit.
    pub fn add(&mut self, file: impl Into<PathBuf>) {
        let file = file.into();
        self.entries.retain(|p| *p != file);
        self.entries.insert(0, file);
        self.entries.truncate(self.limit);
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        write_atomic(&self.path, json.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_moves_to_front_and_truncates() {
        let mut recent = RecentFiles::new("unused.json", 3);
        for name in ["a.png", "b.png", "c.png", "a.png", "d.png"] {
            recent.add(name);
        }
        let names: Vec<_> = recent.entries().iter().map(|p| p.to_str().unwrap()).collect();
        assert_eq!(names, vec!["d.png", "a.png", "c.png"]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("recent.json");

        let mut recent = RecentFiles::new(&path, 10);
        recent.add("out/one.png");
        recent.add("out/二.jpg");
        recent.save().unwrap();

        let loaded = RecentFiles::load(&path, 10);
        assert_eq!(loaded, recent);
    }

    #[test]
    fn test_load_respects_smaller_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recent.json");
        fs::write(&path, r#"["a", "b", "c"]"#).unwrap();
        assert_eq!(RecentFiles::load(&path, 2).entries().len(), 2);
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recent.json");
        fs::write(&path, "{oops").unwrap();
        assert!(RecentFiles::load(&path, 10).entries().is_empty());
        assert!(RecentFiles::load(dir.path().join("missing.json"), 10).entries().is_empty());
    }
}
