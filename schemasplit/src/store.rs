//! File stores that exploded trees are written to and read from.
//!
//! Paths are always relative and `/`-separated, regardless of platform.
//! Discovery takes a glob pattern relative to the store root:
//!
//! - `*` matches within one path component
//! - `**/` matches zero or more directories
//!
//! Results are returned sorted so explode and implode are deterministic.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::trace;

use crate::error::{SplitError, SplitResult};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Storage consumed by explode and implode.
pub trait FileStore {
    /// Relative paths of all files matching `pattern`, sorted.
    fn find(&self, pattern: &str) -> SplitResult<Vec<String>>;

    /// Read a whole file as UTF-8 text.
    fn read(&self, path: &str) -> SplitResult<String>;

    /// Write a whole file, creating parent directories as needed.
    fn write(&mut self, path: &str, contents: &str) -> SplitResult<()>;
}

fn compile(pattern: &str) -> SplitResult<Pattern> {
    Pattern::new(pattern).map_err(|e| SplitError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// A store rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        path.split('/')
            .fold(self.root.clone(), |acc, segment| acc.join(segment))
    }

    /// Whether the root exists and contains at least one entry.
    pub fn is_populated(&self) -> bool {
        fs::read_dir(&self.root)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
    }
}

impl FileStore for FsStore {
    fn find(&self, pattern: &str) -> SplitResult<Vec<String>> {
        let pattern = compile(pattern)?;
        let mut found = Vec::new();
        if !self.root.is_dir() {
            return Ok(found);
        }
        collect_matches(&self.root, "", &pattern, &mut found)?;
        found.sort();
        trace!(pattern = %pattern, count = found.len(), "Discovered files");
        Ok(found)
    }

    fn read(&self, path: &str) -> SplitResult<String> {
        let full = self.resolve(path);
        fs::read_to_string(&full).map_err(|source| SplitError::ReadFailed { path: full, source })
    }

    fn write(&mut self, path: &str, contents: &str) -> SplitResult<()> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|source| SplitError::WriteFailed {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&full, contents).map_err(|source| SplitError::WriteFailed { path: full, source })
    }
}

/// Recursively walk `dir`, collecting relative file paths matching `pattern`.
fn collect_matches(
    dir: &Path,
    prefix: &str,
    pattern: &Pattern,
    found: &mut Vec<String>,
) -> SplitResult<()> {
    let entries = fs::read_dir(dir).map_err(|source| SplitError::ReadFailed {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| SplitError::ReadFailed {
            path: dir.to_path_buf(),
            source,
        })?;
        let name = entry.file_name().to_string_lossy().to_string();
        let relative = if prefix.is_empty() {
            name
        } else {
            format!("{}/{}", prefix, name)
        };

        let path = entry.path();
        if path.is_dir() {
            collect_matches(&path, &relative, pattern, found)?;
        } else if pattern.matches_with(&relative, MATCH_OPTIONS) {
            found.push(relative);
        }
    }

    Ok(())
}

/// A store held entirely in memory, used for round-trip checks and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    files: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files written.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Contents of one file, if present.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// All files in path order.
    pub fn files(&self) -> &BTreeMap<String, String> {
        &self.files
    }

    /// Remove a file, returning its contents.
    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.files.remove(path)
    }
}

impl FileStore for MemoryStore {
    fn find(&self, pattern: &str) -> SplitResult<Vec<String>> {
        let pattern = compile(pattern)?;
        Ok(self
            .files
            .keys()
            .filter(|path| pattern.matches_with(path, MATCH_OPTIONS))
            .cloned()
            .collect())
    }

    fn read(&self, path: &str) -> SplitResult<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| SplitError::ReadFailed {
                path: PathBuf::from(path),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            })
    }

    fn write(&mut self, path: &str, contents: &str) -> SplitResult<()> {
        self.files.insert(path.to_string(), contents.to_string());
        Ok(())
    }
}
