//! Artifact root discovery and directory layout for seshat projects.
//!
//! A project's artifact root is the `.seshat` directory found by walking
//! parent directories upward; the known artifact subdirectories and the
//! provenance log all live under it.

use std::path::{Path, PathBuf};

/// Marker subdirectory naming the artifact root.
pub const ROOT_MARKER: &str = ".seshat";

/// Subdirectory holding structured learning records.
pub const LEARNINGS_DIR: &str = "learnings";

/// Subdirectory holding human-authored pattern documents.
pub const PATTERNS_DIR: &str = "patterns";

/// Known artifact subdirectories, in resolution order.
pub const ARTIFACT_DIRS: [&str; 2] = [LEARNINGS_DIR, PATTERNS_DIR];

/// Known artifact file extensions, in resolution order.
pub const KNOWN_EXTENSIONS: [&str; 2] = ["jsonl", "md"];

/// Provenance log filename under the artifact root.
pub const LOG_FILE: &str = "provenance.jsonl";

/// Directory layout of one artifact root.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    root: PathBuf,
}

impl ArtifactPaths {
    /// Walk upward from `start_dir` to the nearest directory containing a
    /// `.seshat` marker; that marker directory is the artifact root.
    ///
    /// Without a marker anywhere up the tree, `start_dir` itself is treated
    /// as the root, so bare `learnings/` + `patterns/` layouts still resolve.
    pub fn discover(start_dir: &Path) -> Self {
        for dir in start_dir.ancestors() {
            let marker = dir.join(ROOT_MARKER);
            if marker.is_dir() {
                return Self { root: marker };
            }
        }
        Self {
            root: start_dir.to_path_buf(),
        }
    }

    /// Use `root` directly as the artifact root, skipping discovery.
    pub fn at(root: PathBuf) -> Self {
        Self { root }
    }

    /// The artifact root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `root/learnings/`
    pub fn learnings_dir(&self) -> PathBuf {
        self.root.join(LEARNINGS_DIR)
    }

    /// `root/patterns/`
    pub fn patterns_dir(&self) -> PathBuf {
        self.root.join(PATTERNS_DIR)
    }

    /// `root/provenance.jsonl`
    pub fn log_file(&self) -> PathBuf {
        self.root.join(LOG_FILE)
    }

    /// The known artifact directories under this root, in resolution order.
    pub fn artifact_dirs(&self) -> impl Iterator<Item = PathBuf> + '_ {
        ARTIFACT_DIRS.iter().map(|d| self.root.join(d))
    }

    /// Every regular file across the known artifact directories.
    ///
    /// Directories are visited in fixed order and entries within each are
    /// sorted by filename, so the result is deterministic for a given
    /// filesystem state. Missing or unreadable directories contribute
    /// nothing. No filtering by extension or content.
    pub fn discover_all(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for dir in self.artifact_dirs() {
            files.extend(sorted_files(&dir));
        }
        files
    }
}

/// Regular files directly under `dir`, sorted by filename.
///
/// Unreadable or missing directories yield an empty list.
pub(crate) fn sorted_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .map(|e| e.path())
            .collect(),
        Err(_) => Vec::new(),
    };
    files.sort();
    files
}
