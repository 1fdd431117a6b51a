//! Identifier resolution: map a loose identifier to exactly one artifact file.
//!
//! Strategies run in a fixed order, cheapest first: absolute-path
//! passthrough, exact id + known extension, filename stem, filename
//! substring, frontmatter id, then the same ladder again with a stripped
//! `pend-` prefix. The first hit wins; directory scans are lexically sorted
//! so "first" is stable for a given filesystem state.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ResolveError, ResolveResult};
use crate::paths::{ArtifactPaths, KNOWN_EXTENSIONS, sorted_files};

/// Reserved prefix for references to queued (pending) items.
///
/// Pending references name the same underlying files; the prefix is
/// stripped and resolution re-attempted on the remainder.
pub const PENDING_PREFIX: &str = "pend-";

/// Resolves free-form identifiers against one artifact root.
///
/// Stateless between calls: every resolution is a pure function of the
/// identifier and the current filesystem, safe to repeat and to run
/// concurrently from independent processes.
#[derive(Debug, Clone)]
pub struct Resolver {
    paths: ArtifactPaths,
}

impl Resolver {
    /// Build a resolver rooted at the artifact root discovered from
    /// `start_dir` (see [`ArtifactPaths::discover`]).
    pub fn new(start_dir: &Path) -> Self {
        Self {
            paths: ArtifactPaths::discover(start_dir),
        }
    }

    /// Build a resolver over an explicit directory layout.
    pub fn with_paths(paths: ArtifactPaths) -> Self {
        Self { paths }
    }

    /// The directory layout this resolver searches.
    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    /// Resolve `identifier` to exactly one file, or fail with a not-found
    /// error naming the identifier.
    pub fn resolve(&self, identifier: &str) -> ResolveResult<PathBuf> {
        let as_path = Path::new(identifier);
        if as_path.is_absolute() && as_path.is_file() {
            return Ok(as_path.to_path_buf());
        }

        if let Some(found) = self.resolve_in_dirs(identifier) {
            return Ok(found);
        }

        if let Some(stripped) = identifier.strip_prefix(PENDING_PREFIX) {
            if let Some(found) = self.resolve_in_dirs(stripped) {
                return Ok(found);
            }
        }

        Err(ResolveError::NotFound {
            identifier: identifier.to_string(),
        })
    }

    /// The filename and content strategies, over every known artifact
    /// directory in resolution order.
    fn resolve_in_dirs(&self, identifier: &str) -> Option<PathBuf> {
        // Exact id + known extension: a direct existence probe, no scan.
        for dir in self.paths.artifact_dirs() {
            for ext in KNOWN_EXTENSIONS {
                let candidate = dir.join(format!("{identifier}.{ext}"));
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }

        // Full filename stem, any extension.
        for dir in self.paths.artifact_dirs() {
            for file in sorted_files(&dir) {
                if file.file_stem().and_then(|s| s.to_str()) == Some(identifier) {
                    return Some(file);
                }
            }
        }

        // Filename substring.
        for dir in self.paths.artifact_dirs() {
            for file in sorted_files(&dir) {
                let matched = file
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.contains(identifier));
                if matched {
                    return Some(file);
                }
            }
        }

        // Frontmatter id. Opens file contents, so it runs only after every
        // filename strategy has failed.
        for dir in self.paths.artifact_dirs() {
            for file in sorted_files(&dir) {
                if file.extension().and_then(|e| e.to_str()) != Some("md") {
                    continue;
                }
                if frontmatter_id(&file).as_deref() == Some(identifier) {
                    return Some(file);
                }
            }
        }

        None
    }
}

/// Frontmatter header fields seshat understands. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct Frontmatter {
    #[serde(default)]
    id: Option<String>,
}

/// Extract the declared `id` from a `---`-fenced YAML header, if any.
///
/// Unreadable files, missing fences, and unparseable headers all yield
/// `None`: a candidate that cannot declare an id simply does not match.
fn frontmatter_id(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let mut lines = content.lines();
    if lines.next()?.trim_end() != "---" {
        return None;
    }

    let mut header = String::new();
    for line in lines {
        if line.trim_end() == "---" {
            let parsed: Frontmatter = serde_yaml::from_str(&header).ok()?;
            return parsed.id;
        }
        header.push_str(line);
        header.push('\n');
    }
    None
}
