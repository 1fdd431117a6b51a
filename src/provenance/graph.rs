//! In-memory provenance graph: load an append-only JSONL log and answer
//! lineage queries.
//!
//! Loading is resilient by default: a missing log is an empty graph, and a
//! malformed line is skipped rather than failing the load. The log is
//! appended externally over a long-running period, so partial corruption
//! must not cost the valid records. Queries are linear scans returning
//! results in log order.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::error::{ProvenanceError, ProvenanceResult};

use super::{GraphStats, Record, TRANSCRIPT_SOURCE_TYPE, TraceResult};

/// Read-only view over one provenance log, frozen at load time.
#[derive(Debug, Default)]
pub struct ProvenanceGraph {
    records: Vec<Record>,
    skipped_lines: usize,
}

impl ProvenanceGraph {
    /// Load a graph from the log at `path`, skipping malformed lines.
    ///
    /// A missing file yields an empty graph; an existing but unreadable
    /// file is an error. Records are retained in file order.
    pub fn load(path: &Path) -> ProvenanceResult<Self> {
        Self::load_inner(path, false)
    }

    /// Load a graph from the log at `path`, failing on any malformed line.
    pub fn load_strict(path: &Path) -> ProvenanceResult<Self> {
        Self::load_inner(path, true)
    }

    fn load_inner(path: &Path, strict: bool) -> ProvenanceResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ProvenanceError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        let mut records = Vec::new();
        let mut skipped_lines = 0usize;
        for (i, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<Record>(line) {
                Ok(record) => records.push(record),
                Err(e) if strict => {
                    return Err(ProvenanceError::MalformedLine {
                        path: path.display().to_string(),
                        line: i + 1,
                        message: e.to_string(),
                    });
                }
                Err(e) => {
                    skipped_lines += 1;
                    tracing::debug!(
                        line = i + 1,
                        error = %e,
                        "skipping malformed provenance line"
                    );
                }
            }
        }

        Ok(Self {
            records,
            skipped_lines,
        })
    }

    /// All loaded records, in log order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of malformed lines skipped during a lenient load.
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    /// Trace the lineage chain of an artifact.
    ///
    /// Matches records by full path first (literal or absolute-resolved);
    /// only if nothing matched, falls back to base-filename comparison.
    /// An empty chain is a valid answer, not an error.
    pub fn trace(&self, artifact_path: &str) -> TraceResult {
        let mut chain: Vec<Record> = self
            .records
            .iter()
            .filter(|r| paths_match(&r.artifact_path, artifact_path))
            .cloned()
            .collect();

        if chain.is_empty() {
            chain = self
                .records
                .iter()
                .filter(|r| file_names_match(&r.artifact_path, artifact_path))
                .cloned()
                .collect();
        }

        let transcript_sources = chain
            .iter()
            .filter(|r| r.source_type == TRANSCRIPT_SOURCE_TYPE)
            .map(|r| r.source_path.clone())
            .collect();

        TraceResult {
            artifact_path: artifact_path.to_string(),
            chain,
            transcript_sources,
        }
    }

    /// All records correlated to the given working session, in log order.
    ///
    /// Exact string equality on `session_id`, no normalization. An empty
    /// session id never matches anything.
    pub fn find_by_session(&self, session_id: &str) -> Vec<&Record> {
        if session_id.is_empty() {
            return Vec::new();
        }
        self.records
            .iter()
            .filter(|r| r.session_id.as_deref() == Some(session_id))
            .collect()
    }

    /// All records derived from the given source path, in log order.
    ///
    /// Matches literal or absolute-resolved paths; unlike [`trace`] there
    /// is no filename fallback.
    ///
    /// [`trace`]: Self::trace
    pub fn find_by_source(&self, source_path: &str) -> Vec<&Record> {
        self.records
            .iter()
            .filter(|r| paths_match(&r.source_path, source_path))
            .collect()
    }

    /// Aggregate counts over the loaded records.
    pub fn stats(&self) -> GraphStats {
        let mut artifact_types: BTreeMap<String, usize> = BTreeMap::new();
        let mut source_types: BTreeMap<String, usize> = BTreeMap::new();
        let mut sessions: BTreeSet<&str> = BTreeSet::new();

        for record in &self.records {
            *artifact_types
                .entry(record.artifact_type.clone())
                .or_default() += 1;
            *source_types.entry(record.source_type.clone()).or_default() += 1;
            if let Some(session) = record.session_id.as_deref() {
                if !session.is_empty() {
                    sessions.insert(session);
                }
            }
        }

        GraphStats {
            total_records: self.records.len(),
            artifact_types,
            source_types,
            distinct_sessions: sessions.len(),
        }
    }
}

/// Whether two path strings refer to the same location: literal equality,
/// or equality after lexical absolute resolution. If either side fails to
/// resolve, only the literal comparison counts.
fn paths_match(recorded: &str, queried: &str) -> bool {
    if recorded == queried {
        return true;
    }
    match (std::path::absolute(recorded), std::path::absolute(queried)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Whether two path strings share a base filename.
fn file_names_match(recorded: &str, queried: &str) -> bool {
    match (
        Path::new(recorded).file_name(),
        Path::new(queried).file_name(),
    ) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
