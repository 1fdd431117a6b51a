//! End-to-end integration tests for seshat.
//!
//! These tests exercise root discovery, identifier resolution, and lineage
//! queries together over a realistic temporary project tree, validating
//! that the paths, resolver, and provenance graph APIs all work together.

use std::path::PathBuf;

use seshat::paths::ArtifactPaths;
use seshat::provenance::ProvenanceGraph;
use seshat::resolve::Resolver;

/// Build a project tree with a `.seshat` root, artifact files, and a
/// provenance log whose records point at those files.
///
/// Layout:
/// ```text
/// work/
///   .seshat/
///     learnings/L001.jsonl
///     patterns/retry-backoff.md   (frontmatter id: pat-retry)
///     provenance.jsonl
///   src/deep/                     (working directory for discovery)
/// ```
fn project_tree() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::TempDir::new().unwrap();
    let work = dir.path().join("work");
    let root = work.join(".seshat");
    let learnings = root.join("learnings");
    let patterns = root.join("patterns");
    std::fs::create_dir_all(&learnings).unwrap();
    std::fs::create_dir_all(&patterns).unwrap();
    std::fs::create_dir_all(work.join("src").join("deep")).unwrap();

    std::fs::write(
        learnings.join("L001.jsonl"),
        "{\"lesson\": \"prefer idempotent retries\"}\n",
    )
    .unwrap();
    std::fs::write(
        patterns.join("retry-backoff.md"),
        "---\nid: pat-retry\ntitle: Retry with backoff\n---\n\nBack off exponentially.\n",
    )
    .unwrap();

    let learning_path = learnings.join("L001.jsonl");
    let transcript = dir.path().join("transcripts").join("t-001.jsonl");
    let session_summary = work.join("out").join("session-001.md");

    let lines = [
        serde_json::json!({
            "id": "rec-001",
            "artifact_path": session_summary.display().to_string(),
            "artifact_type": "session",
            "source_path": transcript.display().to_string(),
            "source_type": "transcript",
            "session_id": "s-001",
            "created_at": "2026-07-14T09:30:00Z",
        }),
        serde_json::json!({
            "id": "rec-002",
            "artifact_path": learning_path.display().to_string(),
            "artifact_type": "learning",
            "source_path": session_summary.display().to_string(),
            "source_type": "session",
            "session_id": "s-001",
            "created_at": "2026-07-14T09:31:00Z",
            "metadata": {"confidence": 0.9},
        }),
        serde_json::json!({
            "id": "rec-003",
            "artifact_path": learning_path.display().to_string(),
            "artifact_type": "learning",
            "source_path": transcript.display().to_string(),
            "source_type": "transcript",
            "session_id": "s-002",
            "created_at": "2026-07-15T11:02:00Z",
        }),
    ];
    let log: String = lines.iter().map(|l| format!("{l}\n")).collect();
    std::fs::write(root.join("provenance.jsonl"), log).unwrap();

    (dir, work)
}

#[test]
fn discovery_from_nested_dir_finds_the_same_root() {
    let (_dir, work) = project_tree();

    let from_work = ArtifactPaths::discover(&work);
    let from_nested = ArtifactPaths::discover(&work.join("src").join("deep"));
    assert_eq!(from_work.root(), from_nested.root());
    assert_eq!(from_work.root(), work.join(".seshat").as_path());
}

#[test]
fn resolve_then_trace_round_trip() {
    let (_dir, work) = project_tree();

    // Resolve from a nested working directory, as the CLI would.
    let resolver = Resolver::new(&work.join("src").join("deep"));
    let resolved = resolver.resolve("L001").unwrap();
    assert!(resolved.to_str().unwrap().ends_with("L001.jsonl"));

    // Trace the resolved artifact through the log next to it.
    let graph = ProvenanceGraph::load(&resolver.paths().log_file()).unwrap();
    let lineage = graph.trace(&resolved.display().to_string());

    assert_eq!(lineage.chain.len(), 2);
    assert_eq!(lineage.chain[0].id, "rec-002");
    assert_eq!(lineage.chain[1].id, "rec-003");
    // Only the transcript-typed record contributes a root source.
    assert_eq!(lineage.transcript_sources.len(), 1);
    assert!(lineage.transcript_sources[0].ends_with("t-001.jsonl"));
}

#[test]
fn frontmatter_and_pending_namespaces_name_the_same_file() {
    let (_dir, work) = project_tree();
    let resolver = Resolver::new(&work);

    let by_frontmatter = resolver.resolve("pat-retry").unwrap();
    let by_pending = resolver.resolve("pend-pat-retry").unwrap();
    assert_eq!(by_frontmatter, by_pending);
    assert!(by_frontmatter.to_str().unwrap().ends_with("retry-backoff.md"));
}

#[test]
fn session_and_source_queries_agree_with_the_log() {
    let (_dir, work) = project_tree();
    let paths = ArtifactPaths::discover(&work);
    let graph = ProvenanceGraph::load(&paths.log_file()).unwrap();

    let session = graph.find_by_session("s-001");
    assert_eq!(session.len(), 2);
    assert_eq!(session[0].id, "rec-001");
    assert_eq!(session[1].id, "rec-002");

    let transcript = graph.records()[0].source_path.clone();
    let derived = graph.find_by_source(&transcript);
    assert_eq!(derived.len(), 2);
    assert_eq!(derived[0].id, "rec-001");
    assert_eq!(derived[1].id, "rec-003");
}

#[test]
fn stats_over_a_realistic_log() {
    let (_dir, work) = project_tree();
    let paths = ArtifactPaths::discover(&work);
    let graph = ProvenanceGraph::load(&paths.log_file()).unwrap();

    let stats = graph.stats();
    assert_eq!(stats.total_records, 3);
    assert_eq!(stats.artifact_types.get("session"), Some(&1));
    assert_eq!(stats.artifact_types.get("learning"), Some(&2));
    assert_eq!(stats.source_types.get("transcript"), Some(&2));
    assert_eq!(stats.source_types.get("session"), Some(&1));
    assert_eq!(stats.distinct_sessions, 2);
}

#[test]
fn discover_all_lists_every_artifact_exactly_once() {
    let (_dir, work) = project_tree();
    let paths = ArtifactPaths::discover(&work);

    let files = paths.discover_all();
    let names: Vec<_> = files
        .iter()
        .map(|f| f.file_name().unwrap().to_str().unwrap())
        .collect();
    assert_eq!(names, vec!["L001.jsonl", "retry-backoff.md"]);
}

#[test]
fn missing_log_means_no_provenance_yet() {
    let dir = tempfile::TempDir::new().unwrap();
    let paths = ArtifactPaths::discover(dir.path());

    let graph = ProvenanceGraph::load(&paths.log_file()).unwrap();
    assert!(graph.trace("anything").is_empty());
    assert_eq!(graph.stats().total_records, 0);
}

#[test]
fn resolver_error_is_presentable_verbatim() {
    let dir = tempfile::TempDir::new().unwrap();
    let resolver = Resolver::new(dir.path());

    let err = resolver.resolve("pend-ghost").unwrap_err();
    assert_eq!(format!("{err}"), "artifact \"pend-ghost\" not found");
}

#[test]
fn explicit_root_bypasses_discovery() {
    let (_dir, work) = project_tree();
    let root = work.join(".seshat");

    let resolver = Resolver::with_paths(ArtifactPaths::at(root.clone()));
    let resolved = resolver.resolve("L001").unwrap();
    assert_eq!(resolved, root.join("learnings").join("L001.jsonl"));
}
