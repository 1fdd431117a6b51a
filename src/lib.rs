//! # seshat
//!
//! Provenance ledger and artifact resolver for agent knowledge workflows.
//!
//! ## Architecture
//!
//! - **Provenance graph** (`provenance`): frozen in-memory view over an
//!   append-only JSONL lineage log, with trace/session/source/stats queries
//! - **Identifier resolver** (`resolve`): ordered fallback strategies mapping
//!   a loose identifier to exactly one file under the artifact root
//! - **Path discovery** (`paths`): upward walk to the `.seshat` artifact root
//!   and deterministic bulk file enumeration
//!
//! ## Library usage
//!
//! ```no_run
//! use std::path::Path;
//! use seshat::provenance::ProvenanceGraph;
//! use seshat::resolve::Resolver;
//!
//! let resolver = Resolver::new(Path::new("."));
//! let artifact = resolver.resolve("L001").unwrap();
//! let graph = ProvenanceGraph::load(&resolver.paths().log_file()).unwrap();
//! let lineage = graph.trace(&artifact.to_string_lossy());
//! ```

pub mod error;
pub mod paths;
pub mod provenance;
pub mod resolve;
