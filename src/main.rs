//! seshat CLI: provenance ledger queries and artifact resolution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use seshat::paths::ArtifactPaths;
use seshat::provenance::{ProvenanceGraph, Record};
use seshat::resolve::Resolver;

#[derive(Parser)]
#[command(
    name = "seshat",
    version,
    about = "Provenance ledger and artifact resolver"
)]
struct Cli {
    /// Starting directory for artifact-root discovery.
    #[arg(long, global = true, default_value = ".")]
    dir: PathBuf,

    /// Explicit artifact root, skipping discovery.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Provenance log path (default: $SESHAT_LOG, then <root>/provenance.jsonl).
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Fail loading on any malformed log line instead of skipping it.
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trace the lineage chain of an artifact.
    Trace {
        /// Artifact path to trace.
        artifact: String,

        /// Emit the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List all records correlated to a working session.
    Session {
        /// Exact session identifier.
        session_id: String,

        /// Emit the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List all records derived from a source file.
    Source {
        /// Source path.
        source_path: String,

        /// Emit the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show aggregate statistics over the provenance log.
    Stats {
        /// Emit the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Resolve an identifier to a single artifact file.
    Resolve {
        /// Short id, filename fragment, frontmatter id, pend- reference,
        /// or absolute path.
        identifier: String,
    },

    /// List every file across the known artifact directories.
    List {
        /// Emit the result as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let paths = match &cli.root {
        Some(root) => ArtifactPaths::at(root.clone()),
        None => ArtifactPaths::discover(&cli.dir),
    };

    let log_path = cli
        .log_file
        .clone()
        .or_else(|| std::env::var("SESHAT_LOG").ok().map(PathBuf::from))
        .unwrap_or_else(|| paths.log_file());

    let strict = cli.strict;
    let load = |path: &std::path::Path| -> Result<ProvenanceGraph> {
        let graph = if strict {
            ProvenanceGraph::load_strict(path)
        } else {
            ProvenanceGraph::load(path)
        }
        .into_diagnostic()?;

        if graph.skipped_lines() > 0 {
            tracing::warn!(
                skipped = graph.skipped_lines(),
                log = %path.display(),
                "skipped malformed provenance lines"
            );
        }
        Ok(graph)
    };

    match cli.command {
        Commands::Trace { artifact, json } => {
            let graph = load(&log_path)?;
            let result = graph.trace(&artifact);

            if json {
                let out = serde_json::to_string_pretty(&result).into_diagnostic()?;
                println!("{out}");
            } else if result.is_empty() {
                println!("No lineage recorded for {artifact}");
            } else {
                println!("Lineage for {artifact} ({} records):", result.chain.len());
                print_records(result.chain.iter());
                if !result.transcript_sources.is_empty() {
                    println!(
                        "Transcript sources ({}):",
                        result.transcript_sources.len()
                    );
                    for source in &result.transcript_sources {
                        println!("  {source}");
                    }
                }
            }
        }

        Commands::Session { session_id, json } => {
            let graph = load(&log_path)?;
            let records = graph.find_by_session(&session_id);

            if json {
                let out = serde_json::to_string_pretty(&records).into_diagnostic()?;
                println!("{out}");
            } else if records.is_empty() {
                println!("No records for session {session_id}");
            } else {
                println!("Session {session_id} ({} records):", records.len());
                print_records(records.iter().copied());
            }
        }

        Commands::Source { source_path, json } => {
            let graph = load(&log_path)?;
            let records = graph.find_by_source(&source_path);

            if json {
                let out = serde_json::to_string_pretty(&records).into_diagnostic()?;
                println!("{out}");
            } else if records.is_empty() {
                println!("No records derived from {source_path}");
            } else {
                println!("Derived from {source_path} ({} records):", records.len());
                print_records(records.iter().copied());
            }
        }

        Commands::Stats { json } => {
            let graph = load(&log_path)?;
            let stats = graph.stats();

            if json {
                let out = serde_json::to_string_pretty(&stats).into_diagnostic()?;
                println!("{out}");
            } else {
                println!("Provenance log: {}", log_path.display());
                println!("  records:  {}", stats.total_records);
                println!("  sessions: {}", stats.distinct_sessions);
                if !stats.artifact_types.is_empty() {
                    println!("  artifact types:");
                    for (kind, count) in &stats.artifact_types {
                        println!("    {kind}: {count}");
                    }
                }
                if !stats.source_types.is_empty() {
                    println!("  source types:");
                    for (kind, count) in &stats.source_types {
                        println!("    {kind}: {count}");
                    }
                }
            }
        }

        Commands::Resolve { identifier } => {
            let resolver = Resolver::with_paths(paths);
            let resolved = resolver.resolve(&identifier).into_diagnostic()?;
            println!("{}", resolved.display());
        }

        Commands::List { json } => {
            let files = paths.discover_all();

            if json {
                let listed: Vec<String> =
                    files.iter().map(|f| f.display().to_string()).collect();
                let out = serde_json::to_string_pretty(&listed).into_diagnostic()?;
                println!("{out}");
            } else if files.is_empty() {
                println!("No artifact files under {}", paths.root().display());
            } else {
                for file in &files {
                    println!("{}", file.display());
                }
            }
        }
    }

    Ok(())
}

/// Print records in the shared one-line report format.
fn print_records<'a>(records: impl Iterator<Item = &'a Record>) {
    for record in records {
        let session = record
            .session_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| format!(" session={s}"))
            .unwrap_or_default();
        println!(
            "  {} [{}] {} <- [{}] {}{} ({})",
            record.id,
            record.artifact_type,
            record.artifact_path,
            record.source_type,
            record.source_path,
            session,
            record.created_at
        );
    }
}
