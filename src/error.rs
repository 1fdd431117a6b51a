//! Rich diagnostic error types for seshat.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives, providing error codes and help text so users know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for seshat.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain (error codes, help text, source chains) through to the
/// user.
#[derive(Debug, Error, Diagnostic)]
pub enum SeshatError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Provenance(#[from] ProvenanceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolve(#[from] ResolveError),
}

// ---------------------------------------------------------------------------
// Provenance errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ProvenanceError {
    #[error("failed to read provenance log: {path}")]
    #[diagnostic(
        code(seshat::provenance::io),
        help(
            "The log file exists but could not be read. Check file permissions \
             and that the path points to a regular file."
        )
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed provenance record at {path}:{line}: {message}")]
    #[diagnostic(
        code(seshat::provenance::malformed),
        help(
            "Strict loading rejects any line that is not a valid JSON record. \
             Re-run without --strict to skip malformed lines instead."
        )
    )]
    MalformedLine {
        path: String,
        line: usize,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Resolver errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ResolveError {
    #[error("artifact \"{identifier}\" not found")]
    #[diagnostic(
        code(seshat::resolve::not_found),
        help(
            "No file under the artifact root matched this identifier by path, \
             filename, substring, or frontmatter id. \
             List resolvable files with `seshat list`."
        )
    )]
    NotFound { identifier: String },
}

/// Convenience alias for provenance operations.
pub type ProvenanceResult<T> = std::result::Result<T, ProvenanceError>;

/// Convenience alias for resolver operations.
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

/// Convenience alias for functions returning seshat results.
pub type SeshatResult<T> = std::result::Result<T, SeshatError>;
