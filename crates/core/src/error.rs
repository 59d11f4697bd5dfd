//! Error types for lock manifest loading and reconciliation.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for deplock operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading lock records or enforcing a report.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// A required field is absent from a record.
    #[error("Missing required field '{field}'{}", record.map(|i| format!(" in record #{i}")).unwrap_or_default())]
    #[diagnostic(
        code(deplock::core::missing_required_field),
        help("Every record needs 'groupId', 'artifactId', 'version' and 'scope'")
    )]
    MissingRequiredField {
        /// Name of the missing field, as written in the manifest.
        field: &'static str,
        /// Position of the record in its document, when known.
        record: Option<usize>,
    },

    /// Checksum value without a recognised algorithm header.
    #[error("{context}: '{value}'")]
    #[diagnostic(
        code(deplock::core::unsupported_checksum_format),
        help(
            "Supported checksum formats are sha1:, sha256:, sha384: and sha512: followed by a hex or base64 digest. A manifest written by a newer deplock may need an upgrade"
        )
    )]
    UnsupportedChecksumFormat {
        /// The offending checksum value.
        value: String,
        /// Caller supplied context describing where the value came from.
        context: String,
    },

    /// A locked version was read as a pattern but does not compile.
    #[error("Invalid version pattern '{pattern}': {source}")]
    #[diagnostic(
        code(deplock::core::invalid_version_pattern),
        help("Escape regex metacharacters or switch version matching to 'literal'")
    )]
    InvalidVersionPattern {
        /// The pattern as written in the manifest.
        pattern: String,
        /// The underlying regex compilation error.
        #[source]
        source: Box<regex::Error>,
    },

    /// A record has the wrong shape.
    #[error("Invalid record{}: {source}", index.map(|i| format!(" #{i}")).unwrap_or_default())]
    #[diagnostic(
        code(deplock::core::invalid_record),
        help("Check the field types: strings for coordinates, a boolean for 'optional'")
    )]
    InvalidRecord {
        /// Position of the record in its document, when known.
        index: Option<usize>,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The document is not a sequence of records.
    #[error("Invalid lock manifest: {message}")]
    #[diagnostic(
        code(deplock::core::invalid_manifest),
        help("A lock manifest is a JSON array of records or an object with a 'dependencies' array")
    )]
    InvalidManifest {
        /// What is wrong with the document.
        message: String,
    },

    /// JSON parsing error.
    #[error("JSON parsing error{}: {source}", path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    #[diagnostic(
        code(deplock::core::json_error),
        help("Ensure the file contains valid JSON")
    )]
    Json {
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
        /// Optional path to the file being parsed.
        path: Option<PathBuf>,
    },

    /// I/O error occurred.
    #[error("I/O error during {operation}{}: {source}", path.as_ref().map(|p| format!(" at {}", p.display())).unwrap_or_default())]
    #[diagnostic(
        code(deplock::core::io_error),
        help("Check that the referenced paths exist and that you have permission to read them")
    )]
    Io {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
        /// Optional path where the error occurred.
        path: Option<PathBuf>,
        /// Description of the operation being performed.
        operation: String,
    },

    /// The resolved dependencies do not match the lock manifest.
    #[error("Dependencies do not match the lock manifest: {summary}")]
    #[diagnostic(
        code(deplock::core::lock_mismatch),
        help(
            "Review the divergences below. Regenerate the manifest only if every change is expected; a checksum mismatch can indicate a tampered artifact"
        )
    )]
    LockMismatch {
        /// One-line count of each outcome.
        summary: String,
        /// One line per non-matching finding.
        divergences: Vec<String>,
    },
}

impl Error {
    /// A required field is absent.
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingRequiredField {
            field,
            record: None,
        }
    }

    /// A checksum failed header validation.
    pub fn unsupported_checksum(value: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnsupportedChecksumFormat {
            value: value.into(),
            context: context.into(),
        }
    }

    /// A version pattern failed to compile.
    pub fn invalid_version_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidVersionPattern {
            pattern: pattern.into(),
            source: Box::new(source),
        }
    }

    /// The document shape is wrong.
    pub fn invalid_manifest(message: impl Into<String>) -> Self {
        Self::InvalidManifest {
            message: message.into(),
        }
    }

    /// Attach the position of the failing record to errors raised while
    /// loading a sequence.
    #[must_use]
    pub fn at_record(self, position: usize) -> Self {
        match self {
            Self::MissingRequiredField { field, .. } => Self::MissingRequiredField {
                field,
                record: Some(position),
            },
            Self::InvalidRecord { source, .. } => Self::InvalidRecord {
                index: Some(position),
                source,
            },
            other => other,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source, path: None }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            path: None,
            operation: "file operation".to_string(),
        }
    }
}
