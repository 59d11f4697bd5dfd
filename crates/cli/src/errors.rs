//! CLI-specific errors, rendered through miette.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the CLI host itself rather than by the lock checker.
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("Failed to {operation} {}", path.display())]
    #[diagnostic(
        code(deplock::cli::file_error),
        help("Check file permissions and ensure the path exists")
    )]
    FileError {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {what} in {}", path.display())]
    #[diagnostic(code(deplock::cli::parse_error))]
    ParseError {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
        #[help]
        help_text: Option<String>,
    },

    #[error("Failed to write output")]
    #[diagnostic(code(deplock::cli::output_error))]
    OutputError {
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileError {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    pub fn parse_error(what: &'static str, path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        let help_text = match what {
            "resolved dependencies" => Some(
                "Expected a JSON array of {groupId, artifactId, version, scope, ...} records exported by the build tool"
                    .to_string(),
            ),
            "configuration" => {
                Some("Expected an object with 'integrityChecking' and 'versionMatching'".to_string())
            }
            _ => None,
        };
        Self::ParseError {
            what,
            path: path.into(),
            source,
            help_text,
        }
    }
}
