//! Command execution for the deplock CLI.

use crate::errors::CliError;
use deplock_core::{
    Artifacts, LockConfig, LockedDependencies, Reconciler, Report, ResolvedDependency,
    VersionMatching,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Check {
        lock: PathBuf,
        resolved: PathBuf,
        config: Option<PathBuf>,
        integrity: bool,
        version_matching: Option<VersionMatching>,
    },
    Lock {
        resolved: PathBuf,
        config: Option<PathBuf>,
        integrity: bool,
        version_matching: Option<VersionMatching>,
    },
}

impl Command {
    pub fn execute(self) -> miette::Result<()> {
        match self {
            Self::Check {
                lock,
                resolved,
                config,
                integrity,
                version_matching,
            } => {
                let config = load_config(config.as_deref(), integrity, version_matching)?;
                let report = check(&lock, &resolved, &config)?;
                write_stdout(&report.to_string())?;
                report.into_result()?;
                Ok(())
            }
            Self::Lock {
                resolved,
                config,
                integrity,
                version_matching,
            } => {
                let config = load_config(config.as_deref(), integrity, version_matching)?;
                let manifest = lock(&resolved, &config)?;
                write_stdout(&manifest)?;
                Ok(())
            }
        }
    }
}

/// Merge the optional config file with command-line flags. Flags win.
pub fn load_config(
    path: Option<&Path>,
    integrity: bool,
    version_matching: Option<VersionMatching>,
) -> Result<LockConfig, CliError> {
    let mut config = match path {
        Some(path) => {
            let text = read_file(path)?;
            serde_json::from_str(&text)
                .map_err(|e| CliError::parse_error("configuration", path, e))?
        }
        None => LockConfig::default(),
    };

    if integrity {
        config.integrity_checking = true;
    }
    if let Some(matching) = version_matching {
        config.version_matching = matching;
    }

    debug!(?config, "Resolved lock configuration");
    Ok(config)
}

#[instrument(skip(config))]
pub fn check(lock: &Path, resolved: &Path, config: &LockConfig) -> miette::Result<Report> {
    let manifest = LockedDependencies::from_json_str(&read_file(lock)?, config)?;
    let artifacts = read_resolved(resolved, config)?;

    let report = Reconciler::new(config).reconcile(&manifest, &artifacts);
    info!(clean = report.is_clean(), summary = %report.summary(), "Check finished");
    Ok(report)
}

#[instrument(skip(config))]
pub fn lock(resolved: &Path, config: &LockConfig) -> miette::Result<String> {
    let artifacts = read_resolved(resolved, config)?;
    let manifest = LockedDependencies::from_artifacts(&artifacts, config)?;
    info!(count = manifest.len(), "Built lock manifest");
    Ok(manifest.to_json_string()?)
}

fn read_resolved(path: &Path, config: &LockConfig) -> miette::Result<Artifacts> {
    let text = read_file(path)?;
    let records: Vec<ResolvedDependency> = serde_json::from_str(&text)
        .map_err(|e| CliError::parse_error("resolved dependencies", path, e))?;
    debug!(count = records.len(), path = %path.display(), "Read resolved dependencies");
    Ok(Artifacts::from_resolved(&records, config.integrity_checking)?)
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| CliError::file_error("read", path, e))
}

fn write_stdout(text: &str) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}").map_err(|source| CliError::OutputError { source })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use deplock_core::OutcomeKind;
    use std::fs;
    use tempfile::TempDir;

    const RESOLVED: &str = r#"[
        {"groupId": "com.x", "artifactId": "lib", "version": "1.2.3",
         "scope": "compile", "checksum": "sha256:abc"}
    ]"#;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "config.json",
            r#"{"integrityChecking": false, "versionMatching": "literal"}"#,
        );

        let config = load_config(Some(&path), true, Some(VersionMatching::Regex)).unwrap();
        assert!(config.integrity_checking);
        assert_eq!(config.version_matching, VersionMatching::Regex);

        let config = load_config(Some(&path), false, None).unwrap();
        assert!(!config.integrity_checking);
        assert_eq!(config.version_matching, VersionMatching::Literal);
    }

    #[test]
    fn test_missing_config_file() {
        let result = load_config(Some(Path::new("/nonexistent/deplock-config.json")), false, None);
        assert!(matches!(result, Err(CliError::FileError { .. })));
    }

    #[test]
    fn test_lock_then_check_is_clean() {
        let dir = TempDir::new().unwrap();
        let resolved = write(&dir, "resolved.json", RESOLVED);
        let config = LockConfig::with_integrity();

        let manifest = lock(&resolved, &config).unwrap();
        assert!(manifest.contains("\"checksum\": \"sha256:abc\""));
        let lock_path = write(&dir, "deplock.json", &manifest);

        let report = check(&lock_path, &resolved, &config).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.count(OutcomeKind::Match), 1);
    }

    #[test]
    fn test_lock_then_check_with_unusual_versions() {
        let dir = TempDir::new().unwrap();
        let resolved = write(
            &dir,
            "resolved.json",
            r#"[
                {"groupId": "g", "artifactId": "a", "version": "1.0-[rc]", "scope": "compile"},
                {"groupId": "g", "artifactId": "b", "version": "2.0(build-7", "scope": "compile"},
                {"groupId": "g", "artifactId": "c", "version": "1.0.0+build.5", "scope": "compile"}
            ]"#,
        );

        for matching in [
            VersionMatching::Auto,
            VersionMatching::Literal,
            VersionMatching::Regex,
        ] {
            let config = LockConfig::default().version_matching(matching);
            let lock_path = write(&dir, "deplock.json", &lock(&resolved, &config).unwrap());

            let report = check(&lock_path, &resolved, &config).unwrap();
            assert_eq!(report.count(OutcomeKind::Match), 3, "{matching:?}: {report}");
        }
    }

    #[test]
    fn test_malformed_resolved_export() {
        let dir = TempDir::new().unwrap();
        let resolved = write(&dir, "resolved.json", "{not json");
        assert!(lock(&resolved, &LockConfig::default()).is_err());
    }
}
