//! Reconciliation of a lock manifest against the resolved dependency set.
//!
//! Every locked record is joined on identity with the resolved artifacts and
//! classified. Resolved artifacts no record asked for are reported as extra.
//! Classification never stops at the first problem; the [`Report`] holds
//! every finding and the caller decides whether the build fails.

use crate::artifact::Artifact;
use crate::artifacts::Artifacts;
use crate::checksum::Checksum;
use crate::config::LockConfig;
use crate::error::{Error, Result};
use crate::identifier::ArtifactIdentifier;
use crate::lockfile::LockedDependencies;
use crate::locked::{Divergence, LockedDependency};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Classification of one locked record, or of one unclaimed artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The resolved artifact satisfies the record.
    Match,
    /// Locked but not resolved.
    Missing {
        /// The record nothing resolved for.
        locked: LockedDependency,
    },
    /// Resolved but not locked.
    Extra {
        /// The unclaimed artifact.
        artifact: Artifact,
    },
    /// Everything matches except the checksum.
    ChecksumMismatch {
        /// Locked checksum.
        expected: Option<Checksum>,
        /// Resolved checksum.
        actual: Option<Checksum>,
    },
    /// Version, scope or optional flag diverged.
    GeneralMismatch {
        /// Every diverging field, checksum included when it also differs.
        divergences: Vec<Divergence>,
    },
}

impl Outcome {
    /// The variant without its payload.
    #[must_use]
    pub const fn kind(&self) -> OutcomeKind {
        match self {
            Self::Match => OutcomeKind::Match,
            Self::Missing { .. } => OutcomeKind::Missing,
            Self::Extra { .. } => OutcomeKind::Extra,
            Self::ChecksumMismatch { .. } => OutcomeKind::ChecksumMismatch,
            Self::GeneralMismatch { .. } => OutcomeKind::GeneralMismatch,
        }
    }
}

/// Payload-free [`Outcome`] discriminant, used for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutcomeKind {
    /// See [`Outcome::Match`].
    Match,
    /// See [`Outcome::Missing`].
    Missing,
    /// See [`Outcome::Extra`].
    Extra,
    /// See [`Outcome::ChecksumMismatch`].
    ChecksumMismatch,
    /// See [`Outcome::GeneralMismatch`].
    GeneralMismatch,
}

impl OutcomeKind {
    /// Every kind, in report order.
    pub const ALL: [Self; 5] = [
        Self::Match,
        Self::Missing,
        Self::Extra,
        Self::ChecksumMismatch,
        Self::GeneralMismatch,
    ];
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Match => "MATCH",
            Self::Missing => "MISSING",
            Self::Extra => "EXTRA",
            Self::ChecksumMismatch => "CHECKSUM_MISMATCH",
            Self::GeneralMismatch => "GENERAL_MISMATCH",
        })
    }
}

/// The outcome for one identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Identity the outcome is about.
    pub identifier: ArtifactIdentifier,
    /// What was found.
    pub outcome: Outcome,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.outcome.kind(), self.identifier)?;
        match &self.outcome {
            Outcome::Match => Ok(()),
            Outcome::Missing { locked } => write!(f, ": locked as {locked}, not resolved"),
            Outcome::Extra { artifact } => write!(f, ": resolved as {artifact}, not locked"),
            Outcome::ChecksumMismatch { expected, actual } => write!(
                f,
                ": {}",
                Divergence::Checksum {
                    expected: expected.clone(),
                    actual: actual.clone(),
                }
            ),
            Outcome::GeneralMismatch { divergences } => {
                let details: Vec<String> = divergences.iter().map(ToString::to_string).collect();
                write!(f, ": {}", details.join("; "))
            }
        }
    }
}

/// Every finding of one reconciliation pass.
///
/// Findings for locked records come first, in manifest order, followed by
/// extra artifacts in collection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    findings: Vec<Finding>,
}

impl Report {
    /// All findings.
    #[must_use]
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Findings other than [`Outcome::Match`].
    pub fn problems(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|finding| finding.outcome != Outcome::Match)
    }

    /// Number of findings of `kind`.
    #[must_use]
    pub fn count(&self, kind: OutcomeKind) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.outcome.kind() == kind)
            .count()
    }

    /// Whether every finding is a match.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.problems().next().is_none()
    }

    /// One-line count of every non-empty outcome kind.
    #[must_use]
    pub fn summary(&self) -> String {
        let parts: Vec<String> = OutcomeKind::ALL
            .into_iter()
            .filter_map(|kind| match self.count(kind) {
                0 => None,
                n => Some(format!("{n} {kind}")),
            })
            .collect();
        if parts.is_empty() {
            "nothing to check".to_string()
        } else {
            parts.join(", ")
        }
    }

    /// Turn a report with problems into [`Error::LockMismatch`].
    ///
    /// # Errors
    ///
    /// Fails when any finding is not a match.
    pub fn into_result(self) -> Result<Self> {
        if self.is_clean() {
            return Ok(self);
        }
        Err(Error::LockMismatch {
            summary: self.summary(),
            divergences: self.problems().map(ToString::to_string).collect(),
        })
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        for finding in self.problems() {
            writeln!(f, "  {finding}")?;
        }
        Ok(())
    }
}

/// Classifies locked records against resolved artifacts.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    config: LockConfig,
    version_overrides: BTreeMap<ArtifactIdentifier, String>,
}

impl Reconciler {
    /// Reconciler for the given configuration.
    #[must_use]
    pub fn new(config: &LockConfig) -> Self {
        Self {
            config: *config,
            version_overrides: BTreeMap::new(),
        }
    }

    /// Test the locked version of `identifier` against `version` instead of
    /// the resolved artifact's version, e.g. after placeholder expansion.
    #[must_use]
    pub fn with_version_override(
        mut self,
        identifier: ArtifactIdentifier,
        version: impl Into<String>,
    ) -> Self {
        self.version_overrides.insert(identifier, version.into());
        self
    }

    /// Classify every record of `locked` and every unclaimed artifact of
    /// `resolved`.
    #[must_use]
    pub fn reconcile(&self, locked: &LockedDependencies, resolved: &Artifacts) -> Report {
        let _span = tracing::info_span!(
            "reconcile",
            locked = locked.len(),
            resolved = resolved.len(),
            integrity_checking = self.config.integrity_checking,
        )
        .entered();

        let mut index: BTreeMap<&ArtifactIdentifier, &Artifact> = BTreeMap::new();
        for artifact in resolved {
            index.entry(&artifact.identifier).or_insert(artifact);
        }

        let mut consumed = BTreeSet::new();
        let mut findings = Vec::with_capacity(locked.len());
        for dependency in locked {
            consumed.insert(&dependency.identifier);
            let artifact = index.get(&dependency.identifier).copied();
            tracing::trace!(
                identifier = %dependency.identifier,
                found = artifact.is_some(),
                "Looked up locked dependency"
            );

            let outcome = self.classify(dependency, artifact);
            match &outcome {
                Outcome::ChecksumMismatch { expected, actual } => tracing::warn!(
                    identifier = %dependency.identifier,
                    expected = ?expected.as_ref().map(ToString::to_string),
                    actual = ?actual.as_ref().map(ToString::to_string),
                    "Checksum differs from the lock manifest"
                ),
                other => tracing::debug!(
                    identifier = %dependency.identifier,
                    outcome = %other.kind(),
                    "Classified locked dependency"
                ),
            }
            findings.push(Finding {
                identifier: dependency.identifier.clone(),
                outcome,
            });
        }

        for artifact in resolved {
            if !consumed.contains(&artifact.identifier) {
                tracing::debug!(identifier = %artifact.identifier, "Resolved dependency is not locked");
                findings.push(Finding {
                    identifier: artifact.identifier.clone(),
                    outcome: Outcome::Extra {
                        artifact: artifact.clone(),
                    },
                });
            }
        }

        let report = Report { findings };
        tracing::info!(summary = %report.summary(), clean = report.is_clean(), "Reconciliation finished");
        report
    }

    /// Classify one record against the artifact found for its identity.
    #[must_use]
    pub fn classify(&self, locked: &LockedDependency, artifact: Option<&Artifact>) -> Outcome {
        let Some(artifact) = artifact else {
            return Outcome::Missing {
                locked: locked.clone(),
            };
        };

        let mut comparison = match self.version_overrides.get(&locked.identifier) {
            Some(version) => locked.with_my_version(version).compare(artifact),
            None => locked.compare(artifact),
        };
        if !self.config.integrity_checking {
            comparison = comparison.without_checksum();
        }

        if comparison.is_match() {
            Outcome::Match
        } else if comparison.differs_only_by_checksum() {
            Outcome::ChecksumMismatch {
                expected: locked.checksum.clone(),
                actual: artifact.checksum.clone(),
            }
        } else {
            Outcome::GeneralMismatch {
                divergences: comparison.into_divergences(),
            }
        }
    }
}
