//! Lock manifest records and the comparison of a record against a resolved
//! artifact.

use crate::artifact::Artifact;
use crate::checksum::{Checksum, UNSUPPORTED_CHECKSUM_CONTEXT};
use crate::config::LockConfig;
use crate::error::{Error, Result};
use crate::identifier::ArtifactIdentifier;
use crate::version::VersionPattern;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// One entry of a lock manifest.
///
/// The version is a constraint rather than a literal, see [`VersionPattern`].
/// A present checksum has already passed header validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LockedDependency {
    /// Join key against resolved artifacts.
    pub identifier: ArtifactIdentifier,
    /// Version constraint.
    pub version: VersionPattern,
    /// Expected scope.
    pub scope: String,
    /// Expected optional flag.
    pub optional: bool,
    /// Expected checksum, absent when integrity checking is off.
    pub checksum: Option<Checksum>,
}

/// Serialized shape of a [`LockedDependency`].
///
/// Field order is the emission order. Absent fields are omitted rather than
/// written as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockRecord {
    /// Group id (required).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Artifact id (required).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<String>,
    /// Version constraint (required).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Scope (required).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Packaging type, `jar` when absent.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    /// Optional flag, `false` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    /// Checksum in `<algorithm>:<digest>` form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    /// Classifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
}

impl LockedDependency {
    /// Assemble a record from already validated parts.
    pub fn new(
        identifier: ArtifactIdentifier,
        version: VersionPattern,
        scope: impl Into<String>,
        optional: bool,
        checksum: Option<Checksum>,
    ) -> Self {
        Self {
            identifier,
            version,
            scope: scope.into(),
            optional,
            checksum,
        }
    }

    /// Deserialize a manifest record.
    ///
    /// With integrity checking off the `checksum` field is ignored entirely,
    /// so a strict manifest can be checked permissively without editing it.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidRecord`] for a wrongly shaped record,
    /// [`Error::MissingRequiredField`] for an absent required field,
    /// [`Error::UnsupportedChecksumFormat`] for an unreadable checksum and
    /// [`Error::InvalidVersionPattern`] for a version that does not compile.
    pub fn from_json(json: &serde_json::Value, config: &LockConfig) -> Result<Self> {
        let record: LockRecord = serde_json::from_value(json.clone())
            .map_err(|source| Error::InvalidRecord { index: None, source })?;
        Self::from_record(record, config)
    }

    /// Validate a deserialized record.
    ///
    /// # Errors
    ///
    /// Same as [`LockedDependency::from_json`], minus shape errors.
    pub fn from_record(record: LockRecord, config: &LockConfig) -> Result<Self> {
        let identifier = ArtifactIdentifier::builder()
            .group_id(record.group_id.ok_or_else(|| Error::missing_field("groupId"))?)
            .artifact_id(
                record
                    .artifact_id
                    .ok_or_else(|| Error::missing_field("artifactId"))?,
            )
            .classifier(record.classifier)
            .type_(record.type_)
            .build()?;
        let version = record.version.ok_or_else(|| Error::missing_field("version"))?;
        let scope = record.scope.ok_or_else(|| Error::missing_field("scope"))?;

        let version = VersionPattern::parse(&version, config.version_matching)?;
        let checksum = match record.checksum {
            Some(value) if config.integrity_checking => Some(Checksum::check_algorithm_header(
                &value,
                UNSUPPORTED_CHECKSUM_CONTEXT,
            )?),
            _ => None,
        };

        Ok(Self::new(
            identifier,
            version,
            scope,
            record.optional.unwrap_or(false),
            checksum,
        ))
    }

    /// Lock a resolved artifact at its exact version.
    ///
    /// The version is recorded so that loading the serialized record under
    /// the same `config` yields this record again, see [`VersionPattern::exact`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVersionPattern`] if the escaped version does not
    /// compile.
    pub fn from_artifact(artifact: &Artifact, config: &LockConfig) -> Result<Self> {
        Ok(Self::new(
            artifact.identifier.clone(),
            VersionPattern::exact(&artifact.version, config.version_matching)?,
            &artifact.scope,
            artifact.optional,
            artifact
                .checksum
                .clone()
                .filter(|_| config.integrity_checking),
        ))
    }

    /// The serialized shape of this record.
    #[must_use]
    pub fn to_record(&self) -> LockRecord {
        LockRecord {
            group_id: Some(self.identifier.group_id().to_string()),
            artifact_id: Some(self.identifier.artifact_id().to_string()),
            version: Some(self.version.as_str().to_string()),
            scope: Some(self.scope.clone()),
            type_: Some(self.identifier.type_().to_string()),
            optional: Some(self.optional),
            checksum: self.checksum.as_ref().map(ToString::to_string),
            classifier: self.identifier.classifier().map(str::to_string),
        }
    }

    /// Serialize to a JSON value.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` failures, which do not occur for this shape.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.to_record())?)
    }

    /// Rebuild the artifact this record describes. A regex version is kept as
    /// its source text.
    #[must_use]
    pub fn to_artifact(&self) -> Artifact {
        Artifact::new(
            self.identifier.clone(),
            self.version.as_str(),
            &self.scope,
            self.optional,
            self.checksum.clone(),
        )
    }

    /// Compare every field against `artifact`.
    #[must_use]
    pub fn compare(&self, artifact: &Artifact) -> Comparison {
        self.compare_with_version(&artifact.version, artifact)
    }

    /// Whether `artifact` satisfies this record in every field, checksum included.
    #[must_use]
    pub fn test(&self, artifact: &Artifact) -> bool {
        self.compare(artifact).is_match()
    }

    /// Whether `artifact` satisfies this record when checksums are ignored.
    #[must_use]
    pub fn differs_only_by_checksum(&self, artifact: &Artifact) -> bool {
        self.compare(artifact).differs_only_by_checksum()
    }

    /// Re-anchor the version comparison on `my_version` instead of the
    /// artifact's own version.
    #[must_use]
    pub fn with_my_version<'a>(&'a self, my_version: &'a str) -> WithMyVersion<'a> {
        WithMyVersion {
            locked: self,
            my_version,
        }
    }

    fn compare_with_version(&self, subject_version: &str, artifact: &Artifact) -> Comparison {
        let mut divergences = Vec::new();

        if self.identifier != artifact.identifier {
            divergences.push(Divergence::Identifier {
                expected: self.identifier.clone(),
                actual: artifact.identifier.clone(),
            });
        }
        if !self.version.matches(subject_version) {
            divergences.push(Divergence::Version {
                expected: self.version.as_str().to_string(),
                actual: subject_version.to_string(),
            });
        }
        if self.scope != artifact.scope {
            divergences.push(Divergence::Scope {
                expected: self.scope.clone(),
                actual: artifact.scope.clone(),
            });
        }
        if self.optional != artifact.optional {
            divergences.push(Divergence::Optional {
                expected: self.optional,
                actual: artifact.optional,
            });
        }
        if self.checksum != artifact.checksum {
            divergences.push(Divergence::Checksum {
                expected: self.checksum.clone(),
                actual: artifact.checksum.clone(),
            });
        }

        Comparison { divergences }
    }

    fn fmt_with_version(&self, f: &mut fmt::Formatter<'_>, version: &str) -> fmt::Result {
        write!(f, "{}:{}:{}", self.identifier, version, self.scope)?;
        if self.optional {
            f.write_str(":optional")?;
        }
        if let Some(checksum) = &self.checksum {
            write!(f, "@{checksum}")?;
        }
        Ok(())
    }
}

impl fmt::Display for LockedDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with_version(f, self.version.as_str())
    }
}

impl PartialOrd for LockedDependency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LockedDependency {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identifier
            .cmp(&other.identifier)
            .then_with(|| self.version.as_str().cmp(other.version.as_str()))
            .then_with(|| self.version.is_regex().cmp(&other.version.is_regex()))
            .then_with(|| self.scope.cmp(&other.scope))
            .then_with(|| self.optional.cmp(&other.optional))
            .then_with(|| self.checksum.cmp(&other.checksum))
    }
}

/// A [`LockedDependency`] whose version constraint is tested against a fixed
/// version string rather than the artifact's.
#[derive(Debug, Clone, Copy)]
pub struct WithMyVersion<'a> {
    locked: &'a LockedDependency,
    my_version: &'a str,
}

impl WithMyVersion<'_> {
    /// Compare every field, using the anchored version for the version check.
    #[must_use]
    pub fn compare(&self, artifact: &Artifact) -> Comparison {
        self.locked.compare_with_version(self.my_version, artifact)
    }

    /// Whether `artifact` satisfies the record with the version re-anchored.
    #[must_use]
    pub fn test(&self, artifact: &Artifact) -> bool {
        self.compare(artifact).is_match()
    }
}

impl fmt::Display for WithMyVersion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.locked.fmt_with_version(f, self.my_version)
    }
}

/// A single field on which a resolved artifact departs from its lock record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Divergence {
    /// Different identity. Never produced by the reconciler, which joins on
    /// identity, but reported when records are compared directly.
    Identifier {
        /// Locked identity.
        expected: ArtifactIdentifier,
        /// Resolved identity.
        actual: ArtifactIdentifier,
    },
    /// Resolved version does not satisfy the locked constraint.
    Version {
        /// Locked constraint.
        expected: String,
        /// Version tested against it.
        actual: String,
    },
    /// Different scope.
    Scope {
        /// Locked scope.
        expected: String,
        /// Resolved scope.
        actual: String,
    },
    /// Different optional flag.
    Optional {
        /// Locked flag.
        expected: bool,
        /// Resolved flag.
        actual: bool,
    },
    /// Different checksum, including present on one side only.
    Checksum {
        /// Locked checksum.
        expected: Option<Checksum>,
        /// Resolved checksum.
        actual: Option<Checksum>,
    },
}

impl Divergence {
    /// Name of the diverging field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Identifier { .. } => "identifier",
            Self::Version { .. } => "version",
            Self::Scope { .. } => "scope",
            Self::Optional { .. } => "optional",
            Self::Checksum { .. } => "checksum",
        }
    }

    /// Whether this is a checksum divergence.
    #[must_use]
    pub const fn is_checksum(&self) -> bool {
        matches!(self, Self::Checksum { .. })
    }
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn or_none(checksum: Option<&Checksum>) -> String {
            checksum.map_or_else(|| "none".to_string(), ToString::to_string)
        }

        match self {
            Self::Identifier { expected, actual } => {
                write!(f, "identifier locked as {expected}, resolved as {actual}")
            }
            Self::Version { expected, actual } => {
                write!(f, "version locked as {expected}, resolved as {actual}")
            }
            Self::Scope { expected, actual } => {
                write!(f, "scope locked as {expected}, resolved as {actual}")
            }
            Self::Optional { expected, actual } => {
                write!(f, "optional locked as {expected}, resolved as {actual}")
            }
            Self::Checksum { expected, actual } => write!(
                f,
                "checksum locked as {}, resolved as {}",
                or_none(expected.as_ref()),
                or_none(actual.as_ref())
            ),
        }
    }
}

/// Every divergence between a lock record and an artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparison {
    divergences: Vec<Divergence>,
}

impl Comparison {
    /// No field diverges.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.divergences.is_empty()
    }

    /// Nothing but the checksum diverges. Also true for a full match.
    #[must_use]
    pub fn differs_only_by_checksum(&self) -> bool {
        self.divergences.iter().all(Divergence::is_checksum)
    }

    /// The diverging fields, in field order.
    #[must_use]
    pub fn divergences(&self) -> &[Divergence] {
        &self.divergences
    }

    /// Take ownership of the divergences.
    #[must_use]
    pub fn into_divergences(self) -> Vec<Divergence> {
        self.divergences
    }

    /// The same comparison as if neither side carried a checksum.
    #[must_use]
    pub fn without_checksum(mut self) -> Self {
        self.divergences.retain(|divergence| !divergence.is_checksum());
        self
    }
}
