//! Resolved dependencies and the host-tool records they are built from.

use crate::checksum::{Checksum, UNSUPPORTED_CHECKSUM_CONTEXT};
use crate::error::Result;
use crate::identifier::ArtifactIdentifier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scope assumed for a declared dependency that does not name one.
pub const DEFAULT_SCOPE: &str = "compile";

/// A dependency the build actually resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Artifact {
    /// Join key against lock records.
    pub identifier: ArtifactIdentifier,
    /// Concrete resolved version.
    pub version: String,
    /// Dependency scope (`compile`, `test`, `runtime`, ...).
    pub scope: String,
    /// Whether the dependency is optional.
    pub optional: bool,
    /// Content checksum, present only when integrity checking is enabled.
    pub checksum: Option<Checksum>,
}

impl Artifact {
    /// Assemble an artifact from its parts.
    pub fn new(
        identifier: ArtifactIdentifier,
        version: impl Into<String>,
        scope: impl Into<String>,
        optional: bool,
        checksum: Option<Checksum>,
    ) -> Self {
        Self {
            identifier,
            version: version.into(),
            scope: scope.into(),
            optional,
            checksum,
        }
    }

    /// Convert a record supplied by the host resolver.
    ///
    /// The checksum is carried over only when `integrity_checking` is set;
    /// otherwise the artifact never has one.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnsupportedChecksumFormat`] when integrity
    /// checking is on and the supplied checksum has no recognised header.
    pub fn from_resolved(resolved: &ResolvedDependency, integrity_checking: bool) -> Result<Self> {
        let identifier = ArtifactIdentifier::builder()
            .group_id(&resolved.group_id)
            .artifact_id(&resolved.artifact_id)
            .classifier(resolved.classifier.as_deref())
            .type_(resolved.type_.as_deref())
            .build()?;

        let checksum = match (&resolved.checksum, integrity_checking) {
            (Some(value), true) => Some(Checksum::check_algorithm_header(
                value,
                UNSUPPORTED_CHECKSUM_CONTEXT,
            )?),
            _ => None,
        };

        Ok(Self::new(
            identifier,
            &resolved.version,
            &resolved.scope,
            resolved.optional,
            checksum,
        ))
    }

    /// Convert a declared but unresolved dependency. Never carries a checksum.
    ///
    /// # Errors
    ///
    /// Fails only if the identifier cannot be built.
    pub fn from_declared(declared: &DeclaredDependency) -> Result<Self> {
        let identifier = ArtifactIdentifier::builder()
            .group_id(&declared.group_id)
            .artifact_id(&declared.artifact_id)
            .classifier(declared.classifier.as_deref())
            .type_(declared.type_.as_deref())
            .build()?;

        Ok(Self::new(
            identifier,
            &declared.version,
            declared.scope.as_deref().unwrap_or(DEFAULT_SCOPE),
            declared.optional,
            None,
        ))
    }
}

/// Renders `identifier:version:scope`, then `:optional` and `@checksum` when set.
impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.identifier, self.version, self.scope)?;
        if self.optional {
            f.write_str(":optional")?;
        }
        if let Some(checksum) = &self.checksum {
            write!(f, "@{checksum}")?;
        }
        Ok(())
    }
}

/// One entry of the host resolver's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDependency {
    /// Group id.
    pub group_id: String,
    /// Artifact id.
    pub artifact_id: String,
    /// Resolved version.
    pub version: String,
    /// Scope the dependency was resolved in.
    pub scope: String,
    /// Optional flag.
    #[serde(default)]
    pub optional: bool,
    /// Classifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    /// Packaging type.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    /// Precomputed checksum, in `<algorithm>:<digest>` form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// A dependency declared in a build descriptor but not resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclaredDependency {
    /// Group id.
    pub group_id: String,
    /// Artifact id.
    pub artifact_id: String,
    /// Declared version.
    pub version: String,
    /// Declared scope; [`DEFAULT_SCOPE`] when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Optional flag.
    #[serde(default)]
    pub optional: bool,
    /// Classifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    /// Packaging type.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
}
