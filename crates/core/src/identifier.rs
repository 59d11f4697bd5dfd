//! Artifact identity: the join key between resolved and locked dependencies.

use crate::error::{Error, Result};
use std::fmt;

/// Packaging type assumed when a record does not name one.
pub const DEFAULT_TYPE: &str = "jar";

/// Identifies a dependency independently of its version, scope and checksum.
///
/// Equality and ordering are structural over all four fields. An absent
/// classifier sorts before any present one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactIdentifier {
    group_id: String,
    artifact_id: String,
    classifier: Option<String>,
    type_: String,
}

impl ArtifactIdentifier {
    /// Start building an identifier.
    #[must_use]
    pub fn builder() -> ArtifactIdentifierBuilder {
        ArtifactIdentifierBuilder::default()
    }

    /// Group the artifact belongs to.
    #[must_use]
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Artifact name within its group.
    #[must_use]
    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    /// Optional classifier (`tests`, `sources`, a platform tag, ...).
    #[must_use]
    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    /// Packaging type.
    #[must_use]
    pub fn type_(&self) -> &str {
        &self.type_
    }
}

/// Renders `groupId:artifactId:type[:classifier]`.
impl fmt::Display for ArtifactIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.type_)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{classifier}")?;
        }
        Ok(())
    }
}

/// Builder for [`ArtifactIdentifier`].
#[derive(Debug, Clone, Default)]
pub struct ArtifactIdentifierBuilder {
    group_id: Option<String>,
    artifact_id: Option<String>,
    classifier: Option<String>,
    type_: Option<String>,
}

impl ArtifactIdentifierBuilder {
    /// Set the group id (required).
    #[must_use]
    pub fn group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    /// Set the artifact id (required).
    #[must_use]
    pub fn artifact_id(mut self, artifact_id: impl Into<String>) -> Self {
        self.artifact_id = Some(artifact_id.into());
        self
    }

    /// Set or clear the classifier.
    #[must_use]
    pub fn classifier(mut self, classifier: Option<impl Into<String>>) -> Self {
        self.classifier = classifier.map(Into::into);
        self
    }

    /// Set or clear the type. A cleared type falls back to [`DEFAULT_TYPE`].
    #[must_use]
    pub fn type_(mut self, type_: Option<impl Into<String>>) -> Self {
        self.type_ = type_.map(Into::into);
        self
    }

    /// Build the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingRequiredField`] when the group id or the
    /// artifact id was never set.
    pub fn build(self) -> Result<ArtifactIdentifier> {
        Ok(ArtifactIdentifier {
            group_id: self.group_id.ok_or_else(|| Error::missing_field("groupId"))?,
            artifact_id: self
                .artifact_id
                .ok_or_else(|| Error::missing_field("artifactId"))?,
            classifier: self.classifier,
            type_: self.type_.unwrap_or_else(|| DEFAULT_TYPE.to_string()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn identifier(group: &str, artifact: &str) -> ArtifactIdentifier {
        ArtifactIdentifier::builder()
            .group_id(group)
            .artifact_id(artifact)
            .build()
            .unwrap()
    }

    #[test]
    fn test_type_defaults_to_jar() {
        let id = identifier("com.x", "lib");
        assert_eq!(id.type_(), "jar");
        assert_eq!(id.classifier(), None);
    }

    #[test]
    fn test_missing_group_id() {
        let result = ArtifactIdentifier::builder().artifact_id("lib").build();
        assert!(matches!(
            result,
            Err(Error::MissingRequiredField {
                field: "groupId",
                ..
            })
        ));
    }

    #[test]
    fn test_missing_artifact_id() {
        let result = ArtifactIdentifier::builder().group_id("com.x").build();
        assert!(matches!(
            result,
            Err(Error::MissingRequiredField {
                field: "artifactId",
                ..
            })
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(identifier("com.x", "lib").to_string(), "com.x:lib:jar");

        let id = ArtifactIdentifier::builder()
            .group_id("com.x")
            .artifact_id("lib")
            .classifier(Some("tests"))
            .type_(Some("test-jar"))
            .build()
            .unwrap();
        assert_eq!(id.to_string(), "com.x:lib:test-jar:tests");
    }

    #[test]
    fn test_classifier_distinguishes_identity() {
        let plain = identifier("com.x", "lib");
        let classified = ArtifactIdentifier::builder()
            .group_id("com.x")
            .artifact_id("lib")
            .classifier(Some("sources"))
            .build()
            .unwrap();

        assert_ne!(plain, classified);
        assert!(plain < classified);
    }

    #[test]
    fn test_explicit_default_type_equals_implicit() {
        let explicit = ArtifactIdentifier::builder()
            .group_id("com.x")
            .artifact_id("lib")
            .type_(Some("jar"))
            .build()
            .unwrap();
        assert_eq!(explicit, identifier("com.x", "lib"));
    }
}
