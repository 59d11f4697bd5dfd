//! Sorted, read-only collections of resolved artifacts.

use crate::artifact::{Artifact, DeclaredDependency, ResolvedDependency};
use crate::error::Result;
use crate::identifier::ArtifactIdentifier;

/// An ordered collection of [`Artifact`]s.
///
/// The input order is never trusted: every constructor sorts. Duplicate
/// identities are kept as given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifacts {
    artifacts: Vec<Artifact>,
}

impl Artifacts {
    fn sorted(mut artifacts: Vec<Artifact>) -> Self {
        artifacts.sort();
        Self { artifacts }
    }

    /// Build from the host resolver's output.
    ///
    /// # Errors
    ///
    /// Fails on the first record whose checksum cannot be read while
    /// integrity checking is enabled.
    pub fn from_resolved<'a>(
        resolved: impl IntoIterator<Item = &'a ResolvedDependency>,
        integrity_checking: bool,
    ) -> Result<Self> {
        let artifacts = resolved
            .into_iter()
            .map(|dependency| Artifact::from_resolved(dependency, integrity_checking))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::sorted(artifacts))
    }

    /// Build from artifacts that already exist. With integrity checking off
    /// their checksums are dropped.
    pub fn from_artifacts(
        artifacts: impl IntoIterator<Item = Artifact>,
        integrity_checking: bool,
    ) -> Self {
        let artifacts = artifacts
            .into_iter()
            .map(|artifact| {
                if integrity_checking {
                    artifact
                } else {
                    Artifact {
                        checksum: None,
                        ..artifact
                    }
                }
            })
            .collect();
        Self::sorted(artifacts)
    }

    /// Build from declared dependencies, which never carry checksums.
    ///
    /// # Errors
    ///
    /// Fails if an identifier cannot be built.
    pub fn from_declared<'a>(
        declared: impl IntoIterator<Item = &'a DeclaredDependency>,
    ) -> Result<Self> {
        let artifacts = declared
            .into_iter()
            .map(Artifact::from_declared)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::sorted(artifacts))
    }

    /// First artifact with exactly this identifier.
    ///
    /// [`Reconciler::reconcile`](crate::Reconciler::reconcile) builds an
    /// index that keeps the same first occurrence, so classifying a record
    /// against `by(&record.identifier)` gives the finding reconciliation
    /// reports for it.
    #[must_use]
    pub fn by(&self, identifier: &ArtifactIdentifier) -> Option<&Artifact> {
        self.artifacts
            .iter()
            .find(|artifact| artifact.identifier == *identifier)
    }

    /// The artifacts in sorted order.
    #[must_use]
    pub fn as_slice(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Iterate in sorted order.
    pub fn iter(&self) -> std::slice::Iter<'_, Artifact> {
        self.artifacts.iter()
    }

    /// Number of artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl<'a> IntoIterator for &'a Artifacts {
    type Item = &'a Artifact;
    type IntoIter = std::slice::Iter<'a, Artifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
