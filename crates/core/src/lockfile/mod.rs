//! The lock manifest document: an ordered sequence of lock records.
//!
//! ## Structure
//!
//! ```json
//! {
//!   "dependencies": [
//!     {
//!       "groupId": "com.example",
//!       "artifactId": "lib",
//!       "version": "1.2.3",
//!       "scope": "compile",
//!       "type": "jar",
//!       "optional": false,
//!       "checksum": "sha256:9f86d0..."
//!     }
//!   ]
//! }
//! ```
//!
//! A bare array of records is accepted on input as well. Loading is all or
//! nothing: the first bad record aborts the whole document.

use crate::artifacts::Artifacts;
use crate::config::LockConfig;
use crate::error::{Error, Result};
use crate::locked::{LockRecord, LockedDependency};
use serde::Serialize;
use std::collections::BTreeSet;

/// Key holding the record array in the object form of the document.
pub const DEPENDENCIES_KEY: &str = "dependencies";

/// All records of a lock manifest, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockedDependencies {
    dependencies: Vec<LockedDependency>,
}

#[derive(Serialize)]
struct Document<'a> {
    dependencies: &'a [LockRecord],
}

impl LockedDependencies {
    /// Wrap already validated records.
    #[must_use]
    pub fn new(dependencies: Vec<LockedDependency>) -> Self {
        Self { dependencies }
    }

    /// Lock every artifact of a resolved collection at its exact version.
    ///
    /// Loading the written document with the same `config` reproduces this
    /// manifest, and it reconciles cleanly against `artifacts`.
    ///
    /// # Errors
    ///
    /// Propagates [`LockedDependency::from_artifact`] failures.
    pub fn from_artifacts(artifacts: &Artifacts, config: &LockConfig) -> Result<Self> {
        let mut dependencies = artifacts
            .iter()
            .map(|artifact| LockedDependency::from_artifact(artifact, config))
            .collect::<Result<Vec<_>>>()?;
        dependencies.sort();
        Ok(Self { dependencies })
    }

    /// Load a manifest document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidManifest`] when the document is neither an
    /// array nor an object with a `dependencies` array, and any record error
    /// from [`LockedDependency::from_json`] tagged with the record position.
    pub fn from_json(json: &serde_json::Value, config: &LockConfig) -> Result<Self> {
        let records = match json {
            serde_json::Value::Array(records) => records,
            serde_json::Value::Object(map) => match map.get(DEPENDENCIES_KEY) {
                Some(serde_json::Value::Array(records)) => records,
                Some(_) => {
                    return Err(Error::invalid_manifest(format!(
                        "'{DEPENDENCIES_KEY}' must be an array"
                    )));
                }
                None => {
                    return Err(Error::invalid_manifest(format!(
                        "missing '{DEPENDENCIES_KEY}' array"
                    )));
                }
            },
            _ => return Err(Error::invalid_manifest("expected an array or an object")),
        };

        let dependencies = records
            .iter()
            .enumerate()
            .map(|(position, record)| {
                LockedDependency::from_json(record, config).map_err(|e| e.at_record(position))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut seen = BTreeSet::new();
        for dependency in &dependencies {
            if !seen.insert(&dependency.identifier) {
                tracing::warn!(
                    identifier = %dependency.identifier,
                    "Lock manifest lists the same dependency more than once"
                );
            }
        }

        tracing::debug!(
            records = dependencies.len(),
            integrity_checking = config.integrity_checking,
            "Loaded lock manifest"
        );
        Ok(Self { dependencies })
    }

    /// Parse and load a manifest from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for malformed text, otherwise as
    /// [`LockedDependencies::from_json`].
    pub fn from_json_str(text: &str, config: &LockConfig) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Self::from_json(&json, config)
    }

    /// Serialize to pretty-printed JSON in object form, records in the
    /// emission field order.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` failures, which do not occur for this shape.
    pub fn to_json_string(&self) -> Result<String> {
        let records: Vec<LockRecord> = self
            .dependencies
            .iter()
            .map(LockedDependency::to_record)
            .collect();
        Ok(serde_json::to_string_pretty(&Document {
            dependencies: &records,
        })?)
    }

    /// The records in document order.
    #[must_use]
    pub fn as_slice(&self) -> &[LockedDependency] {
        &self.dependencies
    }

    /// Iterate in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, LockedDependency> {
        self.dependencies.iter()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    /// Whether the manifest has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}

impl<'a> IntoIterator for &'a LockedDependencies {
    type Item = &'a LockedDependency;
    type IntoIter = std::slice::Iter<'a, LockedDependency>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
