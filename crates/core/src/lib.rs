//! Lock manifest model and reconciliation engine for deplock.
//!
//! deplock checks that the dependencies a build resolves match a recorded,
//! version-pinned lock manifest before the build proceeds. It detects drift
//! (added, removed or retargeted dependencies) and, with integrity checking
//! enabled, checksum mismatches.
//!
//! # Core Types
//!
//! - [`ArtifactIdentifier`] - Identity of a dependency, the join key
//! - [`Checksum`] - Validated `<algorithm>:<digest>` string
//! - [`Artifact`] - A dependency the build actually resolved
//! - [`LockedDependency`] - One record of the lock manifest
//! - [`Artifacts`] - Sorted collection of resolved artifacts
//! - [`LockedDependencies`] - The lock manifest document
//! - [`Reconciler`] / [`Report`] - Classification of every record
//!
//! # Example
//!
//! ```
//! use deplock_core::{
//!     Artifacts, LockConfig, LockedDependencies, OutcomeKind, Reconciler, ResolvedDependency,
//! };
//!
//! let config = LockConfig::with_integrity();
//! let manifest = LockedDependencies::from_json_str(
//!     r#"[{"groupId": "com.x", "artifactId": "lib", "version": "1.2.3",
//!          "scope": "compile", "checksum": "sha256:abc"}]"#,
//!     &config,
//! )?;
//! let resolved: Vec<ResolvedDependency> = serde_json::from_str(
//!     r#"[{"groupId": "com.x", "artifactId": "lib", "version": "1.2.3",
//!          "scope": "compile", "checksum": "sha256:def"}]"#,
//! )?;
//! let artifacts = Artifacts::from_resolved(&resolved, config.integrity_checking)?;
//!
//! let report = Reconciler::new(&config).reconcile(&manifest, &artifacts);
//! assert_eq!(report.count(OutcomeKind::ChecksumMismatch), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod artifact;
pub mod artifacts;
pub mod checksum;
pub mod config;
pub mod error;
pub mod identifier;
pub mod locked;
pub mod lockfile;
pub mod reconcile;
pub mod version;

pub use artifact::{Artifact, DEFAULT_SCOPE, DeclaredDependency, ResolvedDependency};
pub use artifacts::Artifacts;
pub use checksum::{Checksum, ChecksumAlgorithm};
pub use config::LockConfig;
pub use error::{Error, Result};
pub use identifier::{ArtifactIdentifier, ArtifactIdentifierBuilder, DEFAULT_TYPE};
pub use locked::{Comparison, Divergence, LockRecord, LockedDependency, WithMyVersion};
pub use lockfile::LockedDependencies;
pub use reconcile::{Finding, Outcome, OutcomeKind, Reconciler, Report};
pub use version::{VersionMatching, VersionPattern};
