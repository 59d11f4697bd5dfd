//! Configuration shared by every construction path.

use crate::version::VersionMatching;
use serde::{Deserialize, Serialize};

/// Lock checking configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LockConfig {
    /// Read, write and compare checksums. When disabled, checksums found in a
    /// manifest are dropped at load time and never influence a verdict.
    pub integrity_checking: bool,

    /// How locked version strings are interpreted.
    pub version_matching: VersionMatching,
}

impl LockConfig {
    /// Configuration with integrity checking switched on.
    #[must_use]
    pub fn with_integrity() -> Self {
        Self {
            integrity_checking: true,
            ..Self::default()
        }
    }

    /// Override the version matching mode.
    #[must_use]
    pub fn version_matching(mut self, matching: VersionMatching) -> Self {
        self.version_matching = matching;
        self
    }
}
