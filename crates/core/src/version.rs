//! Locked version constraints.
//!
//! A locked version is a constraint evaluated against a candidate version
//! string. It is either a literal, which only matches itself, or an anchored
//! regular expression that must match the whole candidate.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How manifest version strings are turned into [`VersionPattern`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionMatching {
    /// Plain version strings are literals, anything else is a regex.
    #[default]
    Auto,
    /// Every version is compared literally.
    Literal,
    /// Every version is a whole-string regex, so `.` matches any character.
    Regex,
}

impl std::str::FromStr for VersionMatching {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "literal" => Ok(Self::Literal),
            "regex" => Ok(Self::Regex),
            _ => Err(format!("Unknown version matching mode: {s}")),
        }
    }
}

/// A version constraint taken from a lock record.
#[derive(Debug, Clone)]
pub enum VersionPattern {
    /// Matches exactly this string.
    Literal(String),
    /// Matches any string the anchored expression accepts.
    Regex {
        /// The pattern as written in the manifest.
        source: String,
        /// `^(?:source)$`
        regex: Regex,
    },
}

impl VersionPattern {
    /// Interpret `version` according to `matching`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVersionPattern`] when the string is read as a
    /// regex and does not compile.
    pub fn parse(version: &str, matching: VersionMatching) -> Result<Self> {
        let as_regex = match matching {
            VersionMatching::Literal => false,
            VersionMatching::Regex => true,
            VersionMatching::Auto => !is_plain_version(version),
        };

        if as_regex {
            Self::regex(version)
        } else {
            Ok(Self::literal(version))
        }
    }

    /// A constraint matching only `version`, written so that
    /// [`VersionPattern::parse`] under `matching` reads it back unchanged.
    ///
    /// Where `matching` would reinterpret the plain text, the version is
    /// escaped and stored as a regex.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVersionPattern`] if the escaped version exceeds
    /// the regex size limit.
    pub fn exact(version: &str, matching: VersionMatching) -> Result<Self> {
        let reads_back_literally = match matching {
            VersionMatching::Literal => true,
            VersionMatching::Regex => false,
            VersionMatching::Auto => is_plain_version(version),
        };

        if reads_back_literally {
            Ok(Self::literal(version))
        } else {
            Self::regex(&regex::escape(version))
        }
    }

    /// A literal constraint.
    pub fn literal(version: impl Into<String>) -> Self {
        Self::Literal(version.into())
    }

    /// A whole-string regex constraint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVersionPattern`] when `pattern` does not compile.
    pub fn regex(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{pattern})$"))
            .map_err(|source| Error::invalid_version_pattern(pattern, source))?;
        Ok(Self::Regex {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Whether `candidate` satisfies this constraint.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Literal(version) => version == candidate,
            Self::Regex { regex, .. } => regex.is_match(candidate),
        }
    }

    /// The constraint as written in the manifest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal(version) => version,
            Self::Regex { source, .. } => source,
        }
    }

    /// Whether this constraint is a regex.
    #[must_use]
    pub const fn is_regex(&self) -> bool {
        matches!(self, Self::Regex { .. })
    }
}

fn is_plain_version(version: &str) -> bool {
    !version.is_empty()
        && version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '+'))
}

impl PartialEq for VersionPattern {
    fn eq(&self, other: &Self) -> bool {
        self.is_regex() == other.is_regex() && self.as_str() == other.as_str()
    }
}

impl Eq for VersionPattern {}

impl std::hash::Hash for VersionPattern {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.is_regex().hash(state);
        self.as_str().hash(state);
    }
}

impl fmt::Display for VersionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
