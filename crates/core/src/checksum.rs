//! Self-describing checksum strings (`<algorithm>:<digest>`).
//!
//! Only the header is interpreted here. Digests are produced by the host
//! build tool and compared verbatim; nothing in this crate hashes content.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Context used when a lock record carries a checksum this version cannot read.
pub const UNSUPPORTED_CHECKSUM_CONTEXT: &str =
    "Encountered unsupported checksum format, consider using a later version of deplock";

/// Digest algorithms recognised in a checksum header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChecksumAlgorithm {
    /// `sha1:`
    Sha1,
    /// `sha256:`
    Sha256,
    /// `sha384:`
    Sha384,
    /// `sha512:`
    Sha512,
}

impl ChecksumAlgorithm {
    /// All supported algorithms.
    pub const ALL: [Self; 4] = [Self::Sha1, Self::Sha256, Self::Sha384, Self::Sha512];

    /// Header tag as written before the separator.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|algorithm| algorithm.tag() == tag)
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A checksum whose algorithm header has been validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Checksum {
    algorithm: ChecksumAlgorithm,
    digest: String,
}

impl Checksum {
    /// Parse `value`, failing with a message that embeds `context` when the
    /// header is missing or unrecognised.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedChecksumFormat`] when the value has no
    /// `<algorithm>:` prefix, names an unknown algorithm, or carries an empty
    /// or malformed digest.
    pub fn check_algorithm_header(value: &str, context: &str) -> Result<Self> {
        let unsupported = || Error::unsupported_checksum(value, context);

        let (tag, digest) = value.split_once(':').ok_or_else(unsupported)?;
        let algorithm = ChecksumAlgorithm::from_tag(tag).ok_or_else(unsupported)?;
        if digest.is_empty() || !digest.chars().all(is_digest_char) {
            return Err(unsupported());
        }

        Ok(Self {
            algorithm,
            digest: digest.to_string(),
        })
    }

    /// Build a checksum from an algorithm and an already encoded digest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedChecksumFormat`] for an empty or malformed digest.
    pub fn new(algorithm: ChecksumAlgorithm, digest: impl Into<String>) -> Result<Self> {
        let value = format!("{algorithm}:{}", digest.into());
        Self::check_algorithm_header(&value, UNSUPPORTED_CHECKSUM_CONTEXT)
    }

    /// Algorithm named in the header.
    #[must_use]
    pub const fn algorithm(&self) -> ChecksumAlgorithm {
        self.algorithm
    }

    /// Encoded digest following the header.
    #[must_use]
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

// hex and both base64 alphabets
fn is_digest_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=' | '-' | '_')
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.digest)
    }
}

impl FromStr for Checksum {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::check_algorithm_header(s, UNSUPPORTED_CHECKSUM_CONTEXT)
    }
}

impl Serialize for Checksum {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Checksum {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_known_headers() {
        for algorithm in ChecksumAlgorithm::ALL {
            let value = format!("{}:abc123", algorithm.tag());
            let checksum: Checksum = value.parse().unwrap();
            assert_eq!(checksum.algorithm(), algorithm);
            assert_eq!(checksum.digest(), "abc123");
            assert_eq!(checksum.to_string(), value);
        }
    }

    #[test]
    fn test_accepts_base64_digest() {
        let checksum: Checksum = "sha512:q1w2E3r4+/t5==".parse().unwrap();
        assert_eq!(checksum.digest(), "q1w2E3r4+/t5==");
    }

    #[test]
    fn test_rejects_missing_header() {
        let error = Checksum::check_algorithm_header("abcdef", "while loading").unwrap_err();
        match error {
            Error::UnsupportedChecksumFormat { value, context } => {
                assert_eq!(value, "abcdef");
                assert_eq!(context, "while loading");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unknown_algorithm() {
        assert!("md5:abc".parse::<Checksum>().is_err());
        assert!("SHA256:abc".parse::<Checksum>().is_err());
        assert!("blake3:abc".parse::<Checksum>().is_err());
    }

    #[test]
    fn test_rejects_empty_or_malformed_digest() {
        assert!("sha256:".parse::<Checksum>().is_err());
        assert!("sha256:ab cd".parse::<Checksum>().is_err());
        assert!("sha256:abc:def".parse::<Checksum>().is_err());
    }

    #[test]
    fn test_equality_is_exact() {
        let lower: Checksum = "sha256:abc".parse().unwrap();
        let upper: Checksum = "sha256:ABC".parse().unwrap();
        let other_algorithm: Checksum = "sha512:abc".parse().unwrap();
        assert_ne!(lower, upper);
        assert_ne!(lower, other_algorithm);
    }

    #[test]
    fn test_new_matches_parse() {
        let built = Checksum::new(ChecksumAlgorithm::Sha256, "abc").unwrap();
        assert_eq!(built, "sha256:abc".parse().unwrap());
        assert!(Checksum::new(ChecksumAlgorithm::Sha256, "").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let checksum: Checksum = "sha256:abc".parse().unwrap();
        let json = serde_json::to_string(&checksum).unwrap();
        assert_eq!(json, r#""sha256:abc""#);

        let parsed: Checksum = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, checksum);
        assert!(serde_json::from_str::<Checksum>(r#""nope""#).is_err());
    }
}
