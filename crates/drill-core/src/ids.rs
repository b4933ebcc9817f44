//! Record identifiers and content-addressed diagram artifact names.
//!
//! Diagram artifacts are named `<namespace>-<record id>-<content hash>.svg`.
//! The record id segment scopes every artifact to the card that owns it, so
//! two cards rendering the same board never share (or delete) each other's
//! files.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default artifact namespace.
pub const DEFAULT_NAMESPACE: &str = "chess-opening-trainer";

/// File extension of every diagram artifact.
pub const ARTIFACT_EXT: &str = "svg";

/// Length of the lowercase hex content hash (SHA-1).
pub const HASH_LEN: usize = 40;

/// Identifier the persistence layer assigns to a card record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A parsed artifact name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactName {
    pub record: RecordId,
    pub hash: String,
    name: String,
}

impl ArtifactName {
    /// Build the artifact name for `record` and `hash` in `namespace`.
    #[must_use]
    pub fn new(namespace: &str, record: RecordId, hash: &str) -> Self {
        Self {
            record,
            hash: hash.to_string(),
            name: format!("{namespace}-{record}-{hash}.{ARTIFACT_EXT}"),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.name
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Recognizes artifact names of a single namespace.
#[derive(Debug, Clone)]
pub struct ArtifactMatcher {
    namespace: String,
    pattern: Regex,
}

impl ArtifactMatcher {
    /// Compile a matcher for `namespace`.
    ///
    /// # Errors
    ///
    /// Returns `regex::Error` only if the escaped pattern exceeds the regex
    /// size limit, which cannot happen for sane namespaces.
    pub fn new(namespace: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(
            r"^{}-([1-9][0-9]*)-([0-9a-f]{{{HASH_LEN}}})\.{ARTIFACT_EXT}$",
            regex::escape(namespace)
        ))?;
        Ok(Self {
            namespace: namespace.to_string(),
            pattern,
        })
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Parse `name`; `None` if it is not an artifact of this namespace.
    #[must_use]
    pub fn parse(&self, name: &str) -> Option<ArtifactName> {
        let caps = self.pattern.captures(name)?;
        let record = caps.get(1)?.as_str().parse::<i64>().ok()?;
        let hash = caps.get(2)?.as_str();
        Some(ArtifactName::new(&self.namespace, RecordId::new(record), hash))
    }
}
