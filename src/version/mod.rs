// src/version/mod.rs

//! Version identifiers and version constraints for recipes
//!
//! Recipe versions are compared structurally, never as strings, so that
//! `0.70.10` sorts after `0.70.9`. A version is a list of release components
//! with an optional `-prerelease` suffix:
//!
//! - `1.0.4` → `[1, 0, 4]`
//! - `1.2b3` → `[1, 2, "b", 3]`
//! - `2.0.0-rc.1` → `[2, 0, 0]` with prerelease `rc.1`
//!
//! Components are split on `.` and `_` and at every digit/letter boundary.

mod constraint;

pub use constraint::VersionConstraint;

use crate::error::{Error, Result};
use semver::Prerelease;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// One release component of a version
///
/// Alphabetic components sort before numeric ones, so `1.2a` < `1.2.0`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Component {
    Alpha(String),
    Numeric(u64),
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Alpha(s) => write!(f, "{}", s),
            Component::Numeric(n) => write!(f, "{}", n),
        }
    }
}

/// A parsed, comparable version identifier
///
/// The original text is kept for display, so a version always prints the
/// way the recipe author wrote it.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    components: Vec<Component>,
    prerelease: Prerelease,
}

impl Version {
    /// Parse a version string
    ///
    /// Examples:
    /// - "0.70.7" → [0, 70, 7]
    /// - "2.6" → [2, 6]
    /// - "1.0.0-rc.1" → [1, 0, 0], prerelease "rc.1"
    pub fn parse(s: &str) -> Result<Self> {
        let raw = s.trim();
        let invalid = |reason: &str| Error::InvalidVersion {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        if raw.is_empty() {
            return Err(invalid("version is empty"));
        }

        let (release, prerelease) = match raw.split_once('-') {
            Some((release, pre)) => {
                let pre = Prerelease::new(pre)
                    .map_err(|e| invalid(&format!("bad prerelease: {}", e)))?;
                if pre.is_empty() {
                    return Err(invalid("empty prerelease after '-'"));
                }
                (release, pre)
            }
            None => (raw, Prerelease::EMPTY),
        };

        let mut components = Vec::new();
        for segment in release.split(['.', '_']) {
            if segment.is_empty() {
                return Err(invalid("empty release component"));
            }
            split_segment(segment, &mut components).map_err(|reason| invalid(&reason))?;
        }

        Ok(Self {
            raw: raw.to_string(),
            components,
            prerelease,
        })
    }

    /// The version as written in the recipe
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Release components, without the prerelease
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Prerelease suffix, if any
    pub fn prerelease(&self) -> Option<&str> {
        if self.prerelease.is_empty() {
            None
        } else {
            Some(self.prerelease.as_str())
        }
    }

    pub fn is_prerelease(&self) -> bool {
        !self.prerelease.is_empty()
    }

    /// First release component, if numeric
    pub fn major(&self) -> Option<u64> {
        self.numeric(0)
    }

    /// Second release component, if numeric
    pub fn minor(&self) -> Option<u64> {
        self.numeric(1)
    }

    /// Third release component, if numeric
    pub fn patch(&self) -> Option<u64> {
        self.numeric(2)
    }

    fn numeric(&self, index: usize) -> Option<u64> {
        match self.components.get(index) {
            Some(Component::Numeric(n)) => Some(*n),
            _ => None,
        }
    }

    /// Check whether `other` lies within this version's series
    ///
    /// `1.2` is a prefix of `1.2`, `1.2.0` and `1.2.9`, but not of `1.20`.
    /// A prerelease version is only a prefix of itself.
    pub fn is_prefix_of(&self, other: &Version) -> bool {
        if self.is_prerelease() {
            return self == other;
        }
        other.components.starts_with(&self.components)
    }
}

/// Split one separator-delimited segment at digit/letter boundaries
fn split_segment(segment: &str, out: &mut Vec<Component>) -> std::result::Result<(), String> {
    let mut rest = segment;
    while let Some(first) = rest.chars().next() {
        if !first.is_ascii_alphanumeric() {
            return Err(format!("unexpected character '{}'", first));
        }
        let numeric = first.is_ascii_digit();
        let end = rest
            .find(|c: char| !c.is_ascii_alphanumeric() || c.is_ascii_digit() != numeric)
            .unwrap_or(rest.len());
        let (token, tail) = rest.split_at(end);

        if numeric {
            let n = token
                .parse::<u64>()
                .map_err(|e| format!("component '{}' out of range: {}", token, e))?;
            out.push(Component::Numeric(n));
        } else {
            out.push(Component::Alpha(token.to_string()));
        }
        rest = tail;
    }
    Ok(())
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        // A release sorts after any of its prereleases; semver::Prerelease
        // orders the empty prerelease last.
        self.components
            .cmp(&other.components)
            .then_with(|| self.prerelease.cmp(&other.prerelease))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.components.hash(state);
        self.prerelease.hash(state);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
