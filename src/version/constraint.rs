// src/version/constraint.rs

//! Version constraints in range syntax
//!
//! | Syntax      | Meaning                                   |
//! |-------------|-------------------------------------------|
//! | `*` or none | any version                               |
//! | `=1.2`      | exactly 1.2                               |
//! | `1.2`       | 1.2 or anything in the 1.2 series         |
//! | `1.2:`      | 1.2 or newer                              |
//! | `:1.2`      | up to and including the 1.2 series        |
//! | `1.2:1.4`   | from 1.2 through the 1.4 series           |
//! | `2.6:2.8,3.1:` | union of the listed ranges             |
//!
//! Upper bounds are inclusive of the whole series they name, so `:2.8`
//! admits `2.8.1`. A leading `@` is accepted and ignored, which lets the
//! same parser read `when = "@0.70.7:"` conditions.

use super::Version;
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A set of acceptable versions
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VersionConstraint {
    /// Any version is acceptable
    #[default]
    Any,
    /// Exactly this version
    Exact(Version),
    /// This version or any version in its series
    Series(Version),
    /// This version or newer
    AtLeast(Version),
    /// Up to and including this version's series
    AtMost(Version),
    /// Closed range, upper bound inclusive of its series
    Between(Version, Version),
    /// Union of constraints
    AnyOf(Vec<VersionConstraint>),
}

impl VersionConstraint {
    /// Parse a constraint string
    ///
    /// Examples:
    /// - "0.2.9:" → AtLeast(0.2.9)
    /// - "2.6:2.8,3.1:" → AnyOf([Between(2.6, 2.8), AtLeast(3.1)])
    /// - "@0.70.7:" → AtLeast(0.70.7)
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let body = trimmed.strip_prefix('@').unwrap_or(trimmed).trim();

        if body.is_empty() || body == "*" {
            return Ok(VersionConstraint::Any);
        }

        if body.contains(',') {
            let mut parts = Vec::new();
            for part in body.split(',') {
                let part = part.trim();
                if part.is_empty() {
                    return Err(invalid(s, "empty range in list"));
                }
                parts.push(Self::parse_single(s, part)?);
            }
            return Ok(VersionConstraint::AnyOf(parts));
        }

        Self::parse_single(s, body)
    }

    fn parse_single(input: &str, part: &str) -> Result<Self> {
        let version = |text: &str| {
            Version::parse(text).map_err(|e| invalid(input, &e.to_string()))
        };

        if let Some(rest) = part.strip_prefix('=') {
            return Ok(VersionConstraint::Exact(version(rest)?));
        }

        let Some((lo, hi)) = part.split_once(':') else {
            return Ok(VersionConstraint::Series(version(part)?));
        };

        match (lo.trim(), hi.trim()) {
            ("", "") => Ok(VersionConstraint::Any),
            (lo, "") => Ok(VersionConstraint::AtLeast(version(lo)?)),
            ("", hi) => Ok(VersionConstraint::AtMost(version(hi)?)),
            (lo, hi) => {
                let (lo, hi) = (version(lo)?, version(hi)?);
                if lo > hi && !lo.is_prefix_of(&hi) && !hi.is_prefix_of(&lo) {
                    return Err(invalid(input, &format!("range {}:{} is empty", lo, hi)));
                }
                Ok(VersionConstraint::Between(lo, hi))
            }
        }
    }

    /// Check if a version satisfies this constraint
    pub fn satisfies(&self, version: &Version) -> bool {
        match self {
            VersionConstraint::Any => true,
            VersionConstraint::Exact(v) => version == v,
            VersionConstraint::Series(v) => v.is_prefix_of(version),
            VersionConstraint::AtLeast(v) => version >= v,
            VersionConstraint::AtMost(v) => within_upper(version, v),
            VersionConstraint::Between(lo, hi) => version >= lo && within_upper(version, hi),
            VersionConstraint::AnyOf(parts) => parts.iter().any(|c| c.satisfies(version)),
        }
    }

    /// Whether this constraint accepts every version
    pub fn is_any(&self) -> bool {
        matches!(self, VersionConstraint::Any)
    }
}

fn within_upper(version: &Version, upper: &Version) -> bool {
    version <= upper || upper.is_prefix_of(version)
}

fn invalid(input: &str, reason: &str) -> Error {
    Error::InvalidConstraint {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionConstraint::Any => write!(f, ":"),
            VersionConstraint::Exact(v) => write!(f, "={}", v),
            VersionConstraint::Series(v) => write!(f, "{}", v),
            VersionConstraint::AtLeast(v) => write!(f, "{}:", v),
            VersionConstraint::AtMost(v) => write!(f, ":{}", v),
            VersionConstraint::Between(lo, hi) => write!(f, "{}:{}", lo, hi),
            VersionConstraint::AnyOf(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", part)?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for VersionConstraint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for VersionConstraint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("@{}", self))
    }
}

impl<'de> Deserialize<'de> for VersionConstraint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
