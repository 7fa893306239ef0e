// src/recipe/dependency.rs

//! Dependency declarations
//!
//! A dependency names another package, optionally constrains its version,
//! says when it is needed (build, link, run) and may apply only to some
//! versions of the declaring package:
//!
//! ```toml
//! [[dependencies]]
//! spec = "py-dill@0.2.9:"
//! type = ["build", "run"]
//! when = "@0.70.7:"
//! ```
//!
//! Without `type`, a dependency is needed to build and link.

use crate::error::{Error, Result};
use crate::version::{Version, VersionConstraint};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// When a dependency is needed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    Build,
    Link,
    Run,
}

impl DependencyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyType::Build => "build",
            DependencyType::Link => "link",
            DependencyType::Run => "run",
        }
    }
}

/// Coarse classification of a dependency's types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    /// Needed only while building (build and/or link)
    BuildTime,
    /// Needed only when running
    RunTime,
    /// Needed both to build and to run
    Both,
}

/// A declared dependency of a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DependencyEntry", into = "DependencyEntry")]
pub struct Dependency {
    /// Name of the required package
    pub name: String,
    /// Acceptable versions of the required package
    pub constraint: VersionConstraint,
    /// When the dependency is needed
    pub types: BTreeSet<DependencyType>,
    /// Versions of the declaring package this applies to (all if `None`)
    pub when: Option<VersionConstraint>,
}

impl Dependency {
    /// Create a dependency from a spec string such as `python@2.6:2.8,3.1:`
    pub fn new(spec: &str) -> Result<Self> {
        let (name, constraint) = parse_spec(spec)?;
        Ok(Self {
            name,
            constraint,
            types: default_types(),
            when: None,
        })
    }

    /// Replace the dependency types
    pub fn with_types(mut self, types: impl IntoIterator<Item = DependencyType>) -> Self {
        self.types = types.into_iter().collect();
        self
    }

    /// Restrict the dependency to some versions of the declaring package
    pub fn applies_when(mut self, condition: VersionConstraint) -> Self {
        self.when = Some(condition);
        self
    }

    /// Check whether this dependency applies to `version` of the declaring package
    pub fn applies_to(&self, version: &Version) -> bool {
        self.when.as_ref().is_none_or(|when| when.satisfies(version))
    }

    pub fn is_build(&self) -> bool {
        self.types.contains(&DependencyType::Build) || self.types.contains(&DependencyType::Link)
    }

    pub fn is_run(&self) -> bool {
        self.types.contains(&DependencyType::Run)
    }

    pub fn kind(&self) -> DependencyKind {
        match (self.is_build(), self.is_run()) {
            (true, true) => DependencyKind::Both,
            (false, true) => DependencyKind::RunTime,
            _ => DependencyKind::BuildTime,
        }
    }

    /// The spec string, `name` or `name@constraint`
    pub fn spec(&self) -> String {
        if self.constraint.is_any() {
            self.name.clone()
        } else {
            format!("{}@{}", self.name, self.constraint)
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types: Vec<&str> = self.types.iter().map(|t| t.as_str()).collect();
        write!(f, "{} ({})", self.spec(), types.join(", "))?;
        if let Some(when) = &self.when {
            write!(f, " when @{}", when)?;
        }
        Ok(())
    }
}

fn default_types() -> BTreeSet<DependencyType> {
    [DependencyType::Build, DependencyType::Link].into_iter().collect()
}

/// Split a spec string into package name and version constraint
pub fn parse_spec(spec: &str) -> Result<(String, VersionConstraint)> {
    let spec = spec.trim();
    let (name, constraint) = match spec.split_once('@') {
        Some((name, rest)) => (name.trim(), VersionConstraint::parse(rest)?),
        None => (spec, VersionConstraint::Any),
    };

    if !is_valid_name(name) {
        return Err(Error::InvalidConstraint {
            input: spec.to_string(),
            reason: format!("invalid package name '{}'", name),
        });
    }

    Ok((name.to_string(), constraint))
}

/// Package names: lowercase alphanumerics plus `-`, `_` and `.`, starting
/// with an alphanumeric
pub fn is_valid_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_lowercase() || c.is_ascii_digit())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.'))
}

/// On-disk shape of a dependency
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DependencyEntry {
    spec: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    types: Option<TypeList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    when: Option<VersionConstraint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum TypeList {
    One(DependencyType),
    Many(Vec<DependencyType>),
}

impl TryFrom<DependencyEntry> for Dependency {
    type Error = Error;

    fn try_from(entry: DependencyEntry) -> Result<Self> {
        let mut dep = Dependency::new(&entry.spec)?;

        match entry.types {
            Some(TypeList::One(t)) => dep = dep.with_types([t]),
            Some(TypeList::Many(types)) if types.is_empty() => {
                return Err(Error::ParseError(format!(
                    "dependency '{}' has an empty type list",
                    entry.spec
                )));
            }
            Some(TypeList::Many(types)) => dep = dep.with_types(types),
            None => {}
        }

        dep.when = entry.when;
        Ok(dep)
    }
}

impl From<Dependency> for DependencyEntry {
    fn from(dep: Dependency) -> Self {
        let types = if dep.types == default_types() {
            None
        } else {
            Some(TypeList::Many(dep.types.iter().copied().collect()))
        };
        Self {
            spec: dep.spec(),
            types,
            when: dep.when,
        }
    }
}
