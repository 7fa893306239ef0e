// src/recipe/format.rs

//! Recipe file format definitions
//!
//! Recipes are TOML files that describe where a package's sources live,
//! which versions exist and what the package depends on.

use crate::error::{Error, Result};
use crate::hash::Checksum;
use crate::recipe::dependency::Dependency;
use crate::recipe::url::{self, ArchiveFormat, UrlRule};
use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// A complete package recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Package metadata
    pub package: PackageSection,

    /// Download location
    pub source: SourceSection,

    /// Variables for `%(name)s` substitution in URL templates (optional)
    #[serde(default)]
    pub variables: BTreeMap<String, String>,

    /// Known versions with their archive checksums
    #[serde(default)]
    pub versions: Vec<VersionEntry>,

    /// Declared dependencies
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl Recipe {
    pub fn name(&self) -> &str {
        &self.package.name
    }

    pub fn homepage(&self) -> Option<&str> {
        self.package.homepage.as_deref()
    }

    /// Substitute recipe variables in a string
    ///
    /// Replaces `%(name)s` with the package name and `%(key)s` with entries
    /// from the [variables] section. `%(version)s` is left for
    /// [`Recipe::url_for_version`].
    pub fn substitute(&self, template: &str) -> String {
        let mut result = template.replace("%(name)s", &self.package.name);

        for (key, value) in &self.variables {
            result = result.replace(&format!("%({})s", key), value);
        }

        result
    }

    /// Compute the download URL for a version
    ///
    /// The version does not have to be declared; only the template and the
    /// URL rules take part.
    pub fn url_for_version(&self, version: &Version) -> Result<String> {
        let rule = url::rule_for(&self.source.rules, version);
        let template = rule
            .and_then(|r| r.template.as_deref())
            .unwrap_or(&self.source.url);

        let mut resolved = url::render(&self.substitute(template), version)?;
        if let Some(format) = rule.and_then(|r| r.format) {
            resolved = url::with_format(&resolved, format)?;
        }

        debug!(
            package = %self.package.name,
            version = %version,
            rule = ?rule.map(|r| r.since.as_str()),
            "resolved source url {}",
            resolved
        );
        Ok(resolved)
    }

    /// Compute the download URL for a version given as a string
    pub fn resolve_url(&self, version: &str) -> Result<String> {
        self.url_for_version(&Version::parse(version)?)
    }

    /// Get the archive filename for a version
    pub fn archive_filename(&self, version: &Version) -> Result<String> {
        let url = self.url_for_version(version)?;
        Ok(url.rsplit('/').next().unwrap_or(&url).to_string())
    }

    /// Look up a declared version
    pub fn version_entry(&self, version: &Version) -> Option<&VersionEntry> {
        self.versions.iter().find(|entry| &entry.version == version)
    }

    pub fn has_version(&self, version: &Version) -> bool {
        self.version_entry(version).is_some()
    }

    /// Checksum of a declared version's archive
    pub fn checksum_for(&self, version: &Version) -> Option<&Checksum> {
        self.version_entry(version).map(|entry| &entry.checksum)
    }

    /// Declared versions, newest first
    pub fn sorted_versions(&self) -> Vec<&VersionEntry> {
        let mut entries: Vec<&VersionEntry> = self.versions.iter().collect();
        entries.sort_by(|a, b| b.version.cmp(&a.version));
        entries
    }

    /// The version a fetch should default to
    ///
    /// An entry flagged `preferred` wins. Otherwise the newest version that
    /// is neither deprecated nor a prerelease, falling back to the newest.
    pub fn preferred_version(&self) -> Option<&VersionEntry> {
        if let Some(entry) = self.versions.iter().find(|entry| entry.preferred) {
            return Some(entry);
        }

        let sorted = self.sorted_versions();
        sorted
            .iter()
            .find(|entry| !entry.deprecated && !entry.version.is_prerelease())
            .or_else(|| sorted.first())
            .copied()
    }

    /// Dependencies that apply to a version of this package
    pub fn dependencies_for(&self, version: &Version) -> Vec<&Dependency> {
        self.dependencies
            .iter()
            .filter(|dep| dep.applies_to(version))
            .collect()
    }

    /// Build-time (build or link) dependencies of a version
    pub fn build_dependencies_for(&self, version: &Version) -> Vec<&Dependency> {
        self.dependencies_for(version)
            .into_iter()
            .filter(|dep| dep.is_build())
            .collect()
    }

    /// Run-time dependencies of a version
    pub fn run_dependencies_for(&self, version: &Version) -> Vec<&Dependency> {
        self.dependencies_for(version)
            .into_iter()
            .filter(|dep| dep.is_run())
            .collect()
    }

    /// Everything a fetcher needs to download and verify a declared version
    pub fn fetch_plan(&self, version: &Version) -> Result<SourceFetch> {
        let entry = self.version_entry(version).ok_or_else(|| {
            Error::NotFound(format!(
                "{} has no version {}",
                self.package.name, version
            ))
        })?;

        let url = self.url_for_version(&entry.version)?;
        let filename = url.rsplit('/').next().unwrap_or(&url).to_string();

        Ok(SourceFetch {
            format: ArchiveFormat::from_path(&filename),
            filename,
            url,
            checksum: entry.checksum.clone(),
        })
    }
}

/// Package metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSection {
    /// Package name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: Option<String>,

    /// Homepage URL
    #[serde(default)]
    pub homepage: Option<String>,

    /// Build system the package uses
    #[serde(default)]
    pub build_system: BuildSystem,
}

/// Build system family of a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BuildSystem {
    /// configure && make && make install
    Autotools,
    /// setup.py / pip installable Python package
    Python,
    /// Anything else
    #[default]
    Generic,
}

impl BuildSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildSystem::Autotools => "autotools",
            BuildSystem::Python => "python",
            BuildSystem::Generic => "generic",
        }
    }
}

/// Source location section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    /// Download URL template
    ///
    /// Either contains `%(version)s` or names a concrete archive whose
    /// embedded version is replaced.
    /// Example: `https://www.x.org/archive/individual/app/xditview-1.0.4.tar.gz`
    pub url: String,

    /// Version-dependent overrides
    #[serde(default)]
    pub rules: Vec<UrlRule>,
}

/// One declared version of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    pub version: Version,

    /// Checksum of the source archive (sha256:...)
    pub checksum: Checksum,

    /// Default choice when no version is requested
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub preferred: bool,

    /// Still fetchable but not chosen by default
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
}

/// Resolved download for one version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFetch {
    pub url: String,
    pub filename: String,
    pub format: Option<ArchiveFormat>,
    pub checksum: Checksum,
}
