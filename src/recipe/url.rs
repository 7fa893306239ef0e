// src/recipe/url.rs

//! Download URL templates and version-dependent URL rules
//!
//! A recipe's source URL names one concrete download. The version inside it
//! acts as the placeholder for every other version, either as the explicit
//! `%(version)s` token or as the version embedded in the archive name:
//!
//! ```text
//! https://www.x.org/archive/individual/app/xditview-%(version)s.tar.gz
//! https://pypi.io/packages/source/m/multiprocess/multiprocess-0.70.5.zip
//! ```
//!
//! Upstreams sometimes change packaging at a release boundary. A
//! [`UrlRule`] switches the archive format, or the whole template, from a
//! given version on.

use crate::error::{Error, Result};
use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Explicit version placeholder in URL templates
pub const VERSION_PLACEHOLDER: &str = "%(version)s";

/// Source archive formats recognised in download URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArchiveFormat {
    #[serde(rename = "tar.gz")]
    TarGz,
    #[serde(rename = "tar.bz2")]
    TarBz2,
    #[serde(rename = "tar.xz")]
    TarXz,
    #[serde(rename = "tgz")]
    Tgz,
    #[serde(rename = "tar")]
    Tar,
    #[serde(rename = "zip")]
    Zip,
}

impl ArchiveFormat {
    /// Compound extensions come before their suffixes so `.tar.gz` wins
    /// over `.tar` when matching.
    const ALL: [ArchiveFormat; 6] = [
        ArchiveFormat::TarGz,
        ArchiveFormat::TarBz2,
        ArchiveFormat::TarXz,
        ArchiveFormat::Tgz,
        ArchiveFormat::Tar,
        ArchiveFormat::Zip,
    ];

    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveFormat::TarGz => "tar.gz",
            ArchiveFormat::TarBz2 => "tar.bz2",
            ArchiveFormat::TarXz => "tar.xz",
            ArchiveFormat::Tgz => "tgz",
            ArchiveFormat::Tar => "tar",
            ArchiveFormat::Zip => "zip",
        }
    }

    /// Detect the format from a URL or file name
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|format| {
            path.strip_suffix(format.extension())
                .is_some_and(|stem| stem.ends_with('.'))
        })
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Override applied to versions at or above `since`
///
/// With `format` the default URL keeps its base path and only the archive
/// extension changes. With `template` the whole URL comes from the rule;
/// `format` then still applies on top of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRule {
    /// First version the rule applies to
    pub since: Version,

    /// Archive format to switch to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ArchiveFormat>,

    /// Replacement URL template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl UrlRule {
    /// Rule that switches the archive format from `since` on
    pub fn format_since(since: Version, format: ArchiveFormat) -> Self {
        Self {
            since,
            format: Some(format),
            template: None,
        }
    }

    /// Whether the rule changes anything at all
    pub fn is_effective(&self) -> bool {
        self.format.is_some() || self.template.is_some()
    }
}

/// Pick the rule governing `version`: the one with the highest `since`
/// not above it.
pub fn rule_for<'a>(rules: &'a [UrlRule], version: &Version) -> Option<&'a UrlRule> {
    rules
        .iter()
        .filter(|rule| &rule.since <= version)
        .max_by(|a, b| a.since.cmp(&b.since))
}

/// Find the version embedded in an archive URL's file name
///
/// `.../multiprocess-0.70.5.zip` → `0.70.5`, `.../v1.2.3.tar.gz` → `1.2.3`.
/// Only the release part counts, so `foo-1.2.3-src.tar.gz` gives `1.2.3`.
/// A dotted release wins over a bare number found earlier or later in the
/// name (`tool-1.0-linux-x86_64.tar.gz` → `1.0`).
pub fn embedded_version(url: &str) -> Option<&str> {
    let filename = url.rsplit('/').next()?;
    let stem = match ArchiveFormat::from_path(filename) {
        Some(format) => &filename[..filename.len() - format.extension().len() - 1],
        None => filename,
    };

    let mut bare = None;
    let starts = std::iter::once(0).chain(stem.match_indices(['-', '_']).map(|(i, _)| i + 1));
    for start in starts {
        let candidate = &stem[start..];
        let candidate = candidate
            .strip_prefix(['v', 'V'])
            .filter(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
            .unwrap_or(candidate);

        let Some(release) = release_prefix(candidate) else {
            continue;
        };
        if Version::parse(release).is_err() {
            continue;
        }
        if release.contains(['.', '_']) {
            return Some(release);
        }
        bare.get_or_insert(release);
    }
    bare
}

/// Leading release components of `s`: digit-led alphanumeric runs joined by
/// `.` or `_`. Stops at `-`, at a component starting with a letter, or at
/// anything else.
fn release_prefix(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut pos = 0;
    let mut end = 0;
    while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
        let len = s[pos..]
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(s.len() - pos);
        end = pos + len;
        match bytes.get(end) {
            Some(b'.' | b'_') => pos = end + 1,
            _ => break,
        }
    }
    (end > 0).then(|| &s[..end])
}

/// Whether `url[start..end]` stands alone as a version token
///
/// The left neighbour must not be alphanumeric or `.`, except for a `v`
/// prefix that itself starts a token. On the right a `.` is fine unless a
/// digit follows it.
fn is_version_token(url: &str, start: usize, end: usize) -> bool {
    let mut before = url[..start].chars().rev();
    let left = match before.next() {
        None => true,
        Some('v' | 'V') => before.next().is_none_or(|c| !c.is_ascii_alphanumeric()),
        Some(c) => !c.is_ascii_alphanumeric() && c != '.',
    };

    let mut after = url[end..].chars();
    let right = match after.next() {
        None => true,
        Some('.') => after.next().is_none_or(|c| !c.is_ascii_digit()),
        Some(c) => !c.is_ascii_alphanumeric(),
    };

    left && right
}

/// Replace every standalone occurrence of `current` in `url`
fn replace_version_tokens(url: &str, current: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(url.len());
    let mut copied = 0;
    let mut search = 0;

    while let Some(offset) = url[search..].find(current) {
        let start = search + offset;
        let end = start + current.len();
        if is_version_token(url, start, end) {
            out.push_str(&url[copied..start]);
            out.push_str(replacement);
            copied = end;
            search = end;
        } else {
            // Step past the first character and keep looking
            search = start + url[start..].chars().next().map_or(1, char::len_utf8);
        }
    }

    out.push_str(&url[copied..]);
    out
}

/// Substitute `version` into a URL template
///
/// Every `%(version)s` is replaced. Without one, the version embedded in
/// the file name is replaced wherever it appears as a whole token, so
/// versioned directories (`/v0.70.5/pkg-0.70.5.zip`) follow along while
/// `/11.0/` stays put for a `1.0` archive.
pub fn render(template: &str, version: &Version) -> Result<String> {
    if template.contains(VERSION_PLACEHOLDER) {
        return Ok(template.replace(VERSION_PLACEHOLDER, version.as_str()));
    }

    match embedded_version(template) {
        Some(current) => Ok(replace_version_tokens(template, current, version.as_str())),
        None => Err(Error::TemplateError(format!(
            "no version placeholder in '{}'",
            template
        ))),
    }
}

/// Swap the archive extension of a URL, keeping the base path
pub fn with_format(url: &str, format: ArchiveFormat) -> Result<String> {
    let current = ArchiveFormat::from_path(url).ok_or_else(|| {
        Error::TemplateError(format!("cannot determine archive format of '{}'", url))
    })?;
    let base = &url[..url.len() - current.extension().len()];
    Ok(format!("{}{}", base, format.extension()))
}
