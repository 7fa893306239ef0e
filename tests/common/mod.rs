// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

use pantry::Version;
use std::io::Write;
use tempfile::NamedTempFile;

/// Checksum used for versions whose archive content does not matter.
pub const DUMMY_SHA256: &str =
    "sha256:3394f1fbd0d87112690a877e49eb7917d851ee8d822294d522dd4deae12febdb";

/// Parse a version, panicking on bad test input.
pub fn v(s: &str) -> Version {
    Version::parse(s).unwrap()
}

/// Write a recipe to a temporary `.toml` file.
///
/// Keep the returned file alive for as long as the path is used.
pub fn write_recipe(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".toml").unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Minimal recipe body with the given source URL and versions.
pub fn recipe_toml(name: &str, url: &str, versions: &[&str]) -> String {
    let mut content = format!(
        "[package]\nname = \"{}\"\ndescription = \"{} for tests\"\nhomepage = \"https://example.com/{}\"\n\n[source]\nurl = \"{}\"\n",
        name, name, name, url
    );
    for version in versions {
        content.push_str(&format!(
            "\n[[versions]]\nversion = \"{}\"\nchecksum = \"{}\"\n",
            version, DUMMY_SHA256
        ));
    }
    content
}
