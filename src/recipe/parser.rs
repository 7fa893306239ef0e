// src/recipe/parser.rs

//! Recipe file parsing and validation

use crate::error::{Error, Result};
use crate::recipe::dependency::is_valid_name;
use crate::recipe::format::Recipe;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

/// Parse a recipe from a TOML string
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid recipe: {}", e)))
}

/// Parse a recipe from a file
pub fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::IoError(format!("Failed to read recipe file {}: {}", path.display(), e))
    })?;

    parse_recipe(&content)
}

/// Parse and validate a recipe file, logging validation warnings
pub fn load_recipe(path: &Path) -> Result<Recipe> {
    debug!("Loading recipe from {}", path.display());
    let recipe = parse_recipe_file(path)?;
    for warning in validate_recipe(&recipe)? {
        warn!("{}: {}", recipe.name(), warning);
    }
    Ok(recipe)
}

/// Validate a recipe for completeness and correctness
///
/// Returns warnings for questionable but usable recipes, and an error for
/// recipes a fetcher could not work with.
pub fn validate_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let mut warnings = Vec::new();
    let name = recipe.name();

    if name.is_empty() {
        return Err(Error::ValidationError(
            "Recipe package name cannot be empty".to_string(),
        ));
    }
    if !is_valid_name(name) {
        return Err(Error::ValidationError(format!(
            "Invalid package name '{}'",
            name
        )));
    }

    if recipe.versions.is_empty() {
        return Err(Error::ValidationError(format!(
            "{} declares no versions",
            name
        )));
    }

    let mut seen = HashSet::new();
    for entry in &recipe.versions {
        if !seen.insert(&entry.version) {
            return Err(Error::ValidationError(format!(
                "{} declares version {} more than once",
                name, entry.version
            )));
        }
    }

    if recipe.versions.iter().filter(|e| e.preferred).count() > 1 {
        return Err(Error::ValidationError(format!(
            "{} marks more than one version as preferred",
            name
        )));
    }

    // `%(version)s` belongs to URL resolution, not to [variables]
    if recipe.variables.contains_key("version") {
        return Err(Error::ValidationError(format!(
            "{} defines a variable named 'version', which would shadow the version placeholder",
            name
        )));
    }

    let mut thresholds = HashSet::new();
    for rule in &recipe.source.rules {
        if !rule.is_effective() {
            return Err(Error::ValidationError(format!(
                "URL rule since {} sets neither format nor template",
                rule.since
            )));
        }
        if !thresholds.insert(&rule.since) {
            return Err(Error::ValidationError(format!(
                "More than one URL rule starts at {}",
                rule.since
            )));
        }
    }

    // Every declared version must resolve to a usable URL
    for entry in &recipe.versions {
        let resolved = recipe.url_for_version(&entry.version)?;
        if let Err(e) = url::Url::parse(&resolved) {
            return Err(Error::ValidationError(format!(
                "URL for {} {} is malformed ({}): {}",
                name, entry.version, e, resolved
            )));
        }
        // Each version needs its own archive name
        let filename = resolved.rsplit('/').next().unwrap_or(&resolved);
        if !filename.contains(entry.version.as_str()) {
            warnings.push(format!(
                "Archive name for version {} does not mention the version: {}",
                entry.version, resolved
            ));
        }
    }

    // Warn about missing metadata
    if recipe.package.description.is_none() {
        warnings.push("Missing package description".to_string());
    }
    match recipe.homepage() {
        None => warnings.push("Missing package homepage".to_string()),
        Some(homepage) if url::Url::parse(homepage).is_err() => {
            warnings.push(format!("Homepage is not a valid URL: {}", homepage));
        }
        Some(_) => {}
    }

    // Conditions and rules that can never fire are authoring mistakes
    for dep in &recipe.dependencies {
        if dep.name == name {
            warnings.push(format!("{} depends on itself", name));
        }
        if let Some(when) = &dep.when {
            if !recipe.versions.iter().any(|e| when.satisfies(&e.version)) {
                warnings.push(format!(
                    "Dependency {} applies to no declared version (when @{})",
                    dep.spec(),
                    when
                ));
            }
        }
    }

    for rule in &recipe.source.rules {
        if !recipe.versions.iter().any(|e| e.version >= rule.since) {
            warnings.push(format!(
                "URL rule since {} is above every declared version",
                rule.since
            ));
        }
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA_A: &str = "sha256:a692c6dc8392c25b29391abb58a9fbdc1ac38bca73c6f27d787774201e68e12c";
    const SHA_B: &str = "sha256:c4c196f3c4561dc1d78139c3e73709906a222d2fc166ef3eef895d8623df7267";

    fn recipe_with(body: &str) -> Recipe {
        let content = format!(
            r#"
[package]
name = "test"
description = "Test package"
homepage = "https://example.com"

[source]
url = "https://example.com/test-1.0.tar.gz"

{}
"#,
            body
        );
        parse_recipe(&content).unwrap()
    }

    #[test]
    fn test_parse_valid_recipe() {
        let recipe = recipe_with(&format!(
            "[[versions]]\nversion = \"1.0\"\nchecksum = \"{}\"\n",
            SHA_A
        ));
        assert_eq!(recipe.name(), "test");
        assert!(validate_recipe(&recipe).unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_recipe() {
        let content = "this is not valid toml at all {}";
        assert!(matches!(parse_recipe(content), Err(Error::ParseError(_))));
    }

    #[test]
    fn test_parse_rejects_bad_version() {
        let content = r#"
[package]
name = "test"

[source]
url = "https://example.com/test-1.0.tar.gz"

[[versions]]
version = "1..0"
checksum = "sha256:a692c6dc8392c25b29391abb58a9fbdc1ac38bca73c6f27d787774201e68e12c"
"#;
        assert!(parse_recipe(content).is_err());
    }

    #[test]
    fn test_validate_no_versions() {
        let recipe = recipe_with("");
        assert!(matches!(validate_recipe(&recipe), Err(Error::ValidationError(_))));
    }

    #[test]
    fn test_validate_duplicate_versions() {
        // 1.0 and 1.00 are the same version
        let recipe = recipe_with(&format!(
            "[[versions]]\nversion = \"1.0\"\nchecksum = \"{}\"\n\n[[versions]]\nversion = \"1.00\"\nchecksum = \"{}\"\n",
            SHA_A, SHA_B
        ));
        let err = validate_recipe(&recipe).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_validate_bad_name() {
        let mut recipe = recipe_with(&format!(
            "[[versions]]\nversion = \"1.0\"\nchecksum = \"{}\"\n",
            SHA_A
        ));
        recipe.package.name = String::new();
        assert!(validate_recipe(&recipe).is_err());

        recipe.package.name = "Has Spaces".to_string();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_unresolvable_template() {
        let mut recipe = recipe_with(&format!(
            "[[versions]]\nversion = \"1.0\"\nchecksum = \"{}\"\n",
            SHA_A
        ));
        recipe.source.url = "https://example.com/latest.tar.gz".to_string();
        assert!(matches!(validate_recipe(&recipe), Err(Error::TemplateError(_))));
    }

    #[test]
    fn test_validate_ineffective_rule() {
        let recipe = recipe_with(&format!(
            "[[source.rules]]\nsince = \"1.0\"\n\n[[versions]]\nversion = \"1.0\"\nchecksum = \"{}\"\n",
            SHA_A
        ));
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_warnings() {
        let content = format!(
            r#"
[package]
name = "test"

[source]
url = "https://example.com/test-1.0.tar.gz"

[[source.rules]]
since = "9.0"
format = "zip"

[[versions]]
version = "1.0"
checksum = "{}"

[[dependencies]]
spec = "zlib"
when = "@2.0:"
"#,
            SHA_A
        );

        let recipe = parse_recipe(&content).unwrap();
        let warnings = validate_recipe(&recipe).unwrap();
        assert!(warnings.iter().any(|w| w.contains("description")));
        assert!(warnings.iter().any(|w| w.contains("homepage")));
        assert!(warnings.iter().any(|w| w.contains("zlib")));
        assert!(warnings.iter().any(|w| w.contains("above every declared version")));
    }

    #[test]
    fn test_validate_multiple_preferred() {
        let recipe = recipe_with(&format!(
            "[[versions]]\nversion = \"1.0\"\nchecksum = \"{}\"\npreferred = true\n\n[[versions]]\nversion = \"1.1\"\nchecksum = \"{}\"\npreferred = true\n",
            SHA_A, SHA_B
        ));
        let err = validate_recipe(&recipe).unwrap_err();
        assert!(err.to_string().contains("preferred"));
    }

    #[test]
    fn test_validate_duplicate_rule_threshold() {
        // 2.0 and 2.00 start at the same version
        let recipe = recipe_with(&format!(
            "[[source.rules]]\nsince = \"2.0\"\nformat = \"zip\"\n\n[[source.rules]]\nsince = \"2.00\"\nformat = \"tar.xz\"\n\n[[versions]]\nversion = \"2.0\"\nchecksum = \"{}\"\n",
            SHA_A
        ));
        let err = validate_recipe(&recipe).unwrap_err();
        assert!(err.to_string().contains("More than one URL rule"));
    }

    #[test]
    fn test_validate_malformed_url() {
        let mut recipe = recipe_with(&format!(
            "[[versions]]\nversion = \"1.0\"\nchecksum = \"{}\"\n",
            SHA_A
        ));
        recipe.source.url = "example.com/test-1.0.tar.gz".to_string();
        let err = validate_recipe(&recipe).unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn test_validate_version_variable_rejected() {
        let mut recipe = recipe_with(&format!(
            "[[versions]]\nversion = \"1.0\"\nchecksum = \"{}\"\n",
            SHA_A
        ));
        recipe.source.url = "https://example.com/test-%(version)s.tar.gz".to_string();
        recipe.variables.insert("version".to_string(), "9.9".to_string());
        let err = validate_recipe(&recipe).unwrap_err();
        assert!(err.to_string().contains("'version'"));

        recipe.variables.clear();
        recipe.variables.insert("mirror".to_string(), "example.com".to_string());
        assert!(validate_recipe(&recipe).unwrap().is_empty());
    }

    #[test]
    fn test_validate_archive_name_without_version() {
        let mut recipe = recipe_with(&format!(
            "[[versions]]\nversion = \"1.0\"\nchecksum = \"{}\"\n",
            SHA_A
        ));
        recipe.source.url = "https://example.com/releases/%(version)s/download.tar.gz".to_string();
        let warnings = validate_recipe(&recipe).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("does not mention the version"));
    }

    #[test]
    fn test_validate_self_dependency() {
        let recipe = recipe_with(&format!(
            "[[versions]]\nversion = \"1.0\"\nchecksum = \"{}\"\n\n[[dependencies]]\nspec = \"test@0.9:\"\n",
            SHA_A
        ));
        let warnings = validate_recipe(&recipe).unwrap();
        assert!(warnings.iter().any(|w| w.contains("depends on itself")));
    }

    #[test]
    fn test_parse_recipe_file_missing() {
        let err = parse_recipe_file(Path::new("/nonexistent/recipe.toml")).unwrap_err();
        assert!(matches!(err, Error::IoError(_)));
    }
}
