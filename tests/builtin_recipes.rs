// tests/builtin_recipes.rs

//! Built-in recipe tests: URL resolution, version boundaries, dependencies.

mod common;

use common::v;
use pantry::recipe::{builtin, ArchiveFormat, DependencyKind};
use std::collections::HashSet;

const MULTIPROCESS_BASE: &str = "https://pypi.io/packages/source/m/multiprocess";

// =============================================================================
// URL RESOLUTION
// =============================================================================

#[test]
fn test_every_declared_version_resolves_to_a_url() {
    for recipe in builtin::all().unwrap() {
        for entry in &recipe.versions {
            let resolved = recipe.url_for_version(&entry.version).unwrap();
            assert!(!resolved.is_empty());
            assert!(
                url::Url::parse(&resolved).is_ok(),
                "{} {} resolved to malformed URL {}",
                recipe.name(),
                entry.version,
                resolved
            );
            assert!(
                resolved.contains(entry.version.as_str()),
                "{} does not mention {}",
                resolved,
                entry.version
            );
        }
    }
}

#[test]
fn test_multiprocess_format_boundary() {
    let recipe = builtin::get("py-multiprocess").unwrap();

    // The threshold itself already uses the new format
    let at_threshold = recipe.url_for_version(&v("0.70.7")).unwrap();
    assert!(at_threshold.ends_with(".tar.gz"));

    // The previous declared version still uses zip
    let below = recipe.url_for_version(&v("0.70.5")).unwrap();
    assert!(below.ends_with(".zip"));
}

#[test]
fn test_multiprocess_concrete_urls() {
    let recipe = builtin::get("py-multiprocess").unwrap();

    assert_eq!(
        recipe.resolve_url("0.70.4").unwrap(),
        format!("{}/multiprocess-0.70.4.zip", MULTIPROCESS_BASE)
    );
    assert_eq!(
        recipe.resolve_url("0.70.5").unwrap(),
        format!("{}/multiprocess-0.70.5.zip", MULTIPROCESS_BASE)
    );
    assert_eq!(
        recipe.resolve_url("0.70.7").unwrap(),
        format!("{}/multiprocess-0.70.7.tar.gz", MULTIPROCESS_BASE)
    );
}

#[test]
fn test_multiprocess_threshold_uses_version_order_not_string_order() {
    let recipe = builtin::get("py-multiprocess").unwrap();

    // "0.70.10" < "0.70.7" as strings, but it is the newer release
    assert!(recipe.resolve_url("0.70.10").unwrap().ends_with("multiprocess-0.70.10.tar.gz"));
    assert!(recipe.resolve_url("0.70.6").unwrap().ends_with("multiprocess-0.70.6.zip"));
}

#[test]
fn test_xditview_default_url_unchanged() {
    let recipe = builtin::get("xditview").unwrap();
    assert_eq!(
        recipe.resolve_url("1.0.4").unwrap(),
        "https://www.x.org/archive/individual/app/xditview-1.0.4.tar.gz"
    );
    assert_eq!(recipe.resolve_url("1.0.4").unwrap(), recipe.source.url);
}

#[test]
fn test_resolution_is_idempotent() {
    for recipe in builtin::all().unwrap() {
        for entry in &recipe.versions {
            let first = recipe.url_for_version(&entry.version).unwrap();
            let second = recipe.url_for_version(&entry.version).unwrap();
            assert_eq!(first, second);
        }
    }
}

#[test]
fn test_fetch_plan_carries_checksum() {
    let recipe = builtin::get("py-multiprocess").unwrap();
    let plan = recipe.fetch_plan(&v("0.70.7")).unwrap();

    assert_eq!(plan.filename, "multiprocess-0.70.7.tar.gz");
    assert_eq!(plan.format, Some(ArchiveFormat::TarGz));
    assert_eq!(
        plan.checksum.as_str(),
        "3394f1fbd0d87112690a877e49eb7917d851ee8d822294d522dd4deae12febdb"
    );

    let old = recipe.fetch_plan(&v("0.70.4")).unwrap();
    assert_eq!(old.format, Some(ArchiveFormat::Zip));

    // Undeclared versions have nothing to verify against
    assert!(recipe.fetch_plan(&v("0.70.6")).is_err());
}

// =============================================================================
// VERSION DECLARATIONS
// =============================================================================

#[test]
fn test_versions_are_unique_and_hashed() {
    for recipe in builtin::all().unwrap() {
        let mut seen = HashSet::new();
        for entry in &recipe.versions {
            assert!(seen.insert(entry.version.clone()), "duplicate {}", entry.version);
            assert!(!entry.checksum.as_str().is_empty());
        }
    }
}

#[test]
fn test_multiprocess_versions() {
    let recipe = builtin::get("py-multiprocess").unwrap();
    let versions: Vec<&str> = recipe
        .sorted_versions()
        .iter()
        .map(|e| e.version.as_str())
        .collect();
    assert_eq!(versions, ["0.70.7", "0.70.5", "0.70.4"]);
    assert_eq!(recipe.preferred_version().unwrap().version, v("0.70.7"));
}

// =============================================================================
// DEPENDENCIES
// =============================================================================

#[test]
fn test_multiprocess_conditional_dill() {
    let recipe = builtin::get("py-multiprocess").unwrap();

    let dill_for = |version: &str| -> Vec<String> {
        recipe
            .dependencies_for(&v(version))
            .into_iter()
            .filter(|d| d.name == "py-dill")
            .map(|d| d.spec())
            .collect()
    };

    assert_eq!(dill_for("0.70.5"), ["py-dill@0.2.6:"]);
    assert_eq!(dill_for("0.70.7"), ["py-dill@0.2.6:", "py-dill@0.2.9:"]);
}

#[test]
fn test_multiprocess_dependency_kinds() {
    let recipe = builtin::get("py-multiprocess").unwrap();
    let version = v("0.70.7");

    let run: Vec<&str> = recipe
        .run_dependencies_for(&version)
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(run, ["py-dill", "py-dill"]);

    let setuptools = recipe
        .dependencies
        .iter()
        .find(|d| d.name == "py-setuptools")
        .unwrap();
    assert_eq!(setuptools.kind(), DependencyKind::BuildTime);

    let python = recipe.dependencies.iter().find(|d| d.name == "python").unwrap();
    assert!(python.constraint.satisfies(&v("2.7.18")));
    assert!(python.constraint.satisfies(&v("3.11")));
    assert!(!python.constraint.satisfies(&v("3.0")));
}

#[test]
fn test_xditview_dependencies() {
    let recipe = builtin::get("xditview").unwrap();
    let version = v("1.0.4");

    let build: Vec<&str> = recipe
        .build_dependencies_for(&version)
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(
        build,
        ["libxaw", "libxmu", "libxt", "libx11", "pkgconfig", "util-macros"]
    );
    assert!(recipe.run_dependencies_for(&version).is_empty());
}
