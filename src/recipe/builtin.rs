// src/recipe/builtin.rs

//! Recipes shipped with the crate
//!
//! The TOML sources live in `recipes/` and are embedded at compile time.
//! They are parsed and validated on every call; a failure here is a bug in
//! the shipped recipe, covered by the tests below.

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use crate::recipe::parser::{parse_recipe, validate_recipe};
use tracing::warn;

const BUILTIN: &[(&str, &str)] = &[
    (
        "py-multiprocess",
        include_str!("../../recipes/py-multiprocess.toml"),
    ),
    ("xditview", include_str!("../../recipes/xditview.toml")),
];

/// Names of all built-in recipes
pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTIN.iter().map(|(name, _)| *name)
}

/// Embedded TOML text of a built-in recipe
pub fn source(name: &str) -> Result<&'static str> {
    BUILTIN
        .iter()
        .find(|(builtin, _)| *builtin == name)
        .map(|(_, source)| *source)
        .ok_or_else(|| Error::NotFound(format!("no built-in recipe named '{}'", name)))
}

/// Load one built-in recipe by name
pub fn get(name: &str) -> Result<Recipe> {
    load(source(name)?)
}

/// Load every built-in recipe
pub fn all() -> Result<Vec<Recipe>> {
    BUILTIN.iter().map(|(_, source)| load(source)).collect()
}

fn load(source: &str) -> Result<Recipe> {
    let recipe = parse_recipe(source)?;
    for warning in validate_recipe(&recipe)? {
        warn!("{}: {}", recipe.name(), warning);
    }
    Ok(recipe)
}
