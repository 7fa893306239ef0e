// src/lib.rs

//! Pantry: declarative package recipes
//!
//! A recipe describes one package: its homepage, where to download each
//! version, the checksum every download must match, and the packages it
//! needs to build and run.
//!
//! # Architecture
//!
//! - Recipes are immutable data, loaded from TOML and validated once
//! - Versions compare structurally (`0.70.10` > `0.70.9`), never as strings
//! - Download URLs are pure functions of recipe and version
//! - Fetching, verification and dependency resolution belong to the
//!   package manager consuming the recipes

mod error;
pub mod hash;
pub mod recipe;
pub mod version;

pub use error::{Error, Result};
pub use hash::{Checksum, HashAlgorithm};
pub use recipe::{Dependency, DependencyType, Recipe, SourceFetch};
pub use version::{Version, VersionConstraint};
