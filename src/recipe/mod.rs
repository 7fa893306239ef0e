// src/recipe/mod.rs

//! Package recipes
//!
//! A recipe says where a package's source archives live, which versions
//! exist (each with the checksum of its archive) and what the package
//! depends on. Recipes are plain data: the package manager that consumes
//! them does the fetching, verifying, resolving and building.
//!
//! # Example Recipe
//!
//! ```toml
//! [package]
//! name = "py-multiprocess"
//! description = "Better multiprocessing and multithreading in Python"
//! homepage = "https://github.com/uqfoundation/multiprocess"
//! build_system = "python"
//!
//! [source]
//! url = "https://pypi.io/packages/source/m/multiprocess/multiprocess-0.70.5.zip"
//!
//! [[source.rules]]
//! since = "0.70.7"
//! format = "tar.gz"
//!
//! [[versions]]
//! version = "0.70.7"
//! checksum = "sha256:3394f1fb..."
//!
//! [[dependencies]]
//! spec = "py-dill@0.2.9:"
//! type = ["build", "run"]
//! when = "@0.70.7:"
//! ```
//!
//! The version embedded in `source.url` stands in for every other version,
//! so `0.70.4` resolves to `.../multiprocess-0.70.4.zip`. The rule switches
//! releases from `0.70.7` on to `.tar.gz`.

pub mod builtin;
mod dependency;
mod format;
pub mod parser;
pub mod url;

pub use dependency::{parse_spec, Dependency, DependencyKind, DependencyType};
pub use format::{BuildSystem, PackageSection, Recipe, SourceFetch, SourceSection, VersionEntry};
pub use parser::{load_recipe, parse_recipe, parse_recipe_file, validate_recipe};
pub use self::url::{ArchiveFormat, UrlRule};
