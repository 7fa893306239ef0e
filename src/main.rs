// src/main.rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pantry::recipe::{builtin, load_recipe, parse_recipe, parse_recipe_file, validate_recipe};
use pantry::{Recipe, Version};
use std::path::Path;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "pantry")]
#[command(author, version, about = "Inspect declarative package recipes", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List built-in recipes
    List,
    /// Show a recipe's metadata, versions and dependencies
    Show {
        /// Built-in recipe name or path to a .toml recipe
        recipe: String,
    },
    /// Print the download URL for a version
    Url {
        /// Built-in recipe name or path to a .toml recipe
        recipe: String,
        /// Version to resolve (default: preferred version)
        version: Option<String>,
    },
    /// Validate recipes and report warnings
    Check {
        /// Built-in recipe names or paths to .toml recipes
        #[arg(required = true)]
        recipes: Vec<String>,
    },
}

/// Anything that looks like a file path is read from disk; other arguments
/// name built-in recipes.
fn is_path_arg(arg: &str) -> bool {
    let path = Path::new(arg);
    arg.ends_with(".toml") || path.components().count() > 1 || path.exists()
}

/// Load and validate a recipe named on the command line, logging warnings
fn load_recipe_arg(arg: &str) -> Result<Recipe> {
    if is_path_arg(arg) {
        debug!("Reading recipe file {}", arg);
        return load_recipe(Path::new(arg))
            .with_context(|| format!("Failed to load recipe file {}", arg));
    }

    builtin::get(arg).with_context(|| format!("Unknown recipe '{}'", arg))
}

/// Parse a recipe named on the command line without validating it
fn parse_recipe_arg(arg: &str) -> Result<Recipe> {
    if is_path_arg(arg) {
        debug!("Reading recipe file {}", arg);
        return parse_recipe_file(Path::new(arg))
            .with_context(|| format!("Failed to read recipe file {}", arg));
    }

    let source = builtin::source(arg).with_context(|| format!("Unknown recipe '{}'", arg))?;
    Ok(parse_recipe(source)?)
}

/// Pick the requested version, or the recipe's preferred one
fn select_version(recipe: &Recipe, requested: Option<&str>) -> Result<Version> {
    match requested {
        Some(v) => Ok(Version::parse(v)?),
        None => recipe
            .preferred_version()
            .map(|entry| entry.version.clone())
            .with_context(|| format!("{} declares no versions", recipe.name())),
    }
}

fn show(recipe: &Recipe) -> Result<()> {
    println!("{}", recipe.name());
    if let Some(description) = &recipe.package.description {
        println!("  {}", description);
    }
    println!("  Homepage: {}", recipe.homepage().unwrap_or("none"));
    println!("  Build system: {}", recipe.package.build_system.as_str());
    println!("  Source: {}", recipe.source.url);

    let preferred = recipe.preferred_version().map(|e| e.version.clone());
    println!("  Versions:");
    for entry in recipe.sorted_versions() {
        let marker = if Some(&entry.version) == preferred.as_ref() {
            " (preferred)"
        } else if entry.deprecated {
            " (deprecated)"
        } else {
            ""
        };
        println!("    {}{}  {}", entry.version, marker, entry.checksum);
        println!("      {}", recipe.url_for_version(&entry.version)?);
    }

    println!("  Dependencies:");
    for dep in &recipe.dependencies {
        println!("    {}", dep);
    }
    Ok(())
}

fn check(args: &[String]) -> Result<()> {
    let mut failures = 0;
    for arg in args {
        let result = parse_recipe_arg(arg).and_then(|recipe| {
            let warnings = validate_recipe(&recipe)?;
            Ok((recipe, warnings))
        });

        match result {
            Ok((recipe, warnings)) if warnings.is_empty() => {
                println!("{}: ok", recipe.name());
            }
            Ok((recipe, warnings)) => {
                println!("{}: {} warning(s)", recipe.name(), warnings.len());
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            Err(e) => {
                failures += 1;
                println!("{}: error: {:#}", arg, e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} recipe(s) failed validation", failures, args.len());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::List) => {
            for name in builtin::names() {
                println!("{}", name);
            }
            Ok(())
        }
        Some(Commands::Show { recipe }) => show(&load_recipe_arg(&recipe)?),
        Some(Commands::Url { recipe, version }) => {
            let recipe = load_recipe_arg(&recipe)?;
            let version = select_version(&recipe, version.as_deref())?;
            if !recipe.has_version(&version) {
                info!("{} does not declare version {}", recipe.name(), version);
            }
            println!("{}", recipe.url_for_version(&version)?);
            Ok(())
        }
        Some(Commands::Check { recipes }) => check(&recipes),
        None => {
            // No command provided, show help
            println!("Pantry v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'pantry --help' for usage information");
            Ok(())
        }
    }
}
