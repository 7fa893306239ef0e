// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: recipe name or path
fn recipe_arg() -> Arg {
    Arg::new("recipe")
        .required(true)
        .help("Built-in recipe name or path to a .toml recipe")
}

fn build_cli() -> Command {
    Command::new("pantry")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Pantry Contributors")
        .about("Inspect declarative package recipes")
        .subcommand_required(false)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(Command::new("list").about("List built-in recipes"))
        .subcommand(
            Command::new("show")
                .about("Show a recipe's metadata, versions and dependencies")
                .arg(recipe_arg()),
        )
        .subcommand(
            Command::new("url")
                .about("Print the download URL for a version")
                .arg(recipe_arg())
                .arg(Arg::new("version").help("Version to resolve (default: preferred version)")),
        )
        .subcommand(
            Command::new("check")
                .about("Validate recipes and report warnings")
                .arg(
                    Arg::new("recipes")
                        .required(true)
                        .num_args(1..)
                        .help("Built-in recipe names or paths to .toml recipes"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("pantry.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
