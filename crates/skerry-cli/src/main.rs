#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod commands;
mod logging;

use clap::Parser;
use miette::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "skerry")]
#[command(author, version, about = "An import map inspector for ES module loaders", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Declaration base URL for the composed documents
    /// (defaults to a file: URL for the working directory)
    #[arg(long, global = true, value_name = "URL")]
    base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Resolve a specifier through one or more import maps
    Resolve {
        /// The specifier to resolve (bare name, relative path, or URL)
        specifier: String,

        /// Referrer URL selecting the applicable scope
        #[arg(long, value_name = "URL")]
        parent: Option<String>,

        /// Import map files, composed in order
        #[arg(short, long = "map", value_name = "FILE")]
        maps: Vec<PathBuf>,
    },

    /// Compose import maps and print the normalized result as JSON
    Compose {
        /// Import map files, composed in order
        #[arg(short, long = "map", value_name = "FILE")]
        maps: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json);

    let base = cli.base.clone().unwrap_or_else(default_base_url);

    match cli.command {
        Commands::Version => commands::version::run(),
        Commands::Resolve {
            specifier,
            parent,
            maps,
        } => commands::resolve::run(&maps, &base, &specifier, parent.as_deref(), cli.json),
        Commands::Compose { maps } => commands::compose::run(&maps, &base, cli.json),
    }
}

/// Default declaration base: the working directory as a file: URL.
fn default_base_url() -> String {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    skerry_core::directory_base_url(&cwd)
}
