//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{lint_cmd, list_cmd, new_cmd, validate_cmd};
use crate::catalog::Catalog;

#[derive(Parser)]
#[command(name = "plugkit")]
#[command(author, version, about = "Validate, lint, and scaffold AgentOS plugin definitions")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Catalog root (defaults to the current directory)
    #[arg(long, short = 'd', global = true)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate plugin folders against the definition format
    Validate {
        /// Plugin ids to validate (exact folder names)
        names: Vec<String>,

        /// Validate every folder (the default when no names are given)
        #[arg(long)]
        all: bool,

        /// Validate folders whose id contains this substring
        #[arg(long)]
        filter: Option<String>,

        /// Report failures without moving folders into quarantine
        #[arg(long)]
        no_move: bool,
    },

    /// Check end-to-end tests for required boilerplate patterns
    Lint {
        /// Plugin ids to lint (defaults to every folder)
        names: Vec<String>,
    },

    /// Scaffold a new plugin folder
    New {
        /// Plugin id: lowercase letters, digits, and '-'
        name: String,

        /// Only list/get tools, no create/update/delete
        #[arg(long)]
        readonly: bool,

        /// Local auth (no stored credential) instead of api_key
        #[arg(long)]
        local: bool,
    },

    /// Show an overview of the catalog
    List,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    let root = cli.dir.unwrap_or_else(|| PathBuf::from("."));
    output.verbose(&format!("Opening catalog at {}", root.display()));
    let catalog = Catalog::open(root)?;

    match cli.command {
        Commands::Validate {
            names,
            all,
            filter,
            no_move,
        } => {
            output.verbose_ctx(
                "validate",
                &format!(
                    "names={:?} all={} filter={:?} no_move={}",
                    names, all, filter, no_move
                ),
            );
            validate_cmd::run(&catalog, &output, names, filter, no_move)?
        }

        Commands::Lint { names } => {
            output.verbose_ctx("lint", &format!("names={:?}", names));
            lint_cmd::run(&catalog, &output, names)?
        }

        Commands::New {
            name,
            readonly,
            local,
        } => {
            output.verbose_ctx(
                "new",
                &format!("name={} readonly={} local={}", name, readonly, local),
            );
            new_cmd::run(&catalog, &output, &name, readonly, local)?
        }

        Commands::List => list_cmd::run(&catalog, &output)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}
