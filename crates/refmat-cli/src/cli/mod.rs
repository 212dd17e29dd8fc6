//! CLI for the refmat content-reference resolver.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use refmat_core::config;
use std::path::PathBuf;

use commands::{run_completions, run_describe, run_pick, run_resolve};

/// Top-level CLI for the refmat resolver.
#[derive(Debug, Parser)]
#[command(name = "refmat")]
#[command(about = "refmat: resolve provider content references into local files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve a reference to a local path, without assembling metadata.
    Resolve {
        /// Content reference (content:// or file:// form).
        reference: String,

        /// Provider manifest serving content:// rows.
        #[arg(long, value_name = "FILE")]
        manifest: Option<PathBuf>,
    },

    /// Materialize references and print their descriptors.
    Describe {
        /// Content references to describe, in order.
        #[arg(required = true)]
        references: Vec<String>,

        /// Provider manifest serving content:// rows.
        #[arg(long, value_name = "FILE")]
        manifest: Option<PathBuf>,

        /// Print descriptors as a JSON array.
        #[arg(long)]
        json: bool,
    },

    /// Run a full selection round; the arguments play the selection surface.
    Pick {
        /// References "picked" on the surface, in pick order.
        references: Vec<String>,

        /// Provider manifest serving content:// rows.
        #[arg(long, value_name = "FILE")]
        manifest: Option<PathBuf>,

        /// MIME-type filter forwarded to the surface (repeatable).
        #[arg(long = "type", value_name = "MIME")]
        types: Vec<String>,

        /// Allow multi-select.
        #[arg(long)]
        multiple: bool,

        /// Simulate the user dismissing the surface.
        #[arg(long)]
        cancel: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Resolve {
                reference,
                manifest,
            } => run_resolve(&cfg, &reference, manifest.as_deref())?,
            CliCommand::Describe {
                references,
                manifest,
                json,
            } => run_describe(&cfg, &references, manifest.as_deref(), json)?,
            CliCommand::Pick {
                references,
                manifest,
                types,
                multiple,
                cancel,
            } => run_pick(&cfg, &references, manifest.as_deref(), types, multiple, cancel)?,
            CliCommand::Completions { shell } => run_completions(shell)?,
        }

        Ok(())
    }
}
