//! CLI definitions and command dispatch.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{build, inspect};

#[derive(Parser)]
#[command(name = "fontface")]
#[command(about = "Generate @font-face stylesheets and web font variants from font files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, clap::Args)]
pub struct BuildArgs {
    /// Options file; defaults to `fontface.toml` in the context directory when present.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Build context that generated paths are relative to.
    #[arg(long, default_value = ".")]
    pub context: PathBuf,
    /// Write the generated files here instead of only printing module sources.
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
    /// Font files or glob patterns.
    #[arg(required = true)]
    pub fonts: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate stylesheets, font variants and module sources.
    Build {
        #[command(flatten)]
        args: BuildArgs,
    },
    /// Print a font's naming metadata and resolved descriptors.
    Inspect { font: PathBuf },
}

impl Commands {
    pub async fn run(self) -> Result<()> {
        match self {
            Commands::Build { args } => build(&args).await?,
            Commands::Inspect { font } => inspect(&font).await?,
        }
        Ok(())
    }
}
