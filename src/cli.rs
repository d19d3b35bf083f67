use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// renderprep - render farm node preparation
#[derive(Parser)]
#[command(name = "renderprep")]
#[command(about = "Prepares render job files for GPU farm nodes")]
#[command(version)]
pub struct Cli {
    /// Dry-run mode: run the full setup logic without writing the job file.
    ///
    /// The transcript and summary are printed as for a real run, and the
    /// device probe still executes so the preview is realistic.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configure GPU rendering and denoising in a job file
    Apply {
        /// Path to the job state file to configure
        job: PathBuf,

        /// Trust the inventory already in the file instead of probing this machine
        #[arg(long)]
        offline: bool,
    },
    /// Print the compute devices of this machine
    Probe,
    /// Validate a job state file
    Validate {
        /// Path to the job state file to validate
        job: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
