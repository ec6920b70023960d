use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "plvet", version, about = "Playlist liveness checker and text tools")]
pub struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Probe every entry of a playlist and report dead streams
    Check {
        /// Playlist file to check
        playlist: PathBuf,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,

        /// Attempts allowed per entry
        #[arg(long, default_value_t = 2)]
        retries: u32,

        /// Pause between entries in milliseconds
        #[arg(long, default_value_t = 1000)]
        probe_delay: u64,

        /// User agent sent with probe requests
        #[arg(long)]
        user_agent: Option<String>,

        /// Report format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        output: OutputFormat,
    },

    /// Reorder playlist entries alphabetically by group-title
    Sort {
        /// Playlist file to sort
        playlist: PathBuf,

        /// Write the sorted playlist here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Normalize playlist whitespace and metadata formatting
    Format {
        /// Playlist file to format
        playlist: PathBuf,

        /// Write the formatted playlist here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable transcript
    Pretty,
    /// Machine-readable JSON report
    Json,
}
