//! Command-line interface definition
//!
//! Lives in the library so `xtask` can generate man pages from it.

use std::path::PathBuf;
use std::sync::OnceLock;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Version string with build metadata.
///
/// Dev builds: `0.1.0 (abc1234 2026-10-18)`. Release builds: `0.1.0 (2026-10-18)`.
pub fn long_version() -> &'static str {
    static VERSION: OnceLock<String> = OnceLock::new();
    VERSION.get_or_init(|| {
        let date = env!("VIDQA_BUILD_DATE");
        match option_env!("VERGEN_GIT_SHA") {
            Some(sha) if !sha.is_empty() && sha != "unknown" => {
                let short = sha.get(..7).unwrap_or(sha);
                format!("{} ({} {})", env!("CARGO_PKG_VERSION"), short, date)
            }
            _ => format!("{} ({})", env!("CARGO_PKG_VERSION"), date),
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "vidqa")]
#[command(about = "Ask questions about videos and jump to the answering frames")]
#[command(version = long_version())]
#[command(
    long_about = "vidqa uploads videos to an analysis backend, asks natural-language \
questions about them and searches across every processed video.\n\n\
Answers come back as frame indices; vidqa turns them into MM:SS time codes \
and seeks the player to the selected one."
)]
pub struct Cli {
    /// Backend base URL (overrides the config file)
    #[arg(long, global = true, env = "VIDQA_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every video the backend has processed
    List,

    /// Upload a video for analysis and indexing
    Upload {
        /// Video file to upload
        file: PathBuf,
    },

    /// Ask a question about a processed video
    #[command(long_about = "Ask a question about a processed video.\n\n\
VIDEO is a video hash, or a composite id (hash followed by the frame count) \
when --total-frames is given.")]
    Ask {
        /// Video hash or composite id
        video: String,
        /// Question in natural language
        question: String,
        /// Frame count embedded in a composite VIDEO id
        #[arg(long)]
        total_frames: Option<u64>,
    },

    /// Search all processed videos for a keyword
    Search {
        /// Keyword to search for
        keyword: String,
    },

    /// Convert a frame index to a time code
    Timecode(TimecodeArgs),

    /// Interactive session: load videos, ask, search and seek
    Shell,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
pub struct TimecodeArgs {
    /// Frame index
    pub frame: u64,
    /// Frames in the whole video
    #[arg(long)]
    pub total_frames: u64,
    /// Video duration in seconds
    #[arg(long)]
    pub duration: f64,
    /// Seconds per displayed minute (defaults to the configured interval)
    #[arg(long)]
    pub interval: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Open configuration in $EDITOR
    Edit,
}
