use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scrubview")]
#[command(
    author,
    version,
    about = "Trickplay scrub previews for Jellyfin-compatible media servers"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the trickplay descriptor of an item
    Info {
        /// Item id
        #[arg(required = true)]
        item: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Use this media source's trickplay instead of the first one listed
        #[arg(long)]
        media_source: Option<String>,
    },

    /// Write the scrub preview for one position as a JPEG
    Preview {
        /// Item id
        #[arg(required = true)]
        item: String,

        /// Position in milliseconds or as [HH:]MM:SS[.mmm]
        #[arg(short, long)]
        position: String,

        /// Output file
        #[arg(short, long, default_value = "preview.jpg")]
        output: PathBuf,

        /// Use this media source's trickplay instead of the first one listed
        #[arg(long)]
        media_source: Option<String>,
    },

    /// Write evenly spaced previews across the whole item
    Strip {
        /// Item id
        #[arg(required = true)]
        item: String,

        /// Number of previews
        #[arg(short = 'n', long, default_value = "10")]
        count: u32,

        /// Directory to write previews into
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Check that the configured server is reachable
    Ping,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
