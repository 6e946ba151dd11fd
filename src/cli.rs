use clap::Parser;
use std::path::PathBuf;

use crate::core::manifest::STDIN_MARKER;

/// Environment variable holding the `tracing` filter directives.
pub const LOG_ENV: &str = "SUBCLONE_LOG";

const ABOUT: &str = "Clone a subset of a filesystem using a list of file names specifying what to copy";

const LONG_ABOUT: &str = "\
Clone a subset of a filesystem using a list of file names specifying what to copy.

Each manifest line is a one-character marker followed by a path relative to the
source directory. Supply \"-\" as the input file to read from stdin.";

#[derive(Parser, Debug)]
#[command(name = "subclone")]
#[command(about = ABOUT, long_about = LONG_ABOUT)]
pub struct Cli {
    /// Manifest of paths to copy, one per line
    #[arg(short, long, default_value = STDIN_MARKER)]
    pub input_file: String,

    /// Source directory
    #[arg(short, long)]
    pub src: PathBuf,

    /// Destination directory
    #[arg(short, long)]
    pub dest: PathBuf,
}
