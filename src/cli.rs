//! # Command-Line Interface Module
//!
//! Clap definitions for the `playwise` binary.
//!
//! ## Commands
//!
//! - `demo`: run the scripted walkthrough
//! - `shell`: interactive command loop on stdin
//! - `run`: execute a file of shell commands
//! - `completion`: print shell completions
//!
//! ## Examples
//!
//! ```bash
//! playwise demo
//! playwise --json run session.txt
//! RUST_LOG=playwise=debug playwise shell
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "playwise")]
#[command(
    about = "PlayWise: in-memory playlist engine with ratings, favourites and playback history"
)]
#[command(version)]
pub struct Args {
    /// Session config file (JSON)
    ///
    /// Defaults to `<config dir>/playwise/config.json`. A missing file
    /// means built-in defaults.
    #[arg(long, global = true, env = "PLAYWISE_CONFIG", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Print snapshots as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Enumeration of all available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the scripted demo
    ///
    /// Adds a handful of tracks (one duplicate gets refused), rates them
    /// from 5 downwards, listens to each one twice over, then prints the
    /// snapshot and the top favourites. Snapshot and favourites sizes come
    /// from the session config.
    Demo,

    /// Start an interactive session
    ///
    /// Reads one command per line from stdin. Type `help` for the list of
    /// commands and `quit` to leave. Nothing is kept once the session ends.
    Shell,

    /// Execute a script of session commands
    ///
    /// Uses the same commands as `shell`, one per line. Blank lines and lines
    /// starting with `#` are ignored.
    Run {
        /// Path to the script
        #[arg(value_hint = clap::ValueHint::FilePath)]
        script: PathBuf,

        /// Report failing lines and carry on instead of stopping
        #[arg(long)]
        keep_going: bool,
    },

    /// Generate shell completions
    ///
    /// Usage: playwise completion bash > ~/.local/share/bash-completion/completions/playwise
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}
