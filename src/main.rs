//! # PlayWise
//!
//! Command-line front end for the PlayWise playlist engine. All state lives in
//! memory for the lifetime of one invocation.
//!
//! ## Usage
//!
//! ```bash
//! # Scripted walkthrough
//! playwise demo
//!
//! # Interactive session
//! playwise shell
//!
//! # Replay a file of commands, snapshot as JSON
//! playwise --json run session.txt
//! ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::{debug, info};
use playwise::cli::{self, Args};
use playwise::commands::{self, Flow, Interpreter};
use playwise::completion;
use playwise::config::SessionConfig;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

/// Interactive loop: prompt, read a line, execute it, report errors and go on.
fn run_shell(interpreter: &mut Interpreter) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "PlayWise shell. Type `help' for commands, `quit' to leave.")?;

    let mut lines = stdin.lock().lines();
    loop {
        write!(stdout, "playwise> ")?;
        stdout.flush()?;

        let Some(line) = lines.next() else {
            writeln!(stdout)?;
            break;
        };
        let line = line.context("Failed to read from stdin")?;

        match interpreter.execute_line(&line, &mut stdout) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => eprintln!("Error: {e:#}"),
        }
    }
    Ok(())
}

/// Main entry point for the PlayWise application.
///
/// Initializes logging, parses command-line arguments, loads the session
/// config and routes to the selected command.
///
/// # Logging
///
/// Controlled via `RUST_LOG`:
/// - `RUST_LOG=debug playwise shell` - Enable debug logging
/// - `RUST_LOG=playwise::popularity=trace playwise demo` - Module-specific logging
fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    match args.command {
        cli::Command::Demo => {
            let config = SessionConfig::load(args.config.as_deref())?;
            debug!("Session config: {config:?}");
            info!("Running demo");
            commands::run_demo(&mut io::stdout().lock(), config, args.json)?;
        }
        cli::Command::Shell => {
            let config = SessionConfig::load(args.config.as_deref())?;
            debug!("Session config: {config:?}");
            let mut interpreter = Interpreter::new(config, args.json);
            run_shell(&mut interpreter)?;
        }
        cli::Command::Run { script, keep_going } => {
            let config = SessionConfig::load(args.config.as_deref())?;
            debug!("Session config: {config:?}");
            info!("Running script {}", script.display());
            let file = File::open(&script)
                .with_context(|| format!("Failed to open script {}", script.display()))?;
            let mut interpreter = Interpreter::new(config, args.json);
            interpreter.run(BufReader::new(file), &mut io::stdout().lock(), !keep_going)?;
        }
        cli::Command::Completion { shell } => {
            let mut cmd = Args::command();
            completion::generate_completions(
                completion::shell_to_completion_shell(shell),
                &mut cmd,
                &mut io::stdout(),
            );
        }
    }

    Ok(())
}
