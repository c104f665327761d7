//! # Line Command Interpreter
//!
//! The text commands understood by `playwise shell` and `playwise run`. Each
//! line parses into a [`LineCommand`], which [`Interpreter::execute`] applies
//! to its [`Session`], writing human-readable output to any `Write`.
//!
//! ## Commands
//!
//! ```text
//! add <title> | <artist> | <seconds>    append a track
//! delete <index>                        remove the track at index
//! move <from> <to>                      reposition a track
//! reverse                               reverse the playlist
//! show                                  list the playlist
//! rate <index> <1-5>                    rate a track
//! unrate <id>                           drop every rating of a track
//! ratings <1-5>                         list tracks with that rating
//! play <index> [seconds]                play a track
//! undo                                  undo the last play
//! clean                                 remove duplicate tracks
//! snapshot                              dashboard summary
//! top [k]                               most listened tracks
//! search <title>                        look up a track by title
//! sort <title|artist|duration|added> [desc]
//! history [n]                           recent plays
//! help                                  this text
//! quit                                  leave the shell
//! ```

use crate::config::SessionConfig;
use crate::rating::Rating;
use crate::session::Session;
use crate::sorting::{SortKey, SortOrder};
use crate::track::{format_duration, TrackRef};
use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};
use std::str::FromStr;

pub const HELP: &str = "\
Commands:
  add <title> | <artist> | <seconds>
  delete <index>
  move <from> <to>
  reverse
  show
  rate <index> <1-5>
  unrate <id>
  ratings <1-5>
  play <index> [seconds]
  undo
  clean
  snapshot
  top [k]
  search <title>
  sort <title|artist|duration|added> [desc]
  history [n]
  help
  quit";

/// One parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineCommand {
    Add { title: String, artist: String, duration: u32 },
    Delete(usize),
    Move { from: usize, to: usize },
    Reverse,
    Show,
    Rate { index: usize, rating: Rating },
    Unrate(String),
    Ratings(Rating),
    Play { index: usize, seconds: Option<u32> },
    Undo,
    Clean,
    Snapshot,
    Top(Option<usize>),
    Search(String),
    Sort { key: SortKey, order: SortOrder },
    History(Option<usize>),
    Help,
    Quit,
}

fn parse_number<T: FromStr>(raw: Option<&str>, what: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = raw.with_context(|| format!("Missing {what}"))?;
    raw.parse()
        .with_context(|| format!("Invalid {what}: `{raw}'"))
}

fn parse_optional<T: FromStr>(raw: Option<&str>, what: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.map(|value| parse_number(Some(value), what)).transpose()
}

fn parse_rating(raw: Option<&str>) -> Result<Rating> {
    let value: u8 = parse_number(raw, "rating")?;
    Ok(Rating::new(value)?)
}

impl FromStr for LineCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let mut args = rest.split_whitespace();

        let command = match verb.to_lowercase().as_str() {
            "add" => {
                let fields: Vec<&str> = rest.split('|').map(str::trim).collect();
                let [title, artist, duration] = fields.as_slice() else {
                    bail!("Usage: add <title> | <artist> | <seconds>");
                };
                if title.is_empty() || artist.is_empty() {
                    bail!("Title and artist cannot be empty");
                }
                Self::Add {
                    title: (*title).to_string(),
                    artist: (*artist).to_string(),
                    duration: parse_number(Some(*duration), "duration")?,
                }
            }
            "delete" => Self::Delete(parse_number(args.next(), "index")?),
            "move" => Self::Move {
                from: parse_number(args.next(), "source index")?,
                to: parse_number(args.next(), "target index")?,
            },
            "reverse" => Self::Reverse,
            "show" => Self::Show,
            "rate" => Self::Rate {
                index: parse_number(args.next(), "index")?,
                rating: parse_rating(args.next())?,
            },
            "unrate" => match args.next() {
                Some(id) => Self::Unrate(id.to_string()),
                None => bail!("Usage: unrate <id>"),
            },
            "ratings" => Self::Ratings(parse_rating(args.next())?),
            "play" => Self::Play {
                index: parse_number(args.next(), "index")?,
                seconds: parse_optional(args.next(), "seconds")?,
            },
            "undo" => Self::Undo,
            "clean" => Self::Clean,
            "snapshot" => Self::Snapshot,
            "top" => Self::Top(parse_optional(args.next(), "count")?),
            "search" => {
                if rest.is_empty() {
                    bail!("Usage: search <title>");
                }
                Self::Search(rest.to_string())
            }
            "sort" => {
                let key = args.next().context("Usage: sort <title|artist|duration|added> [desc]")?;
                let order = match args.next() {
                    Some("desc") => SortOrder::Descending,
                    Some("asc") | None => SortOrder::Ascending,
                    Some(other) => bail!("Unknown sort direction: {other}. Use asc or desc"),
                };
                Self::Sort { key: key.parse()?, order }
            }
            "history" => Self::History(parse_optional(args.next(), "count")?),
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => bail!("Unknown command: {other}. Type `help' for a list"),
        };
        Ok(command)
    }
}

/// Whether the caller should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Applies commands to a session.
#[derive(Debug, Default)]
pub struct Interpreter {
    session: Session,
    json: bool,
}

fn describe(track: &TrackRef) -> String {
    format!("{} by {} ({})", track.title, track.artist, format_duration(track.duration))
}

fn write_numbered(out: &mut impl Write, tracks: &[TrackRef], empty: &str) -> Result<()> {
    if tracks.is_empty() {
        writeln!(out, "{empty}")?;
    }
    for (i, track) in tracks.iter().enumerate() {
        writeln!(out, "{i}: {}", describe(track))?;
    }
    Ok(())
}

impl Interpreter {
    #[must_use]
    pub fn new(config: SessionConfig, json: bool) -> Self {
        Self {
            session: Session::with_config(config),
            json,
        }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Parses and executes one line. Blank lines and `#` comments are skipped.
    ///
    /// # Errors
    ///
    /// Fails on parse errors, out-of-range indices and write failures.
    pub fn execute_line(&mut self, line: &str, out: &mut impl Write) -> Result<Flow> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Flow::Continue);
        }
        let command: LineCommand = line.parse()?;
        self.execute(command, out)
    }

    /// Executes a parsed command.
    ///
    /// # Errors
    ///
    /// Fails on out-of-range indices, unknown ids and write failures.
    pub fn execute(&mut self, command: LineCommand, out: &mut impl Write) -> Result<Flow> {
        log::trace!("Executing {command:?}");
        match command {
            LineCommand::Add { title, artist, duration } => {
                match self.session.add_track(&title, &artist, duration) {
                    Some(track) => writeln!(out, "Added #{}: {}", track.id, describe(&track))?,
                    None => writeln!(out, "Skipped duplicate: {title} by {artist}")?,
                }
            }
            LineCommand::Delete(index) => {
                let track = self.session.delete_at(index)?;
                writeln!(out, "Deleted: {}", describe(&track))?;
            }
            LineCommand::Move { from, to } => {
                self.session.move_track(from, to)?;
                writeln!(out, "Moved track from {from} to {to}")?;
            }
            LineCommand::Reverse => {
                self.session.reverse();
                writeln!(out, "Playlist reversed")?;
            }
            LineCommand::Show => {
                let tracks = self.session.playlist().to_list();
                write_numbered(out, &tracks, "Playlist is empty")?;
            }
            LineCommand::Rate { index, rating } => {
                let track = self.session.rate(index, rating)?;
                writeln!(out, "Rated {} with {rating}", track.title)?;
            }
            LineCommand::Unrate(id) => {
                let removed = self.session.unrate(&id)?;
                writeln!(out, "Removed {removed} rating entries for #{id}")?;
            }
            LineCommand::Ratings(rating) => {
                let tracks = self.session.tracks_rated(rating);
                write_numbered(out, &tracks, &format!("No tracks rated {rating}"))?;
            }
            LineCommand::Play { index, seconds } => {
                let track = match seconds {
                    Some(seconds) => self.session.play_for(index, seconds)?,
                    None => self.session.play(index)?,
                };
                writeln!(out, "Played: {}", describe(&track))?;
            }
            LineCommand::Undo => match self.session.undo_last_play() {
                Some(track) => {
                    writeln!(out, "Undid play of {}, re-added to playlist", track.title)?;
                }
                None => writeln!(out, "No playback history")?,
            },
            LineCommand::Clean => {
                let removed = self.session.clean_duplicates();
                writeln!(out, "Removed {} duplicates", removed.len())?;
            }
            LineCommand::Snapshot => {
                let snapshot = self.session.snapshot();
                if self.json {
                    writeln!(out, "{}", serde_json::to_string_pretty(&snapshot)?)?;
                } else {
                    write!(out, "{snapshot}")?;
                }
            }
            LineCommand::Top(k) => {
                let k = k.unwrap_or(self.session.config().top_k);
                let top = self.session.top_favorites(k);
                writeln!(out, "Top {k} favourite tracks:")?;
                if top.is_empty() {
                    writeln!(out, "(No tracks have been played yet.)")?;
                }
                for (rank, track) in top.iter().enumerate() {
                    writeln!(out, "{}. {}", rank + 1, describe(track))?;
                }
            }
            LineCommand::Search(title) => match self.session.search_by_title(&title) {
                Some(track) => writeln!(out, "Found #{}: {}", track.id, describe(&track))?,
                None => writeln!(out, "Track not found")?,
            },
            LineCommand::Sort { key, order } => {
                let sorted = self.session.sorted_view(key, order);
                write_numbered(out, &sorted, "Playlist is empty")?;
            }
            LineCommand::History(limit) => {
                let limit = limit.unwrap_or(self.session.config().history_limit);
                let recent = self.session.recent_history(limit);
                write_numbered(out, &recent, "No playback history")?;
            }
            LineCommand::Help => writeln!(out, "{HELP}")?,
            LineCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Runs every line from `input`. With `stop_on_error` the first failing
    /// line aborts the run; otherwise errors are reported and skipped.
    ///
    /// # Errors
    ///
    /// Fails on read/write errors, or on the first bad line when `stop_on_error`.
    pub fn run(
        &mut self,
        input: impl BufRead,
        out: &mut impl Write,
        stop_on_error: bool,
    ) -> Result<()> {
        for (number, line) in input.lines().enumerate() {
            let line = line.context("Failed to read command")?;
            match self.execute_line(&line, out) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(e) if stop_on_error => {
                    return Err(e.context(format!("Line {}: {}", number + 1, line.trim())));
                }
                Err(e) => writeln!(out, "Error: {e:#}")?,
            }
        }
        Ok(())
    }
}

/// Tracks loaded by the demo, one of them a duplicate.
pub const DEMO_TRACKS: [(&str, &str, u32); 5] = [
    ("Fix You", "Coldplay", 295),
    ("Blinding Lights", "The Weeknd", 200),
    ("Fix You", "Coldplay", 295),
    ("Bohemian Rhapsody", "Queen", 354),
    ("Lose Yourself", "Eminem", 326),
];

/// Scripted walkthrough: duplicate-guarded adds, a falling rating per track,
/// a double-length listen of every track, then a snapshot and the top
/// favourites.
///
/// `config` sizes the snapshot and the favourites list; duplicate refusal is
/// always on for the demo.
///
/// # Errors
///
/// Fails only on write errors.
pub fn run_demo(out: &mut impl Write, config: SessionConfig, json: bool) -> Result<()> {
    let config = SessionConfig {
        dedupe_on_add: true,
        ..config
    };
    let mut interpreter = Interpreter::new(config, json);

    for (title, artist, duration) in DEMO_TRACKS {
        interpreter.execute(
            LineCommand::Add {
                title: title.to_string(),
                artist: artist.to_string(),
                duration,
            },
            out,
        )?;
    }

    let tracks = interpreter.session.playlist().to_list();
    for (index, track) in tracks.iter().enumerate() {
        let stars = u8::try_from(5usize.saturating_sub(index))
            .unwrap_or(Rating::MIN)
            .max(Rating::MIN);
        interpreter.execute(
            LineCommand::Rate {
                index,
                rating: Rating::new(stars)?,
            },
            out,
        )?;
        interpreter.execute(
            LineCommand::Play {
                index,
                seconds: Some(track.duration * 2),
            },
            out,
        )?;
    }

    writeln!(out)?;
    interpreter.execute(LineCommand::Snapshot, out)?;
    writeln!(out)?;
    interpreter.execute(LineCommand::Top(None), out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output_of(interpreter: &mut Interpreter, script: &str) -> String {
        let mut out = Vec::new();
        interpreter.run(script.as_bytes(), &mut out, true).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_add() {
        let command: LineCommand = "add Fix You | Coldplay | 295".parse().unwrap();
        assert_eq!(
            command,
            LineCommand::Add {
                title: "Fix You".to_string(),
                artist: "Coldplay".to_string(),
                duration: 295,
            }
        );
        assert!("add Fix You | Coldplay".parse::<LineCommand>().is_err());
        assert!("add Fix You | Coldplay | long".parse::<LineCommand>().is_err());
    }

    #[test]
    fn test_parse_rejects_bad_rating() {
        assert!("rate 0 6".parse::<LineCommand>().is_err());
        assert!("rate 0 0".parse::<LineCommand>().is_err());
        assert!("rate 0 5".parse::<LineCommand>().is_ok());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!("top".parse::<LineCommand>().unwrap(), LineCommand::Top(None));
        assert_eq!("TOP 2".parse::<LineCommand>().unwrap(), LineCommand::Top(Some(2)));
        assert_eq!(
            "sort duration desc".parse::<LineCommand>().unwrap(),
            LineCommand::Sort { key: SortKey::Duration, order: SortOrder::Descending }
        );
        assert_eq!(
            "search Blinding Lights".parse::<LineCommand>().unwrap(),
            LineCommand::Search("Blinding Lights".to_string())
        );
        assert!("dance".parse::<LineCommand>().is_err());
        assert!("move 1".parse::<LineCommand>().is_err());
    }

    #[test]
    fn test_script_session() {
        let mut interpreter = Interpreter::default();
        let output = output_of(
            &mut interpreter,
            "add C | X | 100\nadd A | Y | 200\n# comment\n\n\
             add B | Z | 150\nsort title\nreverse\nshow\n",
        );
        assert!(output.contains("0: A by Y (3:20)"));
        assert!(output.contains("0: B by Z (2:30)"));
        assert_eq!(interpreter.session().playlist().len(), 3);
    }

    #[test]
    fn test_errors_are_reported_and_skipped() {
        let mut interpreter = Interpreter::default();
        let mut out = Vec::new();
        interpreter
            .run("delete 0\nadd A | X | 10\n".as_bytes(), &mut out, false)
            .unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Error: index 0 out of range"));
        assert_eq!(interpreter.session().playlist().len(), 1);
    }

    #[test]
    fn test_stop_on_error_names_line() {
        let mut interpreter = Interpreter::default();
        let mut out = Vec::new();
        let err = interpreter
            .run("add A | X | 10\nmove 0 4\n".as_bytes(), &mut out, true)
            .unwrap_err();
        assert!(format!("{err:#}").contains("Line 2"));
    }

    #[test]
    fn test_quit_stops_reading() {
        let mut interpreter = Interpreter::default();
        output_of(&mut interpreter, "add A | X | 10\nquit\nadd B | Y | 20\n");
        assert_eq!(interpreter.session().playlist().len(), 1);
    }

    #[test]
    fn test_undo_on_empty_history() {
        let mut interpreter = Interpreter::default();
        assert!(output_of(&mut interpreter, "undo\n").contains("No playback history"));
    }

    #[test]
    fn test_demo_output() {
        let mut out = Vec::new();
        run_demo(&mut out, SessionConfig::default(), false).unwrap();
        let output = String::from_utf8(out).unwrap();

        assert!(output.contains("Skipped duplicate: Fix You by Coldplay"));
        assert!(output.contains("Top 3 favourite tracks:"));
        assert!(output.contains("1. Bohemian Rhapsody by Queen (5:54)"));
        assert!(output.contains("2. Lose Yourself by Eminem (5:26)"));
        assert!(output.contains("3. Fix You by Coldplay (4:55)"));
    }

    #[test]
    fn test_demo_honours_config() {
        let config = SessionConfig {
            top_k: 1,
            dedupe_on_add: false,
            ..SessionConfig::default()
        };
        let mut out = Vec::new();
        run_demo(&mut out, config, false).unwrap();
        let output = String::from_utf8(out).unwrap();

        assert!(output.contains("Skipped duplicate: Fix You by Coldplay"));
        assert!(output.contains("Top 1 favourite tracks:"));
        assert!(output.contains("1. Bohemian Rhapsody by Queen (5:54)"));
        assert!(!output.contains("2. Lose Yourself"));
    }
}
