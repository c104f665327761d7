//! In-memory playlist engine with ratings, favourites and playback history.
//!
//! Core modules:
//! - [`playlist`] - Doubly linked playlist with positional edits
//! - [`dedup`] - Duplicate detection and cleanup
//! - [`rating`] - Rating index (BST of rating buckets)
//! - [`popularity`] - Listening-time ranking with lazy top-k
//! - [`history`] - Playback log with undo
//! - [`sorting`] - Stable merge sort
//! - [`snapshot`] - Point-in-time dashboard
//!
//! ### Supporting Modules
//!
//! - [`track`] - Track records
//! - [`registry`] - Lookup by id and title
//! - [`session`] - All containers wired together
//! - [`commands`] - Line command interpreter used by the binary
//! - [`config`] - Session tuning from a JSON file
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//! - [`error`] - Typed errors
//!
//! ## Quick Start Example
//!
//! ```
//! use playwise::rating::Rating;
//! use playwise::session::Session;
//!
//! let mut session = Session::new();
//! session.add_track("Fix You", "Coldplay", 295);
//! session.add_track("Blinding Lights", "The Weeknd", 200);
//!
//! session.move_track(1, 0)?;
//! session.rate(0, Rating::new(5)?)?;
//! session.play(0)?;
//!
//! let top = session.top_favorites(1);
//! assert_eq!(top[0].title, "Blinding Lights");
//!
//! let snapshot = session.snapshot();
//! assert_eq!(snapshot.rating_counts[&5], 1);
//! # Ok::<(), playwise::error::PlaylistError>(())
//! ```
//!
//! ## Error Handling
//!
//! Core containers return [`error::PlaylistError`]; out-of-range positions are
//! rejected before anything is relinked. "Nothing there" results (empty
//! history, unused rating, fewer favourites than asked for) come back as
//! `None` or an empty `Vec`. The CLI side works in `anyhow::Result`.
//!
//! ## Threading
//!
//! Everything is single-threaded and tracks are shared with `Rc`. Hosts that
//! need cross-thread access must wrap a whole [`session::Session`] behind
//! their own lock.

pub mod cli;
pub mod commands;
pub mod completion;
pub mod config;
pub mod dedup;
pub mod error;
pub mod history;
pub mod playlist;
pub mod popularity;
pub mod rating;
pub mod registry;
pub mod session;
pub mod snapshot;
pub mod sorting;
pub mod track;
