#![warn(missing_docs)]

//! # `freeflow`
//!
//! The rules engine of a [Flow Free](https://en.wikipedia.org/wiki/Flow_Free) style puzzle: pairs of colored anchors
//! on a square grid are joined by flows that must not cross, until every cell is covered.
//!
//! Load a [`Board`] from a level encoding (or build one with a [`LevelBuilder`](builder::LevelBuilder)), start a
//! [`Session`] on it and feed it [`Action`](session::Action)s. The session edits [`FlowPath`]s, tracks what the
//! player is holding and reports when the level is solved. A board with no encoding is a new design: the session
//! then lets the player draw freehand, place and delete anchors and resize the grid, and the finished drawing
//! becomes a level.
//!
//! [`Game`](game::Game) ties sessions to a list of levels kept in a flat file by a [`LevelStore`](store::LevelStore).
//!
//! # Level encodings
//! A level is a row-major string, one character per cell. `'0'` is an empty cell; any other character is an anchor.
//! The side length is the smallest square holding every character. Characters naming a [`Color`] keep it; others are
//! given an unused color when the level is loaded.
//!
//! ```
//! use freeflow::{Board, Location, Session};
//!
//! let mut session = Session::seeded(Board::from_encoding("R0R0"), 0);
//! session.select(Location(0, 0));
//! session.extend(Location(1, 0));
//! session.extend(Location(1, 1));
//! session.extend(Location(0, 1));
//! assert!(session.is_finished());
//! assert_eq!(session.board().to_string(), "Rr\nRr\n");
//! ```
//!
//! Nothing here is fallible on user input. Actions that make no sense are dropped, and damaged level data is
//! repaired as well as it can be with a warning through [`tracing`].

pub use board::Board;
pub use cell::Cell;
pub use color::Color;
pub use location::Location;
pub use path::FlowPath;
pub use session::Session;

pub mod board;
pub mod builder;
pub(crate) mod cell;
pub mod codes;
pub mod color;
pub mod config;
pub mod game;
pub mod location;
pub(crate) mod path;
pub mod session;
pub mod shape;
pub mod store;
#[cfg(feature = "wasm")]
pub mod wasm;
mod tests;
