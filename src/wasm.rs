//! Bindings for a browser renderer.
//!
//! Locations cross the boundary as `(col, row)` argument pairs, or flattened `[col, row, col, row, ...]` arrays.

use js_sys::Uint8Array;
use rand::rngs::StdRng;
use rand::SeedableRng;
use strum::VariantArray;
use wasm_bindgen::prelude::*;

use crate::board::Board;
use crate::color::Color;
use crate::location::Location;
use crate::session::{Mode, Outcome, Session};
use crate::shape::SquareStep;

/// A [`Session`] driven from JavaScript.
#[wasm_bindgen]
pub struct WasmSession {
    session: Session,
}

fn completed(outcome: Outcome) -> bool {
    matches!(outcome, Outcome::Completed { .. })
}

fn flatten(locations: impl IntoIterator<Item = Location>) -> Vec<u32> {
    locations.into_iter()
        .flat_map(|location| [location.col() as u32, location.row() as u32])
        .collect()
}

#[wasm_bindgen]
impl WasmSession {
    /// Play the level described by `encoding`.
    #[wasm_bindgen(constructor)]
    pub fn new(encoding: &str, seed: u32) -> Self {
        let mut rng = StdRng::seed_from_u64(u64::from(seed));
        let board = Board::from_encoding_with(encoding, &mut rng);
        Self {
            session: Session::with_rng(board, rng),
        }
    }

    /// Design a new level of side `length`, capped at [`MAX_LENGTH`](crate::board::MAX_LENGTH).
    pub fn author(length: usize, seed: u32) -> Self {
        Self {
            session: Session::seeded(Board::new(length), u64::from(seed)),
        }
    }

    /// Click `(col, row)`. Returns whether this solved the level.
    pub fn select(&mut self, col: usize, row: usize) -> bool {
        completed(self.session.select(Location(col, row)))
    }

    /// Drag onto `(col, row)`. Returns whether this solved the level.
    pub fn extend(&mut self, col: usize, row: usize) -> bool {
        completed(self.session.extend(Location(col, row)))
    }

    /// Step the held flow: 0 up, 1 down, 2 left, 3 right.
    pub fn step(&mut self, direction: u8) -> bool {
        match SquareStep::VARIANTS.get(usize::from(direction)) {
            Some(direction) => completed(self.session.step(*direction)),
            None => false,
        }
    }

    /// Add a row and a column to a design.
    pub fn grow(&mut self) -> bool {
        self.session.grow()
    }

    /// Drop the last row and column of a design.
    pub fn shrink(&mut self) -> bool {
        self.session.shrink()
    }

    /// Side length of the board.
    pub fn length(&self) -> usize {
        self.session.board().length()
    }

    /// Whether the session designs a level.
    #[wasm_bindgen(js_name = isAuthoring)]
    pub fn is_authoring(&self) -> bool {
        self.session.mode() == Mode::Author
    }

    /// The code of the anchor at `(col, row)`.
    pub fn anchor(&self, col: usize, row: usize) -> Option<char> {
        let board = self.session.board();
        board.anchor_at(Location(col, row)).map(|color| board.code_for(color))
    }

    /// The code of the flow passing through `(col, row)`.
    pub fn occupant(&self, col: usize, row: usize) -> Option<char> {
        let board = self.session.board();
        board.occupant_at(Location(col, row)).map(|color| board.code_for(color))
    }

    /// Codes of every color on the board, in palette order.
    pub fn codes(&self) -> String {
        let board = self.session.board();
        board.paths().map(|path| board.code_for(path.color())).collect()
    }

    /// The cells of the flow with code `code`, flattened.
    #[wasm_bindgen(js_name = pathOf)]
    pub fn path_of(&self, code: char) -> Vec<u32> {
        let board = self.session.board();
        board.codes()
            .color_of(code)
            .and_then(|color| board.path(color))
            .map(|path| flatten(path.cells().iter().copied()))
            .unwrap_or_default()
    }

    /// The held cell as `[col, row]`, or empty.
    pub fn selection(&self) -> Vec<u32> {
        flatten(self.session.selection().location())
    }

    /// Whether the level is solved.
    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.session.is_finished()
    }

    /// The level encoding, as it would be saved.
    pub fn encoding(&self) -> String {
        self.session.board().export_encoding()
    }

    /// The board as text, one line per row.
    pub fn render(&self) -> String {
        self.session.board().to_string()
    }
}

/// The display color of the native code `code` as `[r, g, b]`.
#[wasm_bindgen(js_name = rgbOf)]
pub fn rgb_of(code: char) -> Result<Uint8Array, JsValue> {
    let Some(color) = Color::from_code(code) else {
        return Err(js_sys::Error::new(&format!("no color has code {}", code)).into());
    };

    let (r, g, b) = color.rgb();
    Ok(Uint8Array::from(&[r, g, b][..]))
}
