//! The puzzle board: cells, flows and the level encoding.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use itertools::Itertools;
use ndarray::{s, Array2, AssignElem};
use rand::Rng;
use tracing::{debug, warn};
use unordered_pair::UnorderedPair;

use crate::cell::Cell;
use crate::codes::{ColorCodes, EMPTY_CODE};
use crate::color::Color;
use crate::location::{Coord, Location};
use crate::path::FlowPath;

/// Smallest side length a board can be shrunk to.
pub const MIN_LENGTH: Coord = 5;
/// Largest side length a board can be grown to.
pub const MAX_LENGTH: Coord = 25;

/// One puzzle: a square grid of [`Cell`]s and the [`FlowPath`] of every color anchored on it.
///
/// A board remembers the encoding it was loaded from so it can be [`fill`](Board::fill)ed again from scratch.
/// A board with an empty encoding is still being designed; see [`is_in_creation`](Board::is_in_creation).
///
/// Boards come from [`Board::from_encoding`], [`Board::new`] (blank, for authoring) or a
/// [`LevelBuilder`](crate::builder::LevelBuilder).
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) length: Coord,
    pub(crate) encoding: String,
    pub(crate) codes: ColorCodes,
    pub(crate) cells: Array2<Cell>,
    pub(crate) paths: BTreeMap<Color, FlowPath>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(MIN_LENGTH)
    }
}

/// Smallest square able to hold `count` cells.
fn side_length(count: usize) -> Coord {
    let mut length = 0;
    while length * length < count {
        length += 1;
    }
    length
}

impl Board {
    /// A blank board of side `length` with no encoding, ready for authoring.
    ///
    /// `length` is capped at [`MAX_LENGTH`]. Boards smaller than [`MIN_LENGTH`] are allowed but can only grow.
    pub fn new(length: Coord) -> Self {
        let length = length.clamp(1, MAX_LENGTH);
        let mut board = Self {
            length,
            encoding: String::new(),
            codes: ColorCodes::default(),
            cells: Array2::default((length, length)),
            paths: BTreeMap::new(),
        };
        board.fill();
        board
    }

    /// Load a board from a level encoding, drawing colors for foreign anchor characters from the thread RNG.
    pub fn from_encoding(encoding: &str) -> Self {
        Self::from_encoding_with(encoding, &mut rand::thread_rng())
    }

    /// Load a board from a level encoding, drawing colors for foreign anchor characters from `rng`.
    pub fn from_encoding_with<R: Rng + ?Sized>(encoding: &str, rng: &mut R) -> Self {
        let mut board = Self::new(MIN_LENGTH);
        board.load_from_encoding(encoding, rng);
        board
    }

    /// Replace this board with the level described by `encoding`.
    ///
    /// The side length is the smallest square holding every character. An empty encoding gives a blank
    /// [`MIN_LENGTH`] board in creation.
    pub fn load_from_encoding<R: Rng + ?Sized>(&mut self, encoding: &str, rng: &mut R) {
        let count = encoding.chars().count();
        self.length = if count == 0 { MIN_LENGTH } else { side_length(count) };
        self.encoding = encoding.to_owned();
        self.codes = ColorCodes::from_encoding(encoding, rng);
        self.fill();
    }

    /// Rebuild every cell from the stored encoding, dropping all drawn flows.
    ///
    /// Malformed encodings are tolerated: missing characters and anchors without a color become empty cells.
    pub fn fill(&mut self) {
        self.paths.clear();

        let chars = self.encoding.chars().collect_vec();
        if !chars.is_empty() && chars.len() < self.length * self.length {
            warn!(encoding = %self.encoding, length = self.length, "level encoding is too short, padding with empty cells");
        }

        let mut cells: Array2<Cell> = Array2::default((self.length, self.length));
        for ((row, col), cell) in cells.indexed_iter_mut() {
            let code = chars.get(row * self.length + col).copied().unwrap_or(EMPTY_CODE);
            if code == EMPTY_CODE {
                continue;
            }

            match self.codes.color_of(code) {
                Some(color) => {
                    cell.assign_elem(Cell::with_anchor(Some(color)));
                    self.paths.entry(color).or_insert_with(|| FlowPath::new(color));
                }
                None => warn!(%code, encoding = %self.encoding, "anchor has no color left, leaving the cell empty"),
            }
        }

        self.cells = cells;
    }

    /// The level encoding of this board.
    ///
    /// The stored encoding is returned as is while it still covers the board exactly; otherwise (new designs,
    /// resized boards) it is regenerated from the anchors on the board.
    pub fn export_encoding(&self) -> String {
        if self.encoding.chars().count() == self.length * self.length {
            return self.encoding.clone();
        }

        self.cells.iter()
            .map(|cell| match cell.anchor() {
                Some(color) => self.code_for(color),
                None => EMPTY_CODE,
            })
            .collect()
    }

    /// Make [`export_encoding`](Self::export_encoding) the stored encoding.
    ///
    /// Once committed, a designed board is no longer in creation.
    pub fn commit_encoding(&mut self) {
        let encoding = self.export_encoding();

        let uncoded = self.cells.iter()
            .filter_map(Cell::anchor)
            .unique()
            .filter(|color| self.codes.code_of(*color).is_none())
            .collect_vec();
        for color in uncoded {
            self.codes.assign(color.code(), color);
        }

        debug!(%encoding, "committed level encoding");
        self.encoding = encoding;
    }

    /// Grow (`delta > 0`) or shrink (`delta < 0`) the board by one row and column. Returns whether the board changed.
    ///
    /// Boards below [`MAX_LENGTH`] may grow and boards above [`MIN_LENGTH`] may shrink.
    /// Shrinking resets every flow crossing the discarded row or column and loses the anchors there.
    pub fn resize(&mut self, delta: isize) -> bool {
        let target = match delta.signum() {
            1 if self.length < MAX_LENGTH => self.length + 1,
            -1 if self.length > MIN_LENGTH => self.length - 1,
            _ => return false,
        };

        if target > self.length {
            let mut grown: Array2<Cell> = Array2::default((target, target));
            grown.slice_mut(s![..self.length, ..self.length]).assign(&self.cells);
            self.cells = grown;
        } else {
            let outer = target;
            let crossing = (0..self.length)
                .flat_map(|k| [Location(k, outer), Location(outer, k)])
                .filter_map(|location| self.occupant_at(location))
                .unique()
                .collect_vec();
            for color in crossing {
                if let Some(path) = self.paths.get_mut(&color) {
                    path.reset(&mut self.cells, None);
                }
            }

            self.cells = self.cells.slice(s![..target, ..target]).to_owned();

            let orphaned = self.paths.keys()
                .copied()
                .filter(|color| self.count_anchors(*color) == 0)
                .collect_vec();
            for color in orphaned {
                self.paths.remove(&color);
                self.codes.release(color);
            }
        }

        debug!(from = self.length, to = target, "resized board");
        self.length = target;
        true
    }

    /// Shorthand for `resize(1)`.
    pub fn grow_one(&mut self) -> bool {
        self.resize(1)
    }

    /// Shorthand for `resize(-1)`.
    pub fn shrink_one(&mut self) -> bool {
        self.resize(-1)
    }

    /// Side length of the board.
    pub fn length(&self) -> Coord {
        self.length
    }

    /// The encoding as stored, without regeneration. Empty while the board is in creation.
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// The character↔color mapping of this board.
    pub fn codes(&self) -> &ColorCodes {
        &self.codes
    }

    /// Whether `location` lies on this board.
    pub fn contains(&self, location: Location) -> bool {
        location.0 < self.length && location.1 < self.length
    }

    /// The cell at `location`.
    pub fn cell(&self, location: Location) -> Option<&Cell> {
        self.cells.get(location.as_index())
    }

    /// Every cell with its location, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (Location, &Cell)> + '_ {
        self.cells.indexed_iter().map(|(index, cell)| (Location::from(index), cell))
    }

    /// The anchor color at `location`.
    pub fn anchor_at(&self, location: Location) -> Option<Color> {
        self.cell(location).and_then(Cell::anchor)
    }

    /// The color of the flow occupying `location`.
    pub fn occupant_at(&self, location: Location) -> Option<Color> {
        self.cell(location).and_then(Cell::occupant)
    }

    /// The flow of `color`, if that color is on the board.
    pub fn path(&self, color: Color) -> Option<&FlowPath> {
        self.paths.get(&color)
    }

    /// Every flow on the board, in palette order.
    pub fn paths(&self) -> impl Iterator<Item = &FlowPath> + '_ {
        self.paths.values()
    }

    /// The character a renderer or encoder should use for `color` on this board.
    pub fn code_for(&self, color: Color) -> char {
        self.codes.code_of(color).unwrap_or(color.code())
    }

    /// Number of anchors of `color`.
    pub fn count_anchors(&self, color: Color) -> usize {
        self.cells.iter().filter(|cell| cell.anchor() == Some(color)).count()
    }

    /// Both anchors of `color`, if it has exactly two.
    pub fn anchors_of(&self, color: Color) -> Option<UnorderedPair<Location>> {
        self.cells()
            .filter(|(_, cell)| cell.anchor() == Some(color))
            .map(|(location, _)| location)
            .collect_tuple::<(Location, Location)>()
            .map(UnorderedPair::from)
    }

    /// Whether the flow of `color` runs from one of its anchors to the other.
    pub fn is_connected(&self, color: Color) -> bool {
        let (Some(path), Some(anchors)) = (self.path(color), self.anchors_of(color)) else {
            return false;
        };

        match (path.first(), path.last()) {
            (Some(first), Some(last)) => path.is_drawn() && UnorderedPair::from((first, last)) == anchors,
            _ => false,
        }
    }

    /// Number of flows joining their two anchors.
    pub fn connected_flows(&self) -> usize {
        self.paths.keys().filter(|color| self.is_connected(**color)).count()
    }

    /// Solved: every cell is covered and no flow is a lone endpoint.
    pub fn is_finished(&self) -> bool {
        !self.cells.is_empty()
            && self.cells.iter().all(Cell::is_occupied)
            // a lone endpoint is not a flow, which matters for new designs
            && self.paths.values().all(|path| path.len() != 1)
    }

    /// Some flow has been started.
    pub fn is_started(&self) -> bool {
        self.cells.iter().any(Cell::is_occupied)
    }

    /// Still being designed, i.e. no encoding has been committed.
    pub fn is_in_creation(&self) -> bool {
        self.encoding.is_empty()
    }

    pub(crate) fn restart_flow(&mut self, color: Color, at: Location) {
        let path = self.paths.entry(color).or_insert_with(|| FlowPath::new(color));
        path.reset(&mut self.cells, Some(at));
    }

    pub(crate) fn extend_flow(&mut self, color: Color, next: Location) {
        if let Some(path) = self.paths.get_mut(&color) {
            path.extend(&mut self.cells, next);
        }
    }

    pub(crate) fn retract_flow(&mut self, color: Color, at: Location) {
        if let Some(path) = self.paths.get_mut(&color) {
            path.retract_from(&mut self.cells, at);
        }
    }

    /// Make `location` an anchor of `color`.
    pub(crate) fn place_anchor(&mut self, location: Location, color: Color) {
        if let Some(cell) = self.cells.get_mut(location.as_index()) {
            cell.set_anchor(Some(color));
            self.paths.entry(color).or_insert_with(|| FlowPath::new(color));
            if self.codes.code_of(color).is_none() {
                self.codes.assign(color.code(), color);
            }
        }
    }

    /// Delete the anchor at `location`, clearing its flow. The color is freed once none of its anchors remain.
    pub(crate) fn remove_anchor(&mut self, location: Location) -> Option<Color> {
        let color = self.anchor_at(location)?;
        if let Some(cell) = self.cells.get_mut(location.as_index()) {
            cell.set_anchor(None);
        }
        if let Some(path) = self.paths.get_mut(&color) {
            path.reset(&mut self.cells, None);
        }

        if self.count_anchors(color) == 0 {
            self.paths.remove(&color);
            self.codes.release(color);
        }

        Some(color)
    }

    /// Turn a bare cell into the first anchor of a color not yet on the board, with a one cell flow on it.
    pub(crate) fn open_flow<R: Rng + ?Sized>(&mut self, location: Location, rng: &mut R) -> Option<Color> {
        if !self.contains(location) {
            return None;
        }

        let color = self.codes.random_unused(rng)?;
        self.place_anchor(location, color);
        self.restart_flow(color, location);
        Some(color)
    }

    /// Pin the two ends of every drawn flow as anchors, turning a freehand design into a puzzle.
    ///
    /// Anchors pinned partway along a flow are dropped so every color keeps exactly its two ends.
    pub(crate) fn crystallize(&mut self) {
        let ends = self.paths.values()
            .filter_map(|path| Some((path.color(), path.first()?, path.last()?)))
            .collect_vec();

        for (color, first, last) in ends {
            self.place_anchor(first, color);
            self.place_anchor(last, color);

            let inner = self.paths.get(&color)
                .map(|path| path.cells()
                    .iter()
                    .copied()
                    .filter(|location| *location != first && *location != last)
                    .filter(|location| self.anchor_at(*location) == Some(color))
                    .collect_vec())
                .unwrap_or_default();
            if !inner.is_empty() {
                warn!(%color, dropped = inner.len(), "flow was pinned partway, keeping only its ends as anchors");
            }
            for location in inner {
                if let Some(cell) = self.cells.get_mut(location.as_index()) {
                    cell.set_anchor(None);
                }
            }
        }
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.rows() {
            for cell in row {
                let ch = match (cell.anchor(), cell.occupant()) {
                    (Some(color), _) => self.code_for(color).to_ascii_uppercase(),
                    (None, Some(color)) => self.code_for(color).to_ascii_lowercase(),
                    (None, None) => '.',
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
