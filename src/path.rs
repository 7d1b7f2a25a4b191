use itertools::Itertools;
use ndarray::Array2;

use crate::cell::Cell;
use crate::color::Color;
use crate::location::Location;

/// An ordered chain of cells drawn in one [`Color`].
///
/// The path owns the membership relation; each member [`Cell`] only caches the path's color as its occupant.
/// Every operation that changes membership takes the board's cell grid so both sides stay in step.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlowPath {
    color: Color,
    cells: Vec<Location>,
}

impl FlowPath {
    pub(crate) fn new(color: Color) -> Self {
        Self {
            color,
            cells: Vec::new(),
        }
    }

    /// Release every held cell and, if `start` is given, begin again from it alone.
    pub(crate) fn reset(&mut self, grid: &mut Array2<Cell>, start: Option<Location>) {
        for location in self.cells.drain(..) {
            if let Some(cell) = grid.get_mut(location.as_index()) {
                cell.set_occupant(None);
            }
        }

        if let Some(start) = start {
            self.extend(grid, start);
        }
    }

    /// Append `next` to the end of this path and occupy it.
    ///
    /// Adjacency and color compatibility are the caller's business.
    pub(crate) fn extend(&mut self, grid: &mut Array2<Cell>, next: Location) {
        if let Some(cell) = grid.get_mut(next.as_index()) {
            cell.set_occupant(Some(self.color));
        }
        self.cells.push(next);
    }

    /// Drop `at` and everything drawn after it. Does nothing if `at` is not on this path.
    pub(crate) fn retract_from(&mut self, grid: &mut Array2<Cell>, at: Location) {
        let Some((index, _)) = self.cells.iter().find_position(|location| **location == at) else {
            return;
        };

        for location in self.cells.drain(index..) {
            if let Some(cell) = grid.get_mut(location.as_index()) {
                cell.set_occupant(None);
            }
        }
    }

    /// The color this path is drawn in.
    pub fn color(&self) -> Color {
        self.color
    }

    /// The cells of this path, from its starting endpoint to its head.
    pub fn cells(&self) -> &[Location] {
        &self.cells
    }

    /// Number of cells on this path.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether this path holds no cells at all.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// A path of a single cell is only a selected endpoint; there is no line to draw yet.
    pub fn is_drawn(&self) -> bool {
        self.cells.len() > 1
    }

    /// The cell this path was started from.
    pub fn first(&self) -> Option<Location> {
        self.cells.first().copied()
    }

    /// The most recently drawn cell.
    pub fn last(&self) -> Option<Location> {
        self.cells.last().copied()
    }

    /// Whether `location` is on this path.
    pub fn contains(&self, location: Location) -> bool {
        self.cells.contains(&location)
    }

    /// Whether every consecutive pair of cells is orthogonally adjacent.
    pub fn is_contiguous(&self) -> bool {
        self.cells.iter().tuple_windows().all(|(a, b)| a.is_next_to(*b))
    }
}
