//! Board coordinates.

use std::num::NonZero;

use ndarray::Ix;

use crate::shape::SquareStep;

/// A single board coordinate.
pub type Coord = usize;
/// The side length of a board.
pub type Dimension = NonZero<Coord>;

#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug)]
/// A location `(col, row)` on a board. The top left corner is `Location(0, 0)`.
pub struct Location(pub Coord, pub Coord);

impl Location {
    /// The column of this location.
    #[inline]
    pub fn col(&self) -> Coord {
        self.0
    }

    /// The row of this location.
    #[inline]
    pub fn row(&self) -> Coord {
        self.1
    }

    // cells are stored row major
    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.1, self.0)
    }

    /// Offset this location by `(columns, rows)`.
    ///
    /// Stepping off the top or left edge wraps around to a coordinate no board contains.
    pub fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }

    /// Whether `other` is exactly one orthogonal step away from `self`.
    pub fn is_next_to(&self, other: Location) -> bool {
        SquareStep::direction_to(*self, other).is_some()
    }
}

impl From<(Ix, Ix)> for Location {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.1, value.0)
    }
}
