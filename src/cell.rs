use crate::color::Color;

/// One square of a board.
///
/// `anchor` marks a fixed flow endpoint. `occupant` names the flow currently passing through; it is a key into the
/// board's path map, written only by [`FlowPath`](crate::FlowPath) operations.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Cell {
    anchor: Option<Color>,
    occupant: Option<Color>,
}

impl Cell {
    pub(crate) fn with_anchor(anchor: Option<Color>) -> Self {
        Self { anchor, occupant: None }
    }

    // only flow paths call this
    pub(crate) fn set_occupant(&mut self, occupant: Option<Color>) {
        self.occupant = occupant;
    }

    pub(crate) fn set_anchor(&mut self, anchor: Option<Color>) {
        self.anchor = anchor;
    }

    /// The color this cell is an endpoint of, if it is one.
    pub fn anchor(&self) -> Option<Color> {
        self.anchor
    }

    /// The color of the flow occupying this cell, if any.
    pub fn occupant(&self) -> Option<Color> {
        self.occupant
    }

    /// Whether this cell is a flow endpoint.
    pub fn is_anchor(&self) -> bool {
        self.anchor.is_some()
    }

    /// Whether a flow passes through this cell.
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Whether this cell is neither an endpoint nor occupied.
    pub fn is_bare(&self) -> bool {
        !self.is_anchor() && !self.is_occupied()
    }
}
