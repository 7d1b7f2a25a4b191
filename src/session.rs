//! The interaction state machine.
//!
//! Input collaborators turn raw events into [`Action`]s: a primary click or touch becomes [`Action::Select`], a drag
//! or directional step becomes [`Action::Extend`]. [`transition`] applies one action to a [`Board`]; a [`Session`]
//! wraps it with the selection, the mode and the completion check.
//!
//! Invalid actions are never errors. Whatever cannot be done is simply not done.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, trace};

use crate::board::Board;
use crate::cell::Cell;
use crate::location::Location;
use crate::path::FlowPath;
use crate::shape::SquareStep;

/// Whether a session solves a level or designs one.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Mode {
    /// Anchors are fixed; flows are drawn between them.
    Play,
    /// Anchors are placed and removed freely and the board can be resized.
    Author,
}

/// The cell the player is holding, if any.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Selection {
    /// Nothing held.
    #[default]
    Idle,
    /// Holding this cell; the next extension continues from it.
    Selecting(Location),
}

impl Selection {
    /// The held cell.
    pub fn location(&self) -> Option<Location> {
        match self {
            Self::Idle => None,
            Self::Selecting(location) => Some(*location),
        }
    }
}

/// One abstract input.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Action {
    /// Primary click or initial touch on a cell.
    Select(Location),
    /// Drag onto, or step into, a cell.
    Extend(Location),
}

impl Action {
    /// The cell this action is aimed at.
    pub fn target(&self) -> Location {
        match self {
            Self::Select(location) | Self::Extend(location) => *location,
        }
    }

    /// Whether this is a primary click rather than a drag or step.
    pub fn is_click(&self) -> bool {
        matches!(self, Self::Select(_))
    }
}

/// What an action on a [`Session`] amounted to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// The level is not solved yet.
    Playing,
    /// This action solved the level.
    Completed {
        /// The committed encoding of the level.
        encoding: String,
        /// Whether the level was designed in this session and should be persisted.
        authored: bool,
    },
    /// The level was already solved; the action was ignored.
    Finished,
}

/// Whether the held cell `selected` can be drawn on into `target`.
fn connects(board: &Board, selected: Location, target: Location) -> bool {
    if selected == target || !selected.is_next_to(target) {
        return false;
    }

    match (board.anchor_at(selected), board.occupant_at(selected), board.anchor_at(target)) {
        (Some(held), _, Some(aimed)) if held != aimed => false,
        (_, Some(held), Some(aimed)) if held != aimed => false,
        _ => true,
    }
}

/// Apply `action` to `board` and return the new selection.
///
/// Adjacent, color compatible targets are drawn into. Anything else is a fresh selection, which only a click may
/// make, except that in [`Mode::Author`] a stray drag away from the held cell reselects as well.
pub fn transition<R: Rng + ?Sized>(
    state: Selection,
    mode: Mode,
    board: &mut Board,
    action: Action,
    rng: &mut R,
) -> Selection {
    let target = action.target();
    if !board.contains(target) {
        trace!(?action, "target is off the board");
        return state;
    }

    match state.location().filter(|selected| connects(board, *selected, target)) {
        Some(selected) => draw(board, selected, target),
        None => {
            // dragging within the held cell is not stray
            let stray = state.location().is_some_and(|selected| selected != target && !selected.is_next_to(target));
            if action.is_click() || (mode == Mode::Author && stray) {
                select(state, mode, board, target, rng)
            } else {
                trace!(?action, ?state, "ignored");
                state
            }
        }
    }
}

fn select<R: Rng + ?Sized>(state: Selection, mode: Mode, board: &mut Board, target: Location, rng: &mut R) -> Selection {
    let authoring = mode == Mode::Author;

    if let Some(color) = board.anchor_at(target) {
        if authoring && state == Selection::Selecting(target) {
            board.remove_anchor(target);
            trace!(?target, %color, "deleted anchor");
            return Selection::Idle;
        }

        board.restart_flow(color, target);
        return Selection::Selecting(target);
    }

    if let Some(color) = board.occupant_at(target) {
        if authoring && board.count_anchors(color) < 2 {
            board.place_anchor(target, color);
            trace!(?target, %color, "pinned anchor");
            return Selection::Idle;
        }

        board.retract_flow(color, target);
        board.extend_flow(color, target);
        return Selection::Selecting(target);
    }

    if authoring {
        return match board.open_flow(target, rng) {
            Some(color) => {
                trace!(?target, %color, "opened flow");
                Selection::Selecting(target)
            }
            None => Selection::Idle,
        };
    }

    state
}

fn draw(board: &mut Board, selected: Location, target: Location) -> Selection {
    // must be read before retracting, target may be on this same path
    let Some(current) = board.occupant_at(selected) else {
        return Selection::Selecting(selected);
    };

    if let Some(crossed) = board.occupant_at(target) {
        board.retract_flow(crossed, target);
    }

    if board.anchor_at(target).is_some_and(|anchor| anchor != current) {
        return Selection::Selecting(selected);
    }

    board.extend_flow(current, target);

    let closed = board.anchor_at(target).is_some()
        && board.path(current).and_then(FlowPath::first) != Some(target);
    if closed {
        Selection::Idle
    } else {
        Selection::Selecting(target)
    }
}

/// One player's visit to one level.
///
/// The session owns the board while it lasts; take it back with [`into_board`](Session::into_board).
pub struct Session {
    board: Board,
    mode: Mode,
    selection: Selection,
    finished: bool,
    rng: StdRng,
}

impl Session {
    /// Start a session on `board`; boards in creation are authored, all others played.
    pub fn new(board: Board) -> Self {
        Self::with_rng(board, StdRng::from_entropy())
    }

    /// Like [`new`](Self::new) with reproducible color picks.
    pub fn seeded(board: Board, seed: u64) -> Self {
        Self::with_rng(board, StdRng::seed_from_u64(seed))
    }

    /// Like [`new`](Self::new) drawing colors for new designs from `rng`.
    pub fn with_rng(board: Board, rng: StdRng) -> Self {
        let mode = if board.is_in_creation() { Mode::Author } else { Mode::Play };

        Self {
            board,
            mode,
            selection: Selection::Idle,
            finished: false,
            rng,
        }
    }

    /// Apply one action, then check whether the level is solved.
    pub fn act(&mut self, action: Action) -> Outcome {
        if self.finished {
            return Outcome::Finished;
        }

        self.selection = transition(self.selection, self.mode, &mut self.board, action, &mut self.rng);
        self.check_finished()
    }

    /// Shorthand for a [`Action::Select`].
    pub fn select(&mut self, location: Location) -> Outcome {
        self.act(Action::Select(location))
    }

    /// Shorthand for a [`Action::Extend`].
    pub fn extend(&mut self, location: Location) -> Outcome {
        self.act(Action::Extend(location))
    }

    /// Extend from the held cell one step in `direction`. Does nothing while idle.
    pub fn step(&mut self, direction: SquareStep) -> Outcome {
        if self.finished {
            return Outcome::Finished;
        }

        match self.selection.location() {
            Some(selected) => self.extend(direction.attempt_from(selected)),
            None => Outcome::Playing,
        }
    }

    /// Add a row and a column. Only designs can be resized.
    pub fn grow(&mut self) -> bool {
        self.resize(1)
    }

    /// Drop the last row and column. Only designs can be resized.
    pub fn shrink(&mut self) -> bool {
        self.resize(-1)
    }

    fn resize(&mut self, delta: isize) -> bool {
        if self.mode != Mode::Author || self.finished || !self.board.resize(delta) {
            return false;
        }

        // the held flow may have been cut away with the edge
        if let Some(selected) = self.selection.location() {
            if !self.board.cell(selected).is_some_and(Cell::is_occupied) {
                self.selection = Selection::Idle;
            }
        }

        true
    }

    fn check_finished(&mut self) -> Outcome {
        if !self.board.is_finished() {
            return Outcome::Playing;
        }

        let authored = self.mode == Mode::Author;
        if authored {
            self.board.crystallize();
        }
        self.board.commit_encoding();

        self.finished = true;
        self.selection = Selection::Idle;
        info!(length = self.board.length(), authored, "level complete");

        Outcome::Completed {
            encoding: self.board.encoding().to_owned(),
            authored,
        }
    }

    /// The board being played.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// End the session, handing the board back.
    pub fn into_board(self) -> Board {
        self.board
    }

    /// Play or author.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The cell currently held.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Whether the level has been solved in this session.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
