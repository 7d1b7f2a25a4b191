//! Level list, menu and the session being played.

use std::mem;
use std::ops::Range;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::board::Board;
use crate::config::Config;
use crate::location::Location;
use crate::session::{Action, Mode, Outcome, Session};
use crate::shape::SquareStep;
use crate::store::LevelStore;

/// Which screen the game is on.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum GameState {
    /// Choosing a level.
    #[default]
    MainMenu,
    /// Playing or designing a level.
    Level,
    /// A level was just solved.
    LevelFinished,
}

/// How far along a level is, for the menu.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LevelStatus {
    /// Solved.
    Finished,
    /// Some flow has been drawn.
    Started,
    /// Untouched.
    Fresh,
}

/// The level list, the menu and at most one [`Session`].
pub struct Game {
    config: Config,
    store: LevelStore,
    state: GameState,
    levels: Vec<Board>,
    active: Option<(usize, Session)>,
    page: usize,
    rng: StdRng,
}

impl Game {
    /// Load levels from the first level file listed in `config`.
    pub fn new(config: Config) -> Self {
        let store = LevelStore::locate(&config.level_paths);
        let mut rng = config.rng();
        let levels = store.load(&mut rng);
        Self::with_levels(config, store, levels, rng)
    }

    /// A game over `levels`, saving designs to `store`.
    pub fn with_levels(config: Config, store: LevelStore, levels: Vec<Board>, rng: StdRng) -> Self {
        Self {
            config,
            store,
            state: GameState::MainMenu,
            levels,
            active: None,
            page: 0,
            rng,
        }
    }

    /// Enter level `index`. One past the last level starts a new design.
    ///
    /// Returns whether a level was entered. A solved level is reset before it is played again.
    pub fn enter_level(&mut self, index: usize) -> bool {
        if self.state != GameState::MainMenu || index > self.levels.len() {
            return false;
        }

        if index == self.levels.len() {
            self.levels.push(Board::new(self.config.authoring_length));
        }

        let mut board = mem::take(&mut self.levels[index]);
        if board.is_finished() {
            board.fill();
        }

        let session = Session::with_rng(board, StdRng::seed_from_u64(self.rng.gen()));
        debug!(index, mode = ?session.mode(), "entered level");
        self.active = Some((index, session));
        self.state = GameState::Level;
        true
    }

    /// Back to the menu, from a level in progress or a solved one.
    pub fn leave_level(&mut self) {
        if let Some((index, session)) = self.active.take() {
            self.levels[index] = session.into_board();
        }
        self.state = GameState::MainMenu;
    }

    /// Forward an action to the level being played.
    pub fn act(&mut self, action: Action) -> Outcome {
        let outcome = match (self.state, self.active.as_mut()) {
            (GameState::Level, Some((_, session))) => session.act(action),
            _ => return Outcome::Finished,
        };
        self.settle(outcome)
    }

    /// A primary click on `location`.
    pub fn select(&mut self, location: Location) -> Outcome {
        self.act(Action::Select(location))
    }

    /// A drag onto `location`.
    pub fn extend(&mut self, location: Location) -> Outcome {
        self.act(Action::Extend(location))
    }

    /// A directional key.
    pub fn step(&mut self, direction: SquareStep) -> Outcome {
        let outcome = match (self.state, self.active.as_mut()) {
            (GameState::Level, Some((_, session))) => session.step(direction),
            _ => return Outcome::Finished,
        };
        self.settle(outcome)
    }

    /// Grow the design being edited.
    pub fn grow(&mut self) -> bool {
        self.active.as_mut().is_some_and(|(_, session)| session.grow())
    }

    /// Shrink the design being edited.
    pub fn shrink(&mut self) -> bool {
        self.active.as_mut().is_some_and(|(_, session)| session.shrink())
    }

    fn settle(&mut self, outcome: Outcome) -> Outcome {
        if let Outcome::Completed { authored, .. } = &outcome {
            self.state = GameState::LevelFinished;
            if *authored {
                info!(levels = self.levels.len(), "saving new design");
                // abandoned designs have nothing to save
                self.store.save(self.levels().filter(|board| board.cells().any(|(_, cell)| cell.is_anchor())));
            }
        }

        outcome
    }

    /// Every level, including the one being played.
    pub fn levels(&self) -> impl Iterator<Item = &Board> + '_ {
        self.levels.iter()
            .enumerate()
            .map(move |(index, board)| match &self.active {
                Some((active, session)) if *active == index => session.board(),
                _ => board,
            })
    }

    /// Number of levels.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Level `index`, as currently played.
    pub fn level(&self, index: usize) -> Option<&Board> {
        self.levels().nth(index)
    }

    /// Progress of level `index`.
    pub fn level_status(&self, index: usize) -> Option<LevelStatus> {
        self.level(index).map(|board| {
            if board.is_finished() {
                LevelStatus::Finished
            } else if board.is_started() {
                LevelStatus::Started
            } else {
                LevelStatus::Fresh
            }
        })
    }

    /// The screen being shown.
    pub fn state(&self) -> GameState {
        self.state
    }

    /// The session in progress.
    pub fn session(&self) -> Option<&Session> {
        self.active.as_ref().map(|(_, session)| session)
    }

    /// Index of the level in progress.
    pub fn active_level(&self) -> Option<usize> {
        self.active.as_ref().map(|(index, _)| *index)
    }

    /// Mode of the session in progress.
    pub fn mode(&self) -> Option<Mode> {
        self.session().map(Session::mode)
    }

    /// The menu page shown.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Last menu page; it always has room for a new design.
    pub fn max_page(&self) -> usize {
        self.levels.len() / self.config.page_size()
    }

    /// Show menu page `page`, clamped to the pages there are.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.min(self.max_page());
    }

    /// Indices of the levels on the shown page, including the slot for a new design on the last page.
    pub fn page_levels(&self) -> Range<usize> {
        let start = self.page * self.config.page_size();
        start..(start + self.config.page_size()).min(self.levels.len() + 1)
    }

    /// The settings this game runs with.
    pub fn config(&self) -> &Config {
        &self.config
    }
}
