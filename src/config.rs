//! Settings of the game, with overrides from the environment.

use std::env;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;

use crate::board::MIN_LENGTH;
use crate::location::Coord;

/// Environment variable holding a list of level files, separated like `PATH`.
pub const LEVELS_VAR: &str = "FREEFLOW_LEVELS";
/// Environment variable holding a seed for color picks.
pub const SEED_VAR: &str = "FREEFLOW_SEED";

/// Settings of a [`Game`](crate::game::Game).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Candidate level files, tried in order. The first one that exists is read and written.
    pub level_paths: Vec<PathBuf>,
    /// Side length of a fresh design, capped at [`MAX_LENGTH`](crate::board::MAX_LENGTH).
    pub authoring_length: Coord,
    /// Levels per row of the menu.
    pub page_columns: usize,
    /// Rows of levels per menu page.
    pub page_rows: usize,
    /// Makes every color pick reproducible when set.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level_paths: vec![PathBuf::from("levels.txt"), PathBuf::from("src").join("levels.txt")],
            authoring_length: MIN_LENGTH,
            page_columns: 5,
            page_rows: 4,
            seed: None,
        }
    }
}

impl Config {
    /// The defaults, overridden by [`LEVELS_VAR`] and [`SEED_VAR`] where set.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(paths) = env::var_os(LEVELS_VAR) {
            let paths: Vec<PathBuf> = env::split_paths(&paths).filter(|path| !path.as_os_str().is_empty()).collect();
            if !paths.is_empty() {
                config.level_paths = paths;
            }
        }

        if let Ok(seed) = env::var(SEED_VAR) {
            match seed.trim().parse() {
                Ok(seed) => config.seed = Some(seed),
                Err(err) => warn!(%seed, %err, "ignoring unparsable seed"),
            }
        }

        config
    }

    /// Number of levels on one menu page.
    pub fn page_size(&self) -> usize {
        (self.page_columns * self.page_rows).max(1)
    }

    /// A generator honoring [`seed`](Self::seed).
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
