//! Flat file persistence of level encodings.
//!
//! One level per line, each line the row-major encoding of a board. Reading skips blank lines; writing orders levels
//! by side length. Storage is best effort: callers are expected to carry on with whatever could be read.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use itertools::Itertools;
use rand::Rng;
use thiserror::Error;
use tracing::{info, warn};

use crate::board::Board;
use crate::location::Coord;

/// Errors raised while reading or writing level files.
#[derive(Debug, Error)]
pub enum StoreError {
    /// None of the candidate paths held a level file.
    #[error("no level file found")]
    NotLocated,
    /// The level file could not be read or written.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A level file, located among candidate paths.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LevelStore {
    path: Option<PathBuf>,
}

impl LevelStore {
    /// Use the first of `candidates` that exists. When none does, nothing is loaded and saves are skipped.
    pub fn locate<P: AsRef<Path>>(candidates: &[P]) -> Self {
        let path = candidates.iter()
            .map(|candidate| candidate.as_ref())
            .find(|candidate| candidate.is_file())
            .map(Path::to_path_buf);

        if path.is_none() {
            warn!(candidates = ?candidates.iter().map(|candidate| candidate.as_ref().display().to_string()).collect_vec(), "no level file found");
        }

        Self { path }
    }

    /// A store writing to `path` whether or not it exists yet.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: Some(path.into()) }
    }

    /// The located level file.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Every non-blank line of the level file.
    pub fn read(&self) -> Result<Vec<String>, StoreError> {
        let path = self.path.as_ref().ok_or(StoreError::NotLocated)?;
        let text = fs::read_to_string(path)?;

        Ok(text.lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect_vec())
    }

    /// Load every level. A missing or unreadable file gives no levels.
    pub fn load<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Board> {
        match self.read() {
            Ok(lines) => {
                info!(count = lines.len(), path = ?self.path, "loaded levels");
                lines.iter().map(|line| Board::from_encoding_with(line, rng)).collect_vec()
            }
            Err(err) => {
                warn!(%err, path = ?self.path, "starting without levels");
                Vec::new()
            }
        }
    }

    /// Write one encoding per line, smallest boards first. Boards of equal size keep their order.
    pub fn write<I>(&self, levels: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = (Coord, String)>,
    {
        let path = self.path.as_ref().ok_or(StoreError::NotLocated)?;
        let mut writer = BufWriter::new(fs::File::create(path)?);

        let levels = levels.into_iter().sorted_by_key(|(length, _)| *length).collect_vec();
        for (_, encoding) in &levels {
            writeln!(writer, "{}", encoding)?;
        }
        writer.flush()?;

        info!(count = levels.len(), ?path, "saved levels");
        Ok(())
    }

    /// Persist `boards`, logging instead of failing.
    pub fn save<'a>(&self, boards: impl IntoIterator<Item = &'a Board>) {
        let levels = boards.into_iter().map(|board| (board.length(), board.export_encoding()));
        if let Err(err) = self.write(levels) {
            warn!(%err, path = ?self.path, "levels were not saved");
        }
    }
}
