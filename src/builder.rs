//! Programmatic level construction.

use std::num::NonZero;
use std::ops::IndexMut;

use itertools::Itertools;
use ndarray::{Array2, AssignElem};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::board::{Board, MIN_LENGTH};
use crate::codes::EMPTY_CODE;
use crate::color::Color;
use crate::location::{Dimension, Location};

/// Reasons a builder may become invalid while building.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BuilderInvalidReason {
    /// An anchor was placed outside the bounds specified by `length` on the builder.
    FeatureOutOfBounds,
    /// A color was given a second pair of anchors.
    ColorInUse,
}

/// A builder for square levels, placing anchors a pair at a time.
///
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
/// Once a builder is invalid every further call does nothing until [`build`](LevelBuilder::build) reports why.
#[derive(Clone)]
pub struct LevelBuilder {
    length: Dimension,
    anchors: Array2<Option<Color>>,
    // in insertion order, for pop_anchors
    colors: Vec<Color>,
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl Default for LevelBuilder {
    fn default() -> Self {
        Self::with_length(NonZero::new(MIN_LENGTH).unwrap_or(NonZero::<usize>::MIN))
    }
}

impl LevelBuilder {
    /// Construct a new [`Self`] for a board of side `length`.
    pub fn with_length(length: Dimension) -> Self {
        Self {
            length,
            anchors: Array2::from_elem((length.get(), length.get()), None),
            colors: Default::default(),
            invalid_reasons: Default::default(),
        }
    }

    /// Add the two anchors of `color`. The order in which `locations` are specified does not matter.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid
    /// state if either location is out of bounds, or a [`ColorInUse`](BuilderInvalidReason::ColorInUse) one if
    /// `color` already has anchors.
    pub fn add_anchors(&mut self, color: Color, locations: (Location, Location)) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        for location in [locations.0, locations.1] {
            if location.0 >= self.length.get() || location.1 >= self.length.get() {
                self.invalid_reasons.push(BuilderInvalidReason::FeatureOutOfBounds);
                return self;
            }
        }

        if self.colors.contains(&color) {
            self.invalid_reasons.push(BuilderInvalidReason::ColorInUse);
            return self;
        }

        self.colors.push(color);
        for location in [locations.0, locations.1] {
            self.anchors.index_mut(location.as_index()).assign_elem(Some(color));
        }

        self
    }

    /// Remove the most recently added pair of anchors.
    ///
    /// If the builder is in an invalid state or no anchors are present, this function does nothing.
    pub fn pop_anchors(&mut self) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if let Some(color) = self.colors.pop() {
            self.anchors.map_inplace(|anchor| {
                if *anchor == Some(color) {
                    anchor.assign_elem(None);
                }
            })
        }

        self
    }

    /// Check the validity of this builder.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<BuilderInvalidReason>)` otherwise.
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// The encoding of the level built so far, one native color code per anchor.
    pub fn encoding(&self) -> String {
        self.anchors.iter()
            .map(|anchor| anchor.map_or(EMPTY_CODE, |color| color.code()))
            .join("")
    }

    /// Convert the state of this builder into a [`Board`].
    /// If the builder is invalid for any reason, a reference to a [`Vec`] of [`BuilderInvalidReason`] will indicate why.
    pub fn build(&self) -> Result<Board, &Vec<BuilderInvalidReason>> {
        if !self.invalid_reasons.is_empty() {
            return Err(&self.invalid_reasons);
        }

        // only native codes are used, so no color is ever drawn at random
        Ok(Board::from_encoding_with(&self.encoding(), &mut StdRng::seed_from_u64(0)))
    }
}
